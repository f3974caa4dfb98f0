//! Collects the enums and input objects reachable from variable types.

use super::InputObjectTypeIR;
use super::InputValueIR;
use super::LiftedDependencies;
use super::VariableDefinitionIR;
use crate::error::CodegenError;
use crate::error::InternalError;
use crate::ty::WrappedType;
use crate::Name;
use crate::NamedType;
use crate::TypeCatalog;
use indexmap::IndexSet;

pub(crate) struct Lifter<'a> {
    catalog: &'a TypeCatalog,
    /// Input objects already lifted or being lifted.
    /// Input objects may reference themselves, directly or through other input objects.
    visited: IndexSet<NamedType>,
    lifted: LiftedDependencies,
}

impl<'a> Lifter<'a> {
    pub(crate) fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            visited: IndexSet::new(),
            lifted: LiftedDependencies::default(),
        }
    }

    pub(crate) fn lift_variables(
        mut self,
        variables: &[VariableDefinitionIR],
    ) -> Result<LiftedDependencies, CodegenError> {
        for variable in variables {
            let referenced_by = Name::from(format!("${}", variable.name));
            self.lift(&variable.definition.ty, &referenced_by)?;
        }
        Ok(self.lifted)
    }

    fn lift(&mut self, ty: &WrappedType, referenced_by: &Name) -> Result<(), CodegenError> {
        let type_name = ty.inner_named_type();
        if let Some(def) = self.catalog.get_enum(type_name) {
            self.lifted
                .enums
                .entry(type_name.clone())
                .or_insert_with(|| def.clone());
            return Ok(());
        }
        if let Some(def) = self.catalog.get_input_object(type_name) {
            if !self.visited.insert(type_name.clone()) {
                return Ok(());
            }
            let fields = def
                .fields
                .values()
                .map(|field| {
                    Ok(InputValueIR {
                        definition: field.clone(),
                        ty: self.catalog.rewrap(&field.ty)?,
                    })
                })
                .collect::<Result<Vec<_>, InternalError>>()?;
            self.lifted.input_objects.insert(
                type_name.clone(),
                InputObjectTypeIR {
                    definition: def.clone(),
                    fields,
                },
            );
            for field in def.fields.values() {
                let referenced_by = Name::from(format!("{type_name}.{}", field.name));
                self.lift(&field.ty, &referenced_by)?;
            }
            return Ok(());
        }
        if self.catalog.is_scalar(type_name) {
            return Ok(());
        }
        Err(match self.catalog.get(type_name) {
            Some(_) => InternalError::UnexpectedTypeKind {
                type_name: type_name.clone(),
                referenced_by: referenced_by.clone(),
                expected: "a scalar, enum, or input object type",
            },
            None => InternalError::UnresolvedType {
                type_name: type_name.clone(),
                referenced_by: format!("`{referenced_by}`"),
            },
        }
        .into())
    }
}
