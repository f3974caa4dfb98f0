//! Lowering of operations and fragments into IR.
//!
//! Each selection is resolved against the type its selection set is taken against.
//! The first error aborts lowering of the whole definition.

use super::lift::Lifter;
use super::FieldIR;
use super::FragmentDefinitionIR;
use super::InlineFragmentIR;
use super::LiftedDependencies;
use super::ObjectFieldIR;
use super::OperationDefinitionIR;
use super::SelectionSetIR;
use super::VariableDefinitionIR;
use super::TYPENAME;
use crate::ast;
use crate::encode::EncodableValue;
use crate::error::CodegenError;
use crate::error::DiagnosticData;
use crate::error::ExecutableDefinitionName;
use crate::error::InternalError;
use crate::error::SelectionPath;
use crate::error::ValidationError;
use crate::schema::CompositeType;
use crate::schema::EnumType;
use crate::schema::SelectionSetTypeInformation;
use crate::Name;
use crate::NamedType;
use crate::Node;
use crate::NodeLocation;
use crate::TypeCatalog;
use indexmap::IndexMap;

/// Fragment definitions by name, shared read-only by every lowering
pub(crate) type FragmentMap = IndexMap<Name, Node<ast::FragmentDefinition>>;

struct Lowering<'a> {
    catalog: &'a TypeCatalog,
    fragments: &'a FragmentMap,
    /// Response keys of the fields being lowered, for error messages
    path: SelectionPath,
    enums: IndexMap<NamedType, Node<EnumType>>,
}

pub(crate) fn lower_operation(
    catalog: &TypeCatalog,
    fragments: &FragmentMap,
    operation: &Node<ast::OperationDefinition>,
) -> Result<Node<OperationDefinitionIR>, CodegenError> {
    let operation_type = operation.operation_type;
    let Some(name) = operation.name.clone() else {
        return Err(ValidationError::new(
            operation.location(),
            DiagnosticData::AnonymousOperation { operation_type },
        )
        .into());
    };
    let mut lowering = Lowering {
        catalog,
        fragments,
        path: SelectionPath {
            root: ExecutableDefinitionName::NamedOperation(operation_type, name.clone()),
            nested_fields: Vec::new(),
        },
        enums: IndexMap::new(),
    };

    let Some(root_name) = catalog.root_operation(operation_type) else {
        return Err(lowering.validation(
            operation.location(),
            DiagnosticData::UndefinedRootOperation {
                operation: name,
                operation_type,
            },
        ));
    };
    let root = catalog
        .composite_type(root_name)
        .ok_or_else(|| InternalError::UnresolvedType {
            type_name: root_name.clone(),
            referenced_by: format!("the {operation_type} root operation"),
        })?;

    let variables = operation
        .variables
        .iter()
        .map(|variable| lowering.lower_variable(variable))
        .collect::<Result<Vec<_>, _>>()?;
    let selection_set = lowering.lower_selection_set(&operation.selection_set, root, &[])?;

    let mut lifted = LiftedDependencies {
        enums: lowering.enums,
        input_objects: IndexMap::new(),
    };
    lifted.extend(Lifter::new(catalog).lift_variables(&variables)?);

    Ok(operation.same_location(OperationDefinitionIR {
        operation_type,
        name,
        variables,
        directives: operation.directives.clone(),
        selection_set,
        lifted,
    }))
}

pub(crate) fn lower_fragment(
    catalog: &TypeCatalog,
    fragments: &FragmentMap,
    fragment: &Node<ast::FragmentDefinition>,
) -> Result<Node<FragmentDefinitionIR>, CodegenError> {
    let mut lowering = Lowering {
        catalog,
        fragments,
        path: SelectionPath {
            root: ExecutableDefinitionName::Fragment(fragment.name.clone()),
            nested_fields: Vec::new(),
        },
        enums: IndexMap::new(),
    };
    let Some(type_information) = catalog.composite_type(&fragment.type_condition) else {
        return Err(lowering.validation(
            fragment.location(),
            DiagnosticData::UndefinedTypeCondition {
                fragment_name: fragment.name.clone(),
                type_name: fragment.type_condition.clone(),
            },
        ));
    };
    let selection_set =
        lowering.lower_selection_set(&fragment.selection_set, type_information, &[])?;
    Ok(fragment.same_location(FragmentDefinitionIR {
        name: fragment.name.clone(),
        type_condition: fragment.type_condition.clone(),
        directives: fragment.directives.clone(),
        selection_set,
        lifted: LiftedDependencies {
            enums: lowering.enums,
            input_objects: IndexMap::new(),
        },
    }))
}

impl<'a> Lowering<'a> {
    fn validation(&self, location: Option<NodeLocation>, data: DiagnosticData) -> CodegenError {
        ValidationError::new(location, data)
            .with_path(self.path.clone())
            .into()
    }

    /// Fills in the location and path of a validation error raised without them
    fn locate(&self, location: Option<NodeLocation>, error: CodegenError) -> CodegenError {
        match error {
            CodegenError::Validation(mut error) => {
                error.location = error.location.or(location);
                if error.path.is_none() {
                    error.path = Some(self.path.clone());
                }
                error.into()
            }
            error => error,
        }
    }

    fn lower_variable(
        &self,
        variable: &Node<ast::VariableDefinition>,
    ) -> Result<VariableDefinitionIR, CodegenError> {
        let default_value = variable
            .default_value
            .as_ref()
            .map(EncodableValue::from_const_value)
            .transpose()
            .map_err(|error| self.locate(variable.location(), error))?;
        Ok(VariableDefinitionIR {
            name: variable.name.clone(),
            definition: variable.clone(),
            ty: self.catalog.rewrap(&variable.ty)?,
            default_value,
        })
    }

    fn lower_selection_set(
        &mut self,
        selections: &[ast::Selection],
        type_information: CompositeType<'a>,
        traversed_fields: &[Node<FieldIR>],
    ) -> Result<SelectionSetIR, CodegenError> {
        let mut selection_set = SelectionSetIR::new(type_information, traversed_fields.to_vec());
        for selection in selections {
            match selection {
                ast::Selection::Field(field) => {
                    let field_ir = self.lower_field(field, type_information)?;
                    if field.selection_set.is_empty() {
                        selection_set.scalar_fields.push(field_ir);
                        continue;
                    }
                    let nested_type = self
                        .catalog
                        .selection_set_type_information(&field_ir.definition)
                        .map_err(|error| self.locate(field.location(), error))?;
                    let mut nested_path = traversed_fields.to_vec();
                    nested_path.push(field_ir.clone());

                    self.path.nested_fields.push(field.response_key().clone());
                    let nested =
                        self.lower_selection_set(&field.selection_set, nested_type, &nested_path);
                    self.path.nested_fields.pop();

                    selection_set.object_fields.push(ObjectFieldIR {
                        field: field_ir,
                        selection_set: nested?,
                        requires_disambiguation: false,
                    });
                }
                ast::Selection::FragmentSpread(spread) => {
                    self.check_fragment_spread(spread, type_information)?;
                    selection_set.fragment_spreads.push(spread.clone());
                }
                ast::Selection::InlineFragment(inline) => {
                    let nested_type = match &inline.type_condition {
                        Some(type_condition) => {
                            self.inline_type_condition(inline, type_condition, type_information)?
                        }
                        None => type_information,
                    };
                    let nested = self.lower_selection_set(
                        &inline.selection_set,
                        nested_type,
                        traversed_fields,
                    )?;
                    selection_set.inline_fragments.push(InlineFragmentIR {
                        type_condition: nested_type.name().clone(),
                        directives: inline.directives.clone(),
                        selection_set: nested,
                    });
                }
            }
        }

        if !selection_set
            .scalar_fields
            .iter()
            .any(|field| field.is_typename())
        {
            let typename = FieldIR::typename(self.catalog)?;
            selection_set.scalar_fields.push(Node::new(typename));
        }
        selection_set.merge_inline_fragments()?;
        selection_set.flag_disambiguation();
        Ok(selection_set)
    }

    fn lower_field(
        &mut self,
        field: &Node<ast::Field>,
        parent: CompositeType<'a>,
    ) -> Result<Node<FieldIR>, CodegenError> {
        let definition = if let Some(definition) = parent.queryable_fields().get(&field.name) {
            definition.clone()
        } else if field.name == TYPENAME {
            FieldIR::typename(self.catalog)?.definition
        } else {
            return Err(self.validation(
                field.location(),
                DiagnosticData::UndefinedField {
                    type_name: parent.name().clone(),
                    field_name: field.name.clone(),
                },
            ));
        };

        let type_name = definition.ty.inner_named_type();
        if let Some(enum_type) = self.catalog.get_enum(type_name) {
            if !field.selection_set.is_empty() {
                return Err(self.validation(
                    field.location(),
                    DiagnosticData::SubselectionOnLeafType {
                        field_name: field.name.clone(),
                        type_name: type_name.clone(),
                        describe: "an enum type",
                    },
                ));
            }
            self.enums
                .entry(type_name.clone())
                .or_insert_with(|| enum_type.clone());
        }

        Ok(field.same_location(FieldIR {
            alias: field.alias.clone(),
            name: field.name.clone(),
            ty: self.catalog.rewrap(&definition.ty)?,
            definition,
            arguments: field.arguments.clone(),
            directives: field.directives.clone(),
        }))
    }

    fn check_fragment_spread(
        &self,
        spread: &Node<ast::FragmentSpread>,
        parent: CompositeType<'a>,
    ) -> Result<(), CodegenError> {
        let Some(fragment) = self.fragments.get(&spread.fragment_name) else {
            return Err(self.validation(
                spread.location(),
                DiagnosticData::UndefinedFragment {
                    name: spread.fragment_name.clone(),
                },
            ));
        };
        if self.catalog.composite_type(&fragment.type_condition).is_none() {
            return Err(self.validation(
                fragment.location(),
                DiagnosticData::UndefinedTypeCondition {
                    fragment_name: fragment.name.clone(),
                    type_name: fragment.type_condition.clone(),
                },
            ));
        }
        if !parent.is_spread_possible(&fragment.type_condition, self.catalog) {
            return Err(self.validation(
                spread.location(),
                DiagnosticData::ImpossibleFragmentSpread {
                    fragment_name: fragment.name.clone(),
                    type_condition: fragment.type_condition.clone(),
                    parent_type: parent.name().clone(),
                },
            ));
        }
        Ok(())
    }

    fn inline_type_condition(
        &self,
        inline: &Node<ast::InlineFragment>,
        type_condition: &NamedType,
        parent: CompositeType<'a>,
    ) -> Result<CompositeType<'a>, CodegenError> {
        let Some(type_information) = self.catalog.composite_type(type_condition) else {
            return Err(self.validation(
                inline.location(),
                DiagnosticData::UndefinedInlineTypeCondition {
                    type_name: type_condition.clone(),
                },
            ));
        };
        if !parent.is_spread_possible(type_condition, self.catalog) {
            return Err(self.validation(
                inline.location(),
                DiagnosticData::ImpossibleInlineFragment {
                    type_condition: type_condition.clone(),
                    parent_type: parent.name().clone(),
                },
            ));
        }
        Ok(type_information)
    }
}
