//! What a selection set can query, and which concrete types it can resolve to.

use super::FieldDefinition;
use super::InterfaceType;
use super::ObjectType;
use super::TypeCatalog;
use super::UnionType;
use crate::error::CodegenError;
use crate::error::DiagnosticData;
use crate::error::InternalError;
use crate::ty::BuiltInScalar;
use crate::Name;
use crate::NamedType;
use crate::Node;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// The type a selection set is taken against: an object, interface, or union type.
pub trait SelectionSetTypeInformation {
    fn name(&self) -> &NamedType;

    /// Fields that may be selected, not including the `__typename` meta-field
    fn queryable_fields(&self) -> &IndexMap<Name, Node<FieldDefinition>>;

    /// [GetPossibleTypes()](https://spec.graphql.org/October2021/#GetPossibleTypes()):
    ///
    /// * an object type's implementing types are itself
    /// * an interface's are its possible object types, its direct sub-interfaces, and itself
    /// * a union's are its possible object types
    fn implementing_types(&self) -> &IndexSet<NamedType>;

    /// The types a fragment on `type_condition` could apply to within this selection set
    fn applicable_types(&self, type_condition: &str, catalog: &TypeCatalog) -> IndexSet<NamedType> {
        match catalog.possible_types(type_condition) {
            Some(fragment_types) => self
                .implementing_types()
                .intersection(fragment_types)
                .cloned()
                .collect(),
            None => IndexSet::new(),
        }
    }

    /// [Fragment spread is possible](https://spec.graphql.org/October2021/#sec-Fragment-spread-is-possible)
    fn is_spread_possible(&self, type_condition: &str, catalog: &TypeCatalog) -> bool {
        !self.applicable_types(type_condition, catalog).is_empty()
    }
}

/// A borrowed handle to one of the three types a selection set can be taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeType<'a> {
    Object(&'a ObjectType),
    Interface(&'a InterfaceType),
    Union(&'a UnionType),
}

/// The kind of a [`CompositeType`], kept in IR instead of a reference into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    Object,
    Interface,
    Union,
}

impl SelectionSetTypeInformation for ObjectType {
    fn name(&self) -> &NamedType {
        &self.name
    }

    fn queryable_fields(&self) -> &IndexMap<Name, Node<FieldDefinition>> {
        &self.fields
    }

    fn implementing_types(&self) -> &IndexSet<NamedType> {
        &self.implementing_types
    }
}

impl SelectionSetTypeInformation for InterfaceType {
    fn name(&self) -> &NamedType {
        &self.name
    }

    fn queryable_fields(&self) -> &IndexMap<Name, Node<FieldDefinition>> {
        &self.fields
    }

    fn implementing_types(&self) -> &IndexSet<NamedType> {
        &self.implementing_types
    }
}

impl SelectionSetTypeInformation for UnionType {
    fn name(&self) -> &NamedType {
        &self.name
    }

    fn queryable_fields(&self) -> &IndexMap<Name, Node<FieldDefinition>> {
        &self.fields
    }

    fn implementing_types(&self) -> &IndexSet<NamedType> {
        &self.possible_types
    }
}

impl SelectionSetTypeInformation for CompositeType<'_> {
    fn name(&self) -> &NamedType {
        match self {
            Self::Object(def) => def.name(),
            Self::Interface(def) => def.name(),
            Self::Union(def) => def.name(),
        }
    }

    fn queryable_fields(&self) -> &IndexMap<Name, Node<FieldDefinition>> {
        match self {
            Self::Object(def) => def.queryable_fields(),
            Self::Interface(def) => def.queryable_fields(),
            Self::Union(def) => def.queryable_fields(),
        }
    }

    fn implementing_types(&self) -> &IndexSet<NamedType> {
        match self {
            Self::Object(def) => def.implementing_types(),
            Self::Interface(def) => def.implementing_types(),
            Self::Union(def) => def.implementing_types(),
        }
    }
}

impl CompositeType<'_> {
    pub fn kind(&self) -> CompositeKind {
        match self {
            Self::Object(_) => CompositeKind::Object,
            Self::Interface(_) => CompositeKind::Interface,
            Self::Union(_) => CompositeKind::Union,
        }
    }
}

impl TypeCatalog {
    /// Returns the object, interface, or union type with this name
    pub fn composite_type(&self, name: &str) -> Option<CompositeType<'_>> {
        if let Some(def) = self.get_object(name) {
            Some(CompositeType::Object(def))
        } else if let Some(def) = self.get_interface(name) {
            Some(CompositeType::Interface(def))
        } else {
            self.get_union(name).map(|def| CompositeType::Union(def))
        }
    }

    /// Resolves the type a field's selection set is taken against.
    ///
    /// The field's type is unwrapped to its innermost named type, which must be
    /// an object, interface, or union type. A selection set on a scalar, enum,
    /// or input object type is a validation error.
    pub fn selection_set_type_information(
        &self,
        field: &FieldDefinition,
    ) -> Result<CompositeType<'_>, CodegenError> {
        let type_name = field.ty.inner_named_type();
        if let Some(composite) = self.composite_type(type_name) {
            return Ok(composite);
        }
        let describe = if BuiltInScalar::from_name(type_name).is_some() {
            "a built-in scalar"
        } else if let Some(def) = self.types.get(type_name) {
            def.describe()
        } else {
            return Err(InternalError::UnresolvedType {
                type_name: type_name.clone(),
                referenced_by: format!("field `{}`", field.name),
            }
            .into());
        };
        Err(DiagnosticData::SubselectionOnLeafType {
            field_name: field.name.clone(),
            type_name: type_name.clone(),
            describe,
        }
        .into())
    }
}
