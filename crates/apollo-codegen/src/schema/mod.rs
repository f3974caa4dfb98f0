//! The type catalog: every named type of an introspected schema, indexed by name.

use crate::ast::OperationType;
use crate::config::SchemaConfiguration;
use crate::error::CodegenError;
use crate::error::InternalError;
use crate::error::Warning;
use crate::ty::BuiltInScalar;
use crate::ty::CanonicalType;
use crate::ty::TypeBase;
use crate::ty::WrappedType;
use crate::Name;
use crate::NamedType;
use crate::Node;
use indexmap::IndexMap;
use indexmap::IndexSet;

pub mod introspection;
pub mod type_information;

use self::introspection::NamedTypeRef;
use self::introspection::TypeKind;
pub use self::type_information::CompositeKind;
pub use self::type_information::CompositeType;
pub use self::type_information::SelectionSetTypeInformation;

/// Every named type of a schema, plus its root operation types.
///
/// Built once from an introspection result and never mutated afterwards.
/// Built-in scalars (`Int`, `Float`, `String`, `Boolean`, `ID`) are not stored:
/// [`type_base`][Self::type_base] maps them to fixed primitives.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    output_schema_name: Name,
    query_type: NamedType,
    mutation_type: Option<NamedType>,
    subscription_type: Option<NamedType>,
    types: IndexMap<NamedType, ExtendedType>,
    warnings: Vec<Warning>,
}

/// The definition of a named type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedType {
    Scalar(Node<ScalarType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    Enum(Node<EnumType>),
    InputObject(Node<InputObjectType>),
}

/// A custom scalar. Built-in scalars are never represented by this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub description: Option<String>,
    pub name: NamedType,
    pub specified_by_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub description: Option<String>,
    pub name: NamedType,
    pub implements_interfaces: Vec<NamedType>,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
    implementing_types: IndexSet<NamedType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub description: Option<String>,
    pub name: NamedType,
    pub implements_interfaces: Vec<NamedType>,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
    /// Object types implementing this interface
    pub possible_types: IndexSet<NamedType>,
    /// Interfaces that declare this one in their `interfaces`
    pub sub_interfaces: IndexSet<NamedType>,
    implementing_types: IndexSet<NamedType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub description: Option<String>,
    pub name: NamedType,
    pub possible_types: IndexSet<NamedType>,
    /// Fields of the member object types. When members declare the same field name,
    /// the first member's declaration is kept.
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub description: Option<String>,
    pub name: NamedType,
    pub values: IndexMap<Name, Node<EnumValueDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    pub description: Option<String>,
    pub name: NamedType,
    pub fields: IndexMap<Name, Node<InputValueDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<Node<InputValueDefinition>>,
    pub ty: WrappedType,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub ty: WrappedType,
    /// The default value as GraphQL source text, as introspection returns it
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub value: Name,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

/// An interface or union whose possible types are resolved once all types are known
enum Pending {
    Interface(InterfaceType, Vec<NamedTypeRef>),
    Union(UnionType, Vec<NamedTypeRef>),
}

impl TypeCatalog {
    /// Build a catalog from the JSON result of an introspection query.
    ///
    /// Accepts the `__schema` object, `{"__schema": …}`, or a full `{"data": {"__schema": …}}` response.
    pub fn from_introspection_json(
        json: &str,
        config: &SchemaConfiguration,
    ) -> Result<Self, CodegenError> {
        let schema = introspection::Schema::from_json(json)?;
        Self::from_introspection(schema, config)
    }

    pub fn from_introspection(
        schema: introspection::Schema,
        config: &SchemaConfiguration,
    ) -> Result<Self, CodegenError> {
        let mut types = IndexMap::new();
        let mut pending = Vec::new();
        for def in schema.types {
            let name = match def.name {
                Some(name) => name,
                None if matches!(def.kind, TypeKind::LIST | TypeKind::NON_NULL) => {
                    return Err(wrapped_top_level_type(def.kind))
                }
                None => {
                    return Err(CodegenError::configuration(format!(
                        "a type of kind {} in the introspection result has no name",
                        def.kind.describe()
                    )))
                }
            };
            let description = def.description;
            let extended = match def.kind {
                TypeKind::SCALAR => {
                    if BuiltInScalar::from_name(&name).is_some() {
                        continue;
                    }
                    ExtendedType::Scalar(Node::new(ScalarType {
                        description,
                        name: name.clone(),
                        specified_by_url: def.specifiedByURL,
                    }))
                }
                TypeKind::OBJECT => ExtendedType::Object(Node::new(ObjectType {
                    description,
                    implements_interfaces: interface_names(&name, def.interfaces)?,
                    fields: field_definitions(def.fields),
                    implementing_types: IndexSet::from([name.clone()]),
                    name: name.clone(),
                })),
                TypeKind::INTERFACE => {
                    pending.push(Pending::Interface(
                        InterfaceType {
                            description,
                            implements_interfaces: interface_names(&name, def.interfaces)?,
                            fields: field_definitions(def.fields),
                            possible_types: IndexSet::new(),
                            sub_interfaces: IndexSet::new(),
                            implementing_types: IndexSet::new(),
                            name: name.clone(),
                        },
                        def.possibleTypes.unwrap_or_default(),
                    ));
                    continue;
                }
                TypeKind::UNION => {
                    pending.push(Pending::Union(
                        UnionType {
                            description,
                            possible_types: IndexSet::new(),
                            fields: IndexMap::new(),
                            name: name.clone(),
                        },
                        def.possibleTypes.unwrap_or_default(),
                    ));
                    continue;
                }
                TypeKind::ENUM => ExtendedType::Enum(Node::new(EnumType {
                    description,
                    values: def
                        .enumValues
                        .into_iter()
                        .flatten()
                        .map(|value| {
                            (
                                value.name.clone(),
                                Node::new(EnumValueDefinition {
                                    description: value.description,
                                    value: value.name,
                                    is_deprecated: value.isDeprecated,
                                    deprecation_reason: value.deprecationReason,
                                }),
                            )
                        })
                        .collect(),
                    name: name.clone(),
                })),
                TypeKind::INPUT_OBJECT => ExtendedType::InputObject(Node::new(InputObjectType {
                    description,
                    fields: def
                        .inputFields
                        .into_iter()
                        .flatten()
                        .map(|value| (value.name.clone(), input_value_definition(value)))
                        .collect(),
                    name: name.clone(),
                })),
                TypeKind::LIST | TypeKind::NON_NULL => return Err(wrapped_top_level_type(def.kind)),
            };
            types.insert(name, extended);
        }

        let mut catalog = Self {
            output_schema_name: config.output_schema_name.clone(),
            query_type: Name::new(""),
            mutation_type: None,
            subscription_type: None,
            types,
            warnings: Vec::new(),
        };
        catalog.resolve_pending(pending)?;
        catalog.check_implemented_interfaces()?;

        let query_type = schema.queryType.ok_or_else(|| {
            CodegenError::configuration("the introspection result does not declare a queryType")
        })?;
        catalog.query_type = catalog.root_type(OperationType::Query, query_type)?;
        catalog.mutation_type = schema
            .mutationType
            .map(|ty| catalog.root_type(OperationType::Mutation, ty))
            .transpose()?;
        catalog.subscription_type = schema
            .subscriptionType
            .map(|ty| catalog.root_type(OperationType::Subscription, ty))
            .transpose()?;
        Ok(catalog)
    }

    /// Resolves interface and union possible types against the collected object types,
    /// then computes their implementing types.
    fn resolve_pending(&mut self, pending: Vec<Pending>) -> Result<(), CodegenError> {
        let mut sub_interfaces: IndexMap<NamedType, IndexSet<NamedType>> = IndexMap::new();
        for entry in &pending {
            if let Pending::Interface(interface, _) = entry {
                for super_interface in &interface.implements_interfaces {
                    sub_interfaces
                        .entry(super_interface.clone())
                        .or_default()
                        .insert(interface.name.clone());
                }
            }
        }

        let mut resolved = Vec::with_capacity(pending.len());
        for entry in pending {
            match entry {
                Pending::Interface(mut interface, possible_types) => {
                    interface.possible_types = self.object_names(&interface.name, possible_types)?;
                    interface.sub_interfaces = sub_interfaces
                        .swap_remove(&interface.name)
                        .unwrap_or_default();
                    interface.implementing_types = interface
                        .possible_types
                        .union(&interface.sub_interfaces)
                        .cloned()
                        .chain([interface.name.clone()])
                        .collect();
                    self.warn_if_empty(&interface.name, &interface.possible_types, "interface");
                    resolved.push(ExtendedType::Interface(Node::new(interface)));
                }
                Pending::Union(mut union_, possible_types) => {
                    union_.possible_types = self.object_names(&union_.name, possible_types)?;
                    for member in &union_.possible_types {
                        if let Some(object) = self.get_object(member) {
                            for (name, field) in &object.fields {
                                union_
                                    .fields
                                    .entry(name.clone())
                                    .or_insert_with(|| field.clone());
                            }
                        }
                    }
                    self.warn_if_empty(&union_.name, &union_.possible_types, "union");
                    resolved.push(ExtendedType::Union(Node::new(union_)));
                }
            }
        }
        for def in resolved {
            self.types.insert(def.name().clone(), def);
        }
        Ok(())
    }

    /// Possible types of an interface or union must be object types of this schema
    fn object_names(
        &self,
        parent: &NamedType,
        references: Vec<NamedTypeRef>,
    ) -> Result<IndexSet<NamedType>, InternalError> {
        references
            .into_iter()
            .map(|reference| {
                let name = expect_kind(reference, TypeKind::OBJECT, "an object", parent)?;
                if self.get_object(&name).is_none() {
                    return Err(InternalError::UndefinedPossibleType {
                        type_name: name,
                        parent: parent.clone(),
                    });
                }
                Ok(name)
            })
            .collect()
    }

    fn warn_if_empty(
        &mut self,
        name: &NamedType,
        possible_types: &IndexSet<NamedType>,
        describe: &'static str,
    ) {
        if possible_types.is_empty() {
            tracing::warn!(type_name = %name, "{describe} has no possible types");
            self.warnings.push(Warning::NoPossibleTypes {
                type_name: name.clone(),
                describe,
            });
        }
    }

    fn check_implemented_interfaces(&self) -> Result<(), InternalError> {
        for def in self.types.values() {
            let (name, interfaces) = match def {
                ExtendedType::Object(def) => (&def.name, &def.implements_interfaces),
                ExtendedType::Interface(def) => (&def.name, &def.implements_interfaces),
                ExtendedType::Scalar(_)
                | ExtendedType::Union(_)
                | ExtendedType::Enum(_)
                | ExtendedType::InputObject(_) => continue,
            };
            for interface in interfaces {
                match self.types.get(interface) {
                    Some(ExtendedType::Interface(_)) => {}
                    Some(_) => {
                        return Err(InternalError::UnexpectedTypeKind {
                            type_name: interface.clone(),
                            referenced_by: name.clone(),
                            expected: "an interface",
                        })
                    }
                    None => {
                        return Err(InternalError::UnresolvedType {
                            type_name: interface.clone(),
                            referenced_by: format!("the interfaces of `{name}`"),
                        })
                    }
                }
            }
        }
        Ok(())
    }

    fn root_type(
        &self,
        operation_type: OperationType,
        reference: NamedTypeRef,
    ) -> Result<NamedType, CodegenError> {
        match self.types.get(&reference.name) {
            Some(ExtendedType::Object(_)) => Ok(reference.name),
            Some(def) => Err(CodegenError::configuration(format!(
                "the {operation_type} root type `{}` is {}, not an object type",
                reference.name,
                def.describe()
            ))),
            None => Err(CodegenError::configuration(format!(
                "the {operation_type} root type `{}` is not defined in the introspection result",
                reference.name
            ))),
        }
    }

    /// The namespace custom scalar aliases live in
    pub fn output_schema_name(&self) -> &Name {
        &self.output_schema_name
    }

    pub fn query_type(&self) -> &NamedType {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&NamedType> {
        self.mutation_type.as_ref()
    }

    pub fn subscription_type(&self) -> Option<&NamedType> {
        self.subscription_type.as_ref()
    }

    /// Returns the name of the object type for the given root operation, if the schema defines one
    pub fn root_operation(&self, operation_type: OperationType) -> Option<&NamedType> {
        match operation_type {
            OperationType::Query => Some(&self.query_type),
            OperationType::Mutation => self.mutation_type.as_ref(),
            OperationType::Subscription => self.subscription_type.as_ref(),
        }
    }

    /// Interfaces and unions found with zero possible types
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Every named type except built-in scalars, in introspection order
    /// (interfaces and unions come last, once their possible types are resolved)
    pub fn types(&self) -> &IndexMap<NamedType, ExtendedType> {
        &self.types
    }

    pub fn get(&self, name: &str) -> Option<&ExtendedType> {
        self.types.get(name)
    }

    pub fn get_scalar(&self, name: &str) -> Option<&Node<ScalarType>> {
        if let Some(ExtendedType::Scalar(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_object(&self, name: &str) -> Option<&Node<ObjectType>> {
        if let Some(ExtendedType::Object(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_interface(&self, name: &str) -> Option<&Node<InterfaceType>> {
        if let Some(ExtendedType::Interface(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_union(&self, name: &str) -> Option<&Node<UnionType>> {
        if let Some(ExtendedType::Union(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_enum(&self, name: &str) -> Option<&Node<EnumType>> {
        if let Some(ExtendedType::Enum(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_input_object(&self, name: &str) -> Option<&Node<InputObjectType>> {
        if let Some(ExtendedType::InputObject(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn custom_scalars(&self) -> impl Iterator<Item = &Node<ScalarType>> {
        self.types.values().filter_map(|def| match def {
            ExtendedType::Scalar(def) => Some(def),
            _ => None,
        })
    }

    pub fn objects(&self) -> impl Iterator<Item = &Node<ObjectType>> {
        self.types.values().filter_map(|def| match def {
            ExtendedType::Object(def) => Some(def),
            _ => None,
        })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Node<InterfaceType>> {
        self.types.values().filter_map(|def| match def {
            ExtendedType::Interface(def) => Some(def),
            _ => None,
        })
    }

    pub fn unions(&self) -> impl Iterator<Item = &Node<UnionType>> {
        self.types.values().filter_map(|def| match def {
            ExtendedType::Union(def) => Some(def),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &Node<EnumType>> {
        self.types.values().filter_map(|def| match def {
            ExtendedType::Enum(def) => Some(def),
            _ => None,
        })
    }

    pub fn input_objects(&self) -> impl Iterator<Item = &Node<InputObjectType>> {
        self.types.values().filter_map(|def| match def {
            ExtendedType::InputObject(def) => Some(def),
            _ => None,
        })
    }

    /// [GetPossibleTypes()](https://spec.graphql.org/October2021/#GetPossibleTypes())
    /// for an object, interface, or union type name
    pub fn possible_types(&self, name: &str) -> Option<&IndexSet<NamedType>> {
        match self.types.get(name)? {
            ExtendedType::Object(def) => Some(&def.implementing_types),
            ExtendedType::Interface(def) => Some(&def.implementing_types),
            ExtendedType::Union(def) => Some(&def.possible_types),
            ExtendedType::Scalar(_) | ExtendedType::Enum(_) | ExtendedType::InputObject(_) => None,
        }
    }

    /// Whether `name` is a built-in scalar or a scalar declared by the schema
    pub fn is_scalar(&self, name: &str) -> bool {
        BuiltInScalar::from_name(name).is_some() || self.get_scalar(name).is_some()
    }

    /// Maps the innermost name of a type reference to what emitters refer to it by.
    pub fn type_base(&self, name: &NamedType) -> TypeBase {
        if let Some(scalar) = BuiltInScalar::from_name(name) {
            TypeBase::BuiltIn(scalar)
        } else if self.get_scalar(name).is_some() {
            TypeBase::CustomScalar {
                namespace: self.output_schema_name.clone(),
                name: name.clone(),
            }
        } else {
            TypeBase::Named(name.clone())
        }
    }

    /// Rewraps a type reference, resolving its base against this catalog
    pub fn rewrap(&self, ty: &WrappedType) -> Result<CanonicalType, InternalError> {
        ty.rewrap(&|name| self.type_base(name))
    }
}

impl ExtendedType {
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(def) => &def.name,
            Self::Object(def) => &def.name,
            Self::Interface(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::InputObject(def) => &def.name,
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "a scalar type",
            Self::Object(_) => "an object type",
            Self::Interface(_) => "an interface type",
            Self::Union(_) => "a union type",
            Self::Enum(_) => "an enum type",
            Self::InputObject(_) => "an input object type",
        }
    }
}

fn wrapped_top_level_type(kind: TypeKind) -> CodegenError {
    InternalError::WrappedTopLevelType {
        kind: kind.describe(),
    }
    .into()
}

fn expect_kind(
    reference: NamedTypeRef,
    expected_kind: TypeKind,
    expected: &'static str,
    referenced_by: &Name,
) -> Result<NamedType, InternalError> {
    match reference.kind {
        Some(kind) if kind != expected_kind => Err(InternalError::UnexpectedTypeKind {
            type_name: reference.name,
            referenced_by: referenced_by.clone(),
            expected,
        }),
        _ => Ok(reference.name),
    }
}

fn interface_names(
    name: &NamedType,
    references: Option<Vec<NamedTypeRef>>,
) -> Result<Vec<NamedType>, InternalError> {
    references
        .into_iter()
        .flatten()
        .map(|reference| expect_kind(reference, TypeKind::INTERFACE, "an interface", name))
        .collect()
}

fn field_definitions(
    fields: Option<Vec<introspection::FieldDef>>,
) -> IndexMap<Name, Node<FieldDefinition>> {
    fields
        .into_iter()
        .flatten()
        .map(|def| {
            (
                def.name.clone(),
                Node::new(FieldDefinition {
                    description: def.description,
                    name: def.name,
                    arguments: def.args.into_iter().map(input_value_definition).collect(),
                    ty: def.ty.0,
                    is_deprecated: def.isDeprecated,
                    deprecation_reason: def.deprecationReason,
                }),
            )
        })
        .collect()
}

fn input_value_definition(value: introspection::InputValue) -> Node<InputValueDefinition> {
    Node::new(InputValueDefinition {
        description: value.description,
        name: value.name,
        ty: value.ty.0,
        default_value: value.defaultValue,
    })
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<TypeCatalog>();
    assert_sync::<TypeCatalog>();
};
