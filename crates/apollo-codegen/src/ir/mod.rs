//! Intermediate representation of operations and fragments, fully resolved against a
//! [`TypeCatalog`][crate::TypeCatalog].
//!
//! IR nodes refer to schema types by name and by shared [`Node`] handles into the catalog,
//! they never copy schema definitions. Every node is built bottom-up by
//! [`DocumentRegistry::compile`][crate::DocumentRegistry::compile] and is not mutated afterwards.

use crate::ast;
use crate::ast::lowercase_first;
use crate::ast::uppercase_first;
use crate::ast::OperationType;
use crate::encode::EncodableValue;
use crate::error::InternalError;
use crate::schema::CompositeKind;
use crate::schema::CompositeType;
use crate::schema::EnumType;
use crate::schema::FieldDefinition;
use crate::schema::InputObjectType;
use crate::schema::InputValueDefinition;
use crate::schema::SelectionSetTypeInformation;
use crate::ty::CanonicalType;
use crate::ty::TypeBase;
use crate::ty::WrappedType;
use crate::Name;
use crate::NamedType;
use crate::Node;
use crate::TypeCatalog;
use indexmap::IndexMap;

pub(crate) mod lift;
pub(crate) mod lower;
mod merge;

/// The `__typename` meta-field, selectable on every composite type
pub const TYPENAME: &str = "__typename";

/// One selected field, resolved against its parent type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIR {
    pub alias: Option<Name>,
    pub name: Name,
    /// The field's declaration in the schema.
    /// For `__typename` this is synthesized as a non-null `String` field.
    pub definition: Node<FieldDefinition>,
    pub ty: CanonicalType,
    /// Arguments as written in the document
    pub arguments: Vec<Node<ast::Argument>>,
    pub directives: ast::DirectiveList,
}

/// The lowered form of a selection set.
///
/// Selections are partitioned into four lists, each in document order.
/// Exactly one scalar field named `__typename` is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSetIR {
    /// The object, interface, or union type this selection set is taken against
    pub type_name: NamedType,
    pub type_kind: CompositeKind,
    /// Fields traversed from the operation or fragment root to reach this selection set
    pub traversed_fields: Vec<Node<FieldIR>>,
    pub scalar_fields: Vec<Node<FieldIR>>,
    pub fragment_spreads: Vec<Node<ast::FragmentSpread>>,
    pub object_fields: Vec<ObjectFieldIR>,
    pub inline_fragments: Vec<InlineFragmentIR>,
}

/// A field with a sub-selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFieldIR {
    pub field: Node<FieldIR>,
    pub selection_set: SelectionSetIR,
    /// Set when a sibling object field resolves to the same type,
    /// so that generated type names for the two would collide.
    pub requires_disambiguation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFragmentIR {
    /// The fragment's type condition, or its parent type if it had none
    pub type_condition: NamedType,
    pub directives: ast::DirectiveList,
    pub selection_set: SelectionSetIR,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinitionIR {
    pub operation_type: OperationType,
    pub name: Name,
    pub variables: Vec<VariableDefinitionIR>,
    pub directives: ast::DirectiveList,
    pub selection_set: SelectionSetIR,
    /// Enums selected anywhere in the operation, plus enums and input objects
    /// reachable from its variables
    pub lifted: LiftedDependencies,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDefinitionIR {
    pub name: Name,
    pub type_condition: NamedType,
    pub directives: ast::DirectiveList,
    pub selection_set: SelectionSetIR,
    /// Enums selected anywhere in the fragment. Fragments have no variables,
    /// so no input object is ever lifted here.
    pub lifted: LiftedDependencies,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinitionIR {
    pub name: Name,
    pub definition: Node<ast::VariableDefinition>,
    pub ty: CanonicalType,
    pub default_value: Option<EncodableValue>,
}

/// A field of a lifted input object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueIR {
    pub definition: Node<InputValueDefinition>,
    pub ty: CanonicalType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectTypeIR {
    pub definition: Node<InputObjectType>,
    pub fields: Vec<InputValueIR>,
}

/// Auxiliary types an emitter must generate for an operation or fragment to compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiftedDependencies {
    pub enums: IndexMap<NamedType, Node<EnumType>>,
    pub input_objects: IndexMap<NamedType, InputObjectTypeIR>,
}

impl FieldIR {
    /// The key under which this field appears in a response: its alias if any, its name otherwise
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.definition.description.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.definition.is_deprecated
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.definition.deprecation_reason.as_deref()
    }

    /// The field's type as declared in the schema
    pub fn declared_type(&self) -> &WrappedType {
        &self.definition.ty
    }

    pub fn is_typename(&self) -> bool {
        self.name == TYPENAME
    }

    pub(crate) fn typename(catalog: &TypeCatalog) -> Result<Self, InternalError> {
        let definition = FieldDefinition {
            description: None,
            name: Name::new(TYPENAME),
            arguments: Vec::new(),
            ty: WrappedType::named("String").non_null(),
            is_deprecated: false,
            deprecation_reason: None,
        };
        Ok(Self {
            alias: None,
            name: definition.name.clone(),
            ty: catalog.rewrap(&definition.ty)?,
            definition: Node::new(definition),
            arguments: Vec::new(),
            directives: ast::DirectiveList::new(),
        })
    }
}

impl SelectionSetIR {
    pub(crate) fn new(
        type_information: CompositeType<'_>,
        traversed_fields: Vec<Node<FieldIR>>,
    ) -> Self {
        Self {
            type_name: type_information.name().clone(),
            type_kind: type_information.kind(),
            traversed_fields,
            scalar_fields: Vec::new(),
            fragment_spreads: Vec::new(),
            object_fields: Vec::new(),
            inline_fragments: Vec::new(),
        }
    }

    /// Looks up the type this selection set is taken against
    pub fn type_information<'a>(&self, catalog: &'a TypeCatalog) -> Option<CompositeType<'a>> {
        catalog.composite_type(&self.type_name)
    }

    /// Response keys of the traversed fields, joined with `.`
    pub fn path(&self) -> String {
        let keys: Vec<&str> = self
            .traversed_fields
            .iter()
            .map(|field| field.response_key().as_str())
            .collect();
        keys.join(".")
    }

    /// Returns a copy with every list sorted by identifier, at every depth.
    ///
    /// Lowering keeps document order; emitters that want stable output sort with this.
    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted
            .scalar_fields
            .sort_by(|a, b| a.response_key().cmp(b.response_key()));
        sorted
            .fragment_spreads
            .sort_by(|a, b| a.fragment_name.cmp(&b.fragment_name));
        sorted.object_fields = self
            .object_fields
            .iter()
            .map(|object| ObjectFieldIR {
                field: object.field.clone(),
                selection_set: object.selection_set.sorted(),
                requires_disambiguation: object.requires_disambiguation,
            })
            .collect();
        sorted
            .object_fields
            .sort_by(|a, b| a.field.response_key().cmp(b.field.response_key()));
        sorted.inline_fragments = self
            .inline_fragments
            .iter()
            .map(|inline| InlineFragmentIR {
                type_condition: inline.type_condition.clone(),
                directives: inline.directives.clone(),
                selection_set: inline.selection_set.sorted(),
            })
            .collect();
        sorted
            .inline_fragments
            .sort_by_cached_key(InlineFragmentIR::type_identifier);
        sorted
    }
}

impl ObjectFieldIR {
    /// The type an emitter should give this field.
    ///
    /// When disambiguation is required, the base type name is prefixed with the
    /// field's response key, e.g. `[FriendPerson?]?` for `friend: [Person]`.
    pub fn type_identifier(&self) -> CanonicalType {
        if !self.requires_disambiguation {
            return self.field.ty.clone();
        }
        let prefix = uppercase_first(self.field.response_key());
        self.field.ty.map_base(&|base| {
            TypeBase::Named(Name::from(format!("{prefix}{}", base.target_name())))
        })
    }
}

impl InlineFragmentIR {
    /// The name of the type an emitter generates for this fragment, e.g. `AsDroidIncludeifShowDroid`
    pub fn type_identifier(&self) -> String {
        format!(
            "As{}{}",
            uppercase_first(&self.type_condition),
            self.directives.stringified()
        )
    }

    /// The name of the property holding this fragment, e.g. `asDroid`
    pub fn variable_identifier(&self) -> String {
        lowercase_first(&self.type_identifier())
    }

    /// Inline fragments on the same type with the same directives are merged
    pub(crate) fn merge_key(&self) -> (NamedType, String) {
        (self.selection_set.type_name.clone(), self.directives.stringified())
    }
}

impl OperationDefinitionIR {
    /// The suffix an emitter appends to the operation's name, e.g. `HeroQuery`
    pub fn type_name_suffix(&self) -> &'static str {
        self.operation_type.type_name_suffix()
    }
}

impl InputValueIR {
    pub fn name(&self) -> &Name {
        &self.definition.name
    }

    /// The default value as GraphQL source text
    pub fn default_value(&self) -> Option<&str> {
        self.definition.default_value.as_deref()
    }
}

impl InputObjectTypeIR {
    pub fn name(&self) -> &NamedType {
        &self.definition.name
    }
}

impl LiftedDependencies {
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.input_objects.is_empty()
    }

    /// Adds everything from `other` that is not already present
    pub fn extend(&mut self, other: LiftedDependencies) {
        for (name, def) in other.enums {
            self.enums.entry(name).or_insert(def);
        }
        for (name, def) in other.input_objects {
            self.input_objects.entry(name).or_insert(def);
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<OperationDefinitionIR>();
    assert_sync::<OperationDefinitionIR>();
    assert_send::<FragmentDefinitionIR>();
    assert_sync::<FragmentDefinitionIR>();
};
