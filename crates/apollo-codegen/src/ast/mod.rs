//! *Abstract Syntax Tree* for GraphQL executable documents.
//!
//! This is the already-parsed form of the operations and fragments that get
//! lowered against a [`TypeCatalog`][crate::TypeCatalog].
//! Type system definitions are only recorded by kind, so that they can be rejected:
//! the schema comes from introspection.
//!
//! ## Parsing
//!
//! Start with [`Document::parse`], or [`Parser`][crate::Parser] to change the parser configuration.
//! Definitions that the parser could not make sense of are reported as errors
//! instead of producing a partial tree.

use crate::ty::WrappedType;
use crate::Name;
use crate::NamedType;
use crate::Node;
use std::fmt;

pub(crate) mod from_cst;

#[derive(Clone, Debug)]
pub struct Document {
    /// If this document was parsed from a source file,
    /// this map contains one entry for that file and its ID.
    pub sources: crate::SourceMap,

    pub definitions: Vec<Definition>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Definition {
    OperationDefinition(Node<OperationDefinition>),
    FragmentDefinition(Node<FragmentDefinition>),
    /// Kept only so that it can be reported: the schema comes from introspection
    TypeSystemDefinition(Node<TypeSystemDefinition>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: NamedType,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

/// A schema, directive, or type definition or extension found in an executable document
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeSystemDefinition {
    /// What kind of definition this is, e.g. `an object type definition`
    pub describe: &'static str,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Node<WrappedType>,
    pub default_value: Option<Node<Value>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Selection {
    Field(Node<Field>),
    FragmentSpread(Node<FragmentSpread>),
    InlineFragment(Node<InlineFragment>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
    pub directives: DirectiveList,
    /// Empty for a field without sub-selections
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FragmentSpread {
    pub fragment_name: Name,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct InlineFragment {
    pub type_condition: Option<NamedType>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Argument {
    pub name: Name,
    pub value: Node<Value>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DirectiveList(pub Vec<Node<Directive>>);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Value {
    Null,
    Enum(Name),
    Variable(Name),
    String(String),
    /// The source text of a float literal
    Float(String),
    /// The source text of an int literal
    Int(String),
    Boolean(bool),
    List(Vec<Node<Value>>),
    Object(Vec<(Name, Node<Value>)>),
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            sources: Default::default(),
            definitions: Vec::new(),
        }
    }

    pub fn operations(&self) -> impl Iterator<Item = &Node<OperationDefinition>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::OperationDefinition(op) => Some(op),
            Definition::FragmentDefinition(_) | Definition::TypeSystemDefinition(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &Node<FragmentDefinition>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::FragmentDefinition(fragment) => Some(fragment),
            Definition::OperationDefinition(_) | Definition::TypeSystemDefinition(_) => None,
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationType {
    /// Get the name of this operation type as it would appear in GraphQL source code.
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    /// The suffix emitters append to an operation's name to name its type
    pub fn type_name_suffix(self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
            OperationType::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Field {
    /// The key under which this field appears in a response: its alias if any, its name otherwise
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

impl DirectiveList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node<Directive>> {
        self.0.iter()
    }

    /// Returns the signature of this list used to tell apart selections on the same type,
    /// such as `IncludeifShowDroid` for `@include(if: $showDroid)`.
    ///
    /// Each directive's signature is upper-cased on its first letter and concatenated.
    pub fn stringified(&self) -> String {
        self.0
            .iter()
            .map(|directive| uppercase_first(&directive.stringified()))
            .collect()
    }
}

impl Directive {
    /// The directive name followed by the concatenated signature of its arguments
    pub fn stringified(&self) -> String {
        let arguments: String = self
            .arguments
            .iter()
            .map(|argument| uppercase_first(&argument.stringified()))
            .collect();
        format!("{}{}", self.name, lowercase_first(&arguments))
    }
}

impl Argument {
    pub fn stringified(&self) -> String {
        format!("{}{}", self.name, uppercase_first(&self.value.stringified()))
    }
}

impl Value {
    /// A compact rendering used in naming signatures, not GraphQL syntax
    pub fn stringified(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Enum(name) | Value::Variable(name) => name.to_string(),
            Value::String(value) | Value::Float(value) | Value::Int(value) => value.clone(),
            Value::Boolean(value) => value.to_string(),
            Value::List(values) => {
                let joined: String = values
                    .iter()
                    .map(|value| uppercase_first(&value.stringified()))
                    .collect();
                lowercase_first(&joined)
            }
            Value::Object(fields) => {
                let joined: String = fields
                    .iter()
                    .map(|(name, value)| {
                        uppercase_first(&format!("{name}{}", uppercase_first(&value.stringified())))
                    })
                    .collect();
                lowercase_first(&joined)
            }
        }
    }
}

pub(crate) fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Document>();
    assert_sync::<Document>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(name: &str, arguments: Vec<(&str, Value)>) -> Node<Directive> {
        Node::new(Directive {
            name: Name::new(name),
            arguments: arguments
                .into_iter()
                .map(|(name, value)| {
                    Node::new(Argument {
                        name: Name::new(name),
                        value: Node::new(value),
                    })
                })
                .collect(),
        })
    }

    #[test]
    fn stringified_directives() {
        let list = DirectiveList(vec![
            directive("include", vec![("if", Value::Variable(Name::new("showDroid")))]),
            directive("skip", vec![("if", Value::Boolean(false))]),
        ]);
        assert_eq!(list.stringified(), "IncludeifShowDroidSkipifFalse");
        assert_eq!(DirectiveList::new().stringified(), "");
    }

    #[test]
    fn stringified_values() {
        let list = Value::List(vec![
            Node::new(Value::Enum(Name::new("JEDI"))),
            Node::new(Value::Int("4".into())),
        ]);
        assert_eq!(list.stringified(), "jEDI4");

        let object = Value::Object(vec![(
            Name::new("episode"),
            Node::new(Value::Enum(Name::new("empire"))),
        )]);
        assert_eq!(object.stringified(), "episodeEmpire");
        assert_eq!(Value::Null.stringified(), "null");
    }
}
