//! Errors and warnings reported while building a type catalog and lowering documents.

use crate::ast::OperationType;
use crate::ty::WrappedType;
use crate::Name;
use crate::NamedType;
use crate::NodeLocation;
use crate::SourceMap;
use std::fmt;
use std::path::PathBuf;

/// Any error that aborts code generation for a schema.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CodegenError {
    /// The schema or the configuration has an unusable shape
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A document could not be parsed
    #[error("failed to parse document `{}`: {message}\n{preview}", path.display())]
    Parsing {
        path: PathBuf,
        message: String,
        /// The document text, truncated if too long
        preview: String,
        location: Option<NodeLocation>,
        /// The document that failed to parse, so that [`location`][NodeLocation] can be rendered
        sources: SourceMap,
    },

    /// A user-authored document violates a GraphQL validation rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An internal invariant was violated, or the schema has an unsupported shape
    #[error(transparent)]
    CodeGeneration(#[from] InternalError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Parsing,
    Validation,
    CodeGeneration,
}

/// A validation rule violation, with where it happened.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub location: Option<NodeLocation>,
    /// The operation or fragment, and the fields traversed within it
    pub path: Option<SelectionPath>,
    pub data: DiagnosticData,
}

/// Structured data about a validation error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticData {
    #[error(
        "anonymous {operation_type} operations are not supported, \
         every operation must have a name"
    )]
    AnonymousOperation { operation_type: OperationType },

    #[error("an executable document must not contain {describe}")]
    TypeSystemDefinition { describe: &'static str },

    #[error("the operation `{name}` is defined multiple times in the document set")]
    OperationNameCollision { name: Name },

    #[error("the fragment `{name}` is defined multiple times in the document set")]
    FragmentNameCollision { name: Name },

    #[error(
        "operation `{operation}` is a {operation_type}, \
         but the schema does not define a {operation_type} root operation type"
    )]
    UndefinedRootOperation {
        operation: Name,
        operation_type: OperationType,
    },

    #[error(
        "type condition `{type_name}` of fragment `{fragment_name}` \
         is not an object, interface, or union type of the schema"
    )]
    UndefinedTypeCondition {
        fragment_name: Name,
        type_name: NamedType,
    },

    #[error("type `{type_name}` does not have a field `{field_name}`")]
    UndefinedField {
        type_name: NamedType,
        field_name: Name,
    },

    #[error("cannot find fragment `{name}` in this document set")]
    UndefinedFragment { name: Name },

    #[error(
        "fragment `{fragment_name}` cannot be spread here: its type condition `{type_condition}` \
         has no possible types in common with parent type `{parent_type}`"
    )]
    ImpossibleFragmentSpread {
        fragment_name: Name,
        type_condition: NamedType,
        parent_type: NamedType,
    },

    #[error(
        "type condition `{type_name}` of an inline fragment \
         is not an object, interface, or union type of the schema"
    )]
    UndefinedInlineTypeCondition { type_name: NamedType },

    #[error(
        "inline fragment on `{type_condition}` can never apply: \
         it has no possible types in common with parent type `{parent_type}`"
    )]
    ImpossibleInlineFragment {
        type_condition: NamedType,
        parent_type: NamedType,
    },

    #[error("field `{field_name}` returns {describe} `{type_name}` and must not have a selection set")]
    SubselectionOnLeafType {
        field_name: Name,
        type_name: NamedType,
        describe: &'static str,
    },

    #[error("`{literal}` cannot be represented as a finite number")]
    InvalidNumber { literal: String },

    #[error("variable `${name}` cannot be used in a constant value")]
    VariableInConstValue { name: Name },
}

/// An internal invariant was violated, or the schema's type graph has a shape
/// that cannot be represented. These do not indicate a mistake in user documents.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InternalError {
    #[error("the schema contains a top-level {kind} type, a named type can never be wrapped")]
    WrappedTopLevelType { kind: &'static str },

    #[error("type `{type_name}` referenced by `{referenced_by}` must be {expected}")]
    UnexpectedTypeKind {
        type_name: NamedType,
        referenced_by: Name,
        expected: &'static str,
    },

    #[error("possible type `{type_name}` of `{parent}` does not exist in the schema")]
    UndefinedPossibleType { type_name: NamedType, parent: Name },

    #[error("type `{type_name}` of {referenced_by} could not be resolved in the schema")]
    UnresolvedType {
        type_name: NamedType,
        referenced_by: String,
    },

    #[error("attempting to merge selection sets of different types `{type_name}` and `{other}`")]
    MergeTypeMismatch { type_name: NamedType, other: NamedType },

    #[error(
        "attempting to merge selection sets on `{type_name}` \
         reached through different fields: `{path}` and `{other}`"
    )]
    MergePathMismatch {
        type_name: NamedType,
        path: String,
        other: String,
    },

    #[error("rewrapping `{ty}` failed: a non-null type must wrap a nullable type")]
    NonNullRewrap { ty: WrappedType },
}

/// A problem worth reporting that does not prevent code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    NoPossibleTypes {
        type_name: NamedType,
        describe: &'static str,
    },
}

/// The operation or fragment being lowered, and the response keys traversed within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPath {
    pub root: ExecutableDefinitionName,
    pub nested_fields: Vec<Name>,
}

/// Designates by name a top-level definition in a document set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableDefinitionName {
    NamedOperation(OperationType, Name),
    Fragment(Name),
}

impl CodegenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Parsing { .. } => ErrorKind::Parsing,
            Self::Validation(_) => ErrorKind::Validation,
            Self::CodeGeneration(_) => ErrorKind::CodeGeneration,
        }
    }

    /// Returns the location in a parsed document this error points to, if any
    pub fn location(&self) -> Option<NodeLocation> {
        match self {
            Self::Parsing { location, .. } => *location,
            Self::Validation(error) => error.location,
            Self::Configuration { .. } | Self::CodeGeneration(_) => None,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl ValidationError {
    pub fn new(location: Option<NodeLocation>, data: DiagnosticData) -> Self {
        Self {
            location,
            path: None,
            data,
        }
    }

    pub fn with_path(mut self, path: SelectionPath) -> Self {
        self.path = Some(path);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.data.fmt(f)?;
        if let Some(path) = &self.path {
            write!(f, " (at {path})")?
        }
        Ok(())
    }
}

impl From<DiagnosticData> for CodegenError {
    fn from(data: DiagnosticData) -> Self {
        Self::Validation(ValidationError::new(None, data))
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoPossibleTypes {
                type_name,
                describe,
            } => write!(f, "{describe} `{type_name}` has no possible types"),
        }
    }
}

impl fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            ExecutableDefinitionName::NamedOperation(operation_type, name) => {
                write!(f, "{operation_type} {name}")?
            }
            ExecutableDefinitionName::Fragment(name) => write!(f, "fragment {name}")?,
        }
        for name in &self.nested_fields {
            write!(f, " → {name}")?
        }
        Ok(())
    }
}
