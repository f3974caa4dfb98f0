//! GraphQL type references and their canonical, target-oriented form.

use crate::error::InternalError;
use crate::Name;
use crate::NamedType;
use std::fmt;

/// A GraphQL type reference, as written in a document or returned by introspection:
/// a named type wrapped in any number of list and non-null markers.
///
/// GraphQL forbids `NonNull(NonNull(_))`; [`rewrap`][Self::rewrap] reports it as an internal error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WrappedType {
    Named(NamedType),
    List(Box<WrappedType>),
    NonNull(Box<WrappedType>),
}

/// The rewrapped form of a [`WrappedType`], with nullability made explicit:
/// every position that GraphQL considers nullable is wrapped in `Nullable`,
/// explicit non-null markers are gone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    Value(TypeBase),
    Nullable(Box<CanonicalType>),
    List(Box<CanonicalType>),
}

/// The innermost type of a [`CanonicalType`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeBase {
    /// One of the five scalars defined by GraphQL itself
    BuiltIn(BuiltInScalar),
    /// A scalar declared by the schema, aliased under the output schema namespace
    CustomScalar { namespace: Name, name: NamedType },
    /// An object, interface, union, enum, or input object type
    Named(NamedType),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltInScalar {
    Int,
    Float,
    String,
    Boolean,
    Id,
}

impl WrappedType {
    pub fn named(name: impl Into<NamedType>) -> Self {
        Self::Named(name.into())
    }

    /// Returns this type wrapped in a list
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Returns this type wrapped in a non-null marker
    pub fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    /// Returns the named type after unwrapping every list and non-null marker
    pub fn inner_named_type(&self) -> &NamedType {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.inner_named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }

    /// Rewrap into a [`CanonicalType`], resolving the innermost name with `resolve_base`:
    ///
    /// * `Named(base)` becomes `Nullable(Value(base))`
    /// * `List(inner)` becomes `Nullable(List(inner))`
    /// * `NonNull(inner)` strips exactly one `Nullable` layer from the rewrapped `inner`
    pub fn rewrap(
        &self,
        resolve_base: &dyn Fn(&NamedType) -> TypeBase,
    ) -> Result<CanonicalType, InternalError> {
        match self {
            Self::Named(name) => Ok(CanonicalType::Value(resolve_base(name)).nullable()),
            Self::List(inner) => Ok(CanonicalType::List(Box::new(inner.rewrap(resolve_base)?))
                .nullable()),
            Self::NonNull(inner) => match inner.rewrap(resolve_base)? {
                CanonicalType::Nullable(stripped) => Ok(*stripped),
                _ => Err(InternalError::NonNullRewrap { ty: self.clone() }),
            },
        }
    }
}

impl fmt::Display for WrappedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl CanonicalType {
    fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    pub fn base(&self) -> &TypeBase {
        match self {
            Self::Value(base) => base,
            Self::Nullable(inner) | Self::List(inner) => inner.base(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Returns the same wrapping around a different base
    pub fn map_base(&self, f: &dyn Fn(&TypeBase) -> TypeBase) -> Self {
        match self {
            Self::Value(base) => Self::Value(f(base)),
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.map_base(f))),
            Self::List(inner) => Self::List(Box::new(inner.map_base(f))),
        }
    }
}

/// `Nullable` renders as a `?` suffix and `List` as brackets, e.g. `[String?]?`
impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(base) => write!(f, "{}", base.target_name()),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

impl TypeBase {
    /// The name of the GraphQL type this base was resolved from
    pub fn graphql_name(&self) -> &str {
        match self {
            Self::BuiltIn(scalar) => scalar.name(),
            Self::CustomScalar { name, .. } | Self::Named(name) => name,
        }
    }

    /// The name an emitter uses for this base
    ///
    /// Built-in scalars map to fixed primitives, custom scalars to an alias inside
    /// the output schema namespace, and every other type to its declared name.
    pub fn target_name(&self) -> String {
        match self {
            Self::BuiltIn(scalar) => scalar.primitive_name().to_owned(),
            Self::CustomScalar { namespace, name } => format!("{namespace}.{name}"),
            Self::Named(name) => name.to_string(),
        }
    }
}

impl BuiltInScalar {
    pub const ALL: [Self; 5] = [
        Self::Int,
        Self::Float,
        Self::String,
        Self::Boolean,
        Self::Id,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Int" => Some(Self::Int),
            "Float" => Some(Self::Float),
            "String" => Some(Self::String),
            "Boolean" => Some(Self::Boolean),
            "ID" => Some(Self::Id),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Id => "ID",
        }
    }

    pub fn primitive_name(self) -> &'static str {
        match self {
            Self::Int => "i32",
            Self::Float => "f64",
            Self::String => "String",
            Self::Boolean => "bool",
            // TODO: a dedicated identifier type once emitters can declare one
            Self::Id => "String",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &NamedType) -> TypeBase {
        BuiltInScalar::from_name(name)
            .map(TypeBase::BuiltIn)
            .unwrap_or_else(|| TypeBase::Named(name.clone()))
    }

    /// Every wrapping up to `depth` layers that GraphQL's grammar allows
    fn well_formed(depth: usize) -> Vec<WrappedType> {
        let mut all = vec![WrappedType::named("String"), WrappedType::named("Droid")];
        for _ in 0..depth {
            let mut next = all.clone();
            for ty in &all {
                next.push(ty.clone().list());
                if !ty.is_non_null() {
                    next.push(ty.clone().non_null());
                }
            }
            next.dedup();
            all = next;
        }
        all
    }

    #[test]
    fn named_types_are_nullable() {
        let ty = WrappedType::named("String").rewrap(&resolve).unwrap();
        assert_eq!(
            ty,
            CanonicalType::Nullable(Box::new(CanonicalType::Value(TypeBase::BuiltIn(
                BuiltInScalar::String
            ))))
        );
        assert_eq!(ty.to_string(), "String?");
    }

    #[test]
    fn non_null_strips_one_layer() {
        let ty = WrappedType::named("Int")
            .non_null()
            .list()
            .non_null()
            .rewrap(&resolve)
            .unwrap();
        assert_eq!(ty.to_string(), "[i32]");

        let ty = WrappedType::named("Droid").list().rewrap(&resolve).unwrap();
        assert_eq!(ty.to_string(), "[Droid?]?");
    }

    #[test]
    fn rewrap_outermost_layer_follows_non_null() {
        for ty in well_formed(3) {
            let canonical = ty.rewrap(&resolve).unwrap();
            assert_eq!(canonical.is_nullable(), !ty.is_non_null(), "{ty}");
            assert_eq!(canonical.base().graphql_name(), ty.inner_named_type().as_str());
        }
    }

    #[test]
    fn double_non_null_is_an_internal_error() {
        let ty = WrappedType::named("String").non_null().non_null();
        assert!(matches!(
            ty.rewrap(&resolve),
            Err(InternalError::NonNullRewrap { .. })
        ));
    }

    #[test]
    fn display_wrapped_type() {
        let ty = WrappedType::named("Episode").non_null().list().non_null();
        assert_eq!(ty.to_string(), "[Episode!]!");
        assert!(ty.is_list());
    }
}
