use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A GraphQL identifier: the name of a type, field, fragment, operation, or argument.
///
/// Cloning is cheap (reference-counted). Equality, ordering, and hashing are by value,
/// and `Name` implements `Borrow<str>` so maps keyed by `Name` can be queried with `&str`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

/// Refers to the name of a GraphQL type defined elsewhere
pub type NamedType = Name;

impl Name {
    pub fn new(value: &str) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the name of a meta-field or introspection type, like `__typename`
    pub fn is_introspection(&self) -> bool {
        self.0.starts_with("__")
    }
}

/// Create a [`Name`] from a string literal.
///
/// ```
/// let name = apollo_codegen::name!("__typename");
/// assert_eq!(name, "__typename");
/// ```
#[macro_export]
macro_rules! name {
    ($value: expr) => {
        $crate::Name::new($value)
    };
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&Name> for Name {
    fn from(value: &Name) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl serde::Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn names_compare_by_value() {
        let a = Name::new("Droid");
        let b: Name = String::from("Droid").into();
        assert_eq!(a, b);
        assert_eq!(a, "Droid");

        let mut map = IndexMap::new();
        map.insert(a, 1);
        assert_eq!(map.get("Droid"), Some(&1));
    }

    #[test]
    fn introspection_names() {
        assert!(name!("__typename").is_introspection());
        assert!(!name!("typename").is_introspection());
    }
}
