//! Deserialization of the JSON result of the standard introspection query.
//!
//! These types mirror the `__Schema` and `__Type` shapes closely and keep each
//! type reference's `kind`, so that [`TypeCatalog`][crate::TypeCatalog] construction
//! can check that references point at types of the expected kind.

use crate::error::CodegenError;
use crate::ty::WrappedType;
use crate::Name;
use serde::de;
use serde::Deserialize;
use serde_json_bytes::serde_json;

/// The `__schema` object of an introspection response.
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct Schema {
    pub queryType: Option<NamedTypeRef>,
    #[serde(default)]
    pub mutationType: Option<NamedTypeRef>,
    #[serde(default)]
    pub subscriptionType: Option<NamedTypeRef>,
    pub types: Vec<TypeDef>,
}

/// A reference to a named type, as in `queryType { name }` or `possibleTypes { ...TypeRef }`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedTypeRef {
    #[serde(default)]
    pub kind: Option<TypeKind>,
    pub name: Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
pub enum TypeKind {
    SCALAR,
    OBJECT,
    INTERFACE,
    UNION,
    ENUM,
    INPUT_OBJECT,
    LIST,
    NON_NULL,
}

// fragment FullType on __Type {
//   kind
//   name
//   description
//   fields(includeDeprecated: true) { ... }
//   inputFields { ...InputValue }
//   interfaces { ...TypeRef }
//   enumValues(includeDeprecated: true) { ... }
//   possibleTypes { ...TypeRef }
// }
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct TypeDef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<Name>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldDef>>,
    #[serde(default)]
    pub inputFields: Option<Vec<InputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<NamedTypeRef>>,
    #[serde(default)]
    pub enumValues: Option<Vec<EnumValue>>,
    #[serde(default)]
    pub possibleTypes: Option<Vec<NamedTypeRef>>,
    #[serde(default)]
    pub specifiedByURL: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct FieldDef {
    pub name: Name,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub isDeprecated: bool,
    #[serde(default)]
    pub deprecationReason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct InputValue {
    pub name: Name,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub defaultValue: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct EnumValue {
    pub name: Name,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub isDeprecated: bool,
    #[serde(default)]
    pub deprecationReason: Option<String>,
}

/// A possibly wrapped type reference, flattened from the nested `ofType` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef(pub WrappedType);

impl Schema {
    /// Deserialize the introspection result from JSON text.
    ///
    /// Accepts the `__schema` object itself, an object with a `__schema` key,
    /// or a full GraphQL response with `data.__schema`.
    pub fn from_json(json: &str) -> Result<Self, CodegenError> {
        let mut value: serde_json::Value = serde_json::from_str(json).map_err(|err| {
            CodegenError::configuration(format!("introspection result is not valid JSON: {err}"))
        })?;
        if let Some(data) = value.get_mut("data") {
            value = data.take();
        }
        if let Some(schema) = value.get_mut("__schema") {
            value = schema.take();
        }
        serde_json::from_value(value).map_err(|err| {
            CodegenError::configuration(format!("malformed introspection result: {err}"))
        })
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // fragment TypeRef on __Type {
        //   kind
        //   name
        //   ofType { ...TypeRef }
        // }

        #[derive(Deserialize)]
        #[allow(non_camel_case_types)]
        enum Field {
            kind,
            name,
            ofType,
            #[serde(other)]
            other,
        }

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = TypeRef;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a TypeRef field")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut kind = None;
                let mut name = None;
                let mut of_type = None;
                while let Some(field) = map.next_key()? {
                    match field {
                        Field::kind => kind = Some(map.next_value()?),
                        Field::name => name = Some(map.next_value()?),
                        Field::ofType => of_type = Some(map.next_value()?),
                        Field::other => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                let kind: TypeKind = kind.ok_or_else(|| de::Error::missing_field("kind"))?;
                let name: Option<Name> = name.flatten();
                let of_type: Option<TypeRef> = of_type.flatten();
                Ok(TypeRef(match kind {
                    TypeKind::SCALAR
                    | TypeKind::OBJECT
                    | TypeKind::INTERFACE
                    | TypeKind::UNION
                    | TypeKind::ENUM
                    | TypeKind::INPUT_OBJECT => WrappedType::Named(
                        name.ok_or_else(|| de::Error::custom("missing type name"))?,
                    ),
                    TypeKind::LIST => of_type
                        .ok_or_else(|| de::Error::custom("invalid {kind: LIST, ofType: null}"))?
                        .0
                        .list(),
                    TypeKind::NON_NULL => of_type
                        .ok_or_else(|| de::Error::custom("invalid {kind: NON_NULL, ofType: null}"))?
                        .0
                        .non_null(),
                }))
            }
        }

        deserializer.deserialize_struct("TypeRef", &["kind", "name", "ofType"], Visitor)
    }
}

impl TypeKind {
    /// How this kind is named in messages, e.g. "input object"
    pub fn describe(self) -> &'static str {
        match self {
            TypeKind::SCALAR => "scalar",
            TypeKind::OBJECT => "object",
            TypeKind::INTERFACE => "interface",
            TypeKind::UNION => "union",
            TypeKind::ENUM => "enum",
            TypeKind::INPUT_OBJECT => "input object",
            TypeKind::LIST => "list",
            TypeKind::NON_NULL => "non-null",
        }
    }
}
