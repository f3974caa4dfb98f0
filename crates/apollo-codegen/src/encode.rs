//! Input values in the shape they are sent over the wire.

use crate::ast;
use crate::error::CodegenError;
use crate::error::DiagnosticData;
use crate::error::ValidationError;
use crate::Name;
use crate::Node;
use indexmap::IndexMap;
use serde::Serialize;

/// Re-export of the version of the `serde_json_bytes` crate used for [`JsonValue`]
pub use serde_json_bytes;

/// A JSON-compatible dynamically-typed value.
pub type JsonValue = serde_json_bytes::Value;

/// A GraphQL input value with every variable resolved away,
/// ready to be serialized as part of a request's `variables`.
///
/// Serializes to the plain JSON shape: `Map` becomes an object, `List` an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EncodableValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<EncodableValue>),
    Map(IndexMap<Name, EncodableValue>),
}

impl EncodableValue {
    /// Converts a literal from a document, such as a variable's default value.
    ///
    /// Enum values become strings. Variables are not allowed in constant positions.
    pub fn from_const_value(value: &Node<ast::Value>) -> Result<Self, CodegenError> {
        let error = |data: DiagnosticData| -> CodegenError {
            ValidationError::new(value.location(), data).into()
        };
        Ok(match &**value {
            ast::Value::Null => Self::Null,
            ast::Value::Variable(name) => {
                return Err(error(DiagnosticData::VariableInConstValue { name: name.clone() }))
            }
            ast::Value::Enum(value) => Self::String(value.to_string()),
            ast::Value::String(value) => Self::String(value.clone()),
            ast::Value::Boolean(value) => Self::Bool(*value),
            ast::Value::Int(literal) => match literal.parse() {
                Ok(int) => Self::Int(int),
                Err(_) => Self::Float(parse_float(literal).map_err(error)?),
            },
            ast::Value::Float(literal) => Self::Float(parse_float(literal).map_err(error)?),
            ast::Value::List(values) => Self::List(
                values
                    .iter()
                    .map(Self::from_const_value)
                    .collect::<Result<_, _>>()?,
            ),
            ast::Value::Object(fields) => Self::Map(
                fields
                    .iter()
                    .map(|(name, value)| Ok((name.clone(), Self::from_const_value(value)?)))
                    .collect::<Result<_, CodegenError>>()?,
            ),
        })
    }

    /// Converts to a dynamically-typed JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(value) => (*value).into(),
            Self::Int(value) => JsonValue::Number((*value).into()),
            Self::Float(value) => serde_json_bytes::serde_json::Number::from_f64(*value)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::String(value) => value.as_str().into(),
            Self::List(values) => values.iter().map(Self::to_json).collect(),
            Self::Map(fields) => fields
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_json()))
                .collect(),
        }
    }
}

fn parse_float(literal: &str) -> Result<f64, DiagnosticData> {
    match literal.parse::<f64>() {
        Ok(float) if float.is_finite() => Ok(float),
        _ => Err(DiagnosticData::InvalidNumber {
            literal: literal.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn value(value: ast::Value) -> Node<ast::Value> {
        Node::new(value)
    }

    #[test]
    fn literals_encode_to_wire_shape() {
        let literal = value(ast::Value::Object(vec![
            (Name::new("episode"), value(ast::Value::Enum(Name::new("JEDI")))),
            (
                Name::new("stars"),
                value(ast::Value::List(vec![
                    value(ast::Value::Int("5".into())),
                    value(ast::Value::Float("4.5".into())),
                    value(ast::Value::Null),
                ])),
            ),
            (Name::new("reviewed"), value(ast::Value::Boolean(true))),
        ]));
        let encoded = EncodableValue::from_const_value(&literal).unwrap();
        let json = serde_json::to_string(&encoded).unwrap();
        assert_eq!(
            json,
            r#"{"episode":"JEDI","stars":[5,4.5,null],"reviewed":true}"#
        );
        assert_eq!(
            serde_json::to_string(&encoded.to_json()).unwrap(),
            json
        );
    }

    #[test]
    fn variables_are_rejected_in_constants() {
        let literal = value(ast::Value::List(vec![value(ast::Value::Variable(
            Name::new("episode"),
        ))]));
        let err = EncodableValue::from_const_value(&literal).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "variable `$episode` cannot be used in a constant value"
        );
    }

    #[test]
    fn oversized_ints_fall_back_to_floats() {
        let literal = value(ast::Value::Int("99999999999999999999".into()));
        assert_eq!(
            EncodableValue::from_const_value(&literal).unwrap(),
            EncodableValue::Float(1e20)
        );
    }
}
