use crate::Name;
use crate::Parser;
use serde::Deserialize;

/// The namespace custom scalar aliases live in unless configured otherwise
pub const DEFAULT_OUTPUT_SCHEMA_NAME: &str = "GraphQLSchema";

/// Per-schema settings, deserialized from a surrounding tool's own configuration.
///
/// ```
/// let config: apollo_codegen::SchemaConfiguration =
///     serde_json::from_str(r#"{ "outputSchemaName": "StarWars", "recursionLimit": 64 }"#)
///         .unwrap();
/// assert_eq!(config.output_schema_name, "StarWars");
/// assert_eq!(config.token_limit, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaConfiguration {
    /// Namespace for custom scalar aliases
    pub output_schema_name: Name,
    pub recursion_limit: Option<usize>,
    pub token_limit: Option<usize>,
}

impl SchemaConfiguration {
    /// A parser configured with this schema's limits
    pub fn parser(&self) -> Parser {
        let mut parser = Parser::new();
        if let Some(limit) = self.recursion_limit {
            parser = parser.recursion_limit(limit)
        }
        if let Some(limit) = self.token_limit {
            parser = parser.token_limit(limit)
        }
        parser
    }
}

impl Default for SchemaConfiguration {
    fn default() -> Self {
        Self {
            output_schema_name: Name::new(DEFAULT_OUTPUT_SCHEMA_NAME),
            recursion_limit: None,
            token_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: SchemaConfiguration = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SchemaConfiguration::default());
        assert_eq!(config.output_schema_name, "GraphQLSchema");
    }
}
