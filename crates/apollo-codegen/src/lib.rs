//! Type-checks GraphQL operations against an introspected schema and lowers them
//! into an intermediate representation for client code generation.
//!
//! ```rust
//! use apollo_codegen::{DocumentRegistry, SchemaConfiguration, TypeCatalog};
//!
//! let introspection = r#"{ "data": { "__schema": {
//!     "queryType": { "name": "Query" },
//!     "types": [{
//!         "kind": "OBJECT",
//!         "name": "Query",
//!         "interfaces": [],
//!         "fields": [{
//!             "name": "greeting",
//!             "args": [],
//!             "type": { "kind": "SCALAR", "name": "String", "ofType": null }
//!         }]
//!     }]
//! } } }"#;
//! let config = SchemaConfiguration::default();
//! let catalog = TypeCatalog::from_introspection_json(introspection, &config).unwrap();
//!
//! let mut registry = DocumentRegistry::new();
//! registry
//!     .parse_and_add(&mut config.parser(), "query Hello { greeting }", "hello.graphql")
//!     .unwrap();
//! let compiled = registry.compile(&catalog).unwrap();
//!
//! let hello = &compiled.operations["Hello"];
//! assert_eq!(hello.type_name_suffix(), "Query");
//! let scalars: Vec<_> = hello
//!     .selection_set
//!     .scalar_fields
//!     .iter()
//!     .map(|field| field.response_key().as_str())
//!     .collect();
//! assert_eq!(scalars, ["greeting", "__typename"]);
//! ```

pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod encode;
pub mod error;
pub mod ir;
mod name;
mod node;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod ty;

pub use self::config::SchemaConfiguration;
pub use self::error::CodegenError;
pub use self::error::ErrorKind;
pub use self::name::Name;
pub use self::name::NamedType;
pub use self::node::FileId;
pub use self::node::Node;
pub use self::node::NodeLocation;
pub use self::node::SourceFile;
pub use self::node::SourceMap;
pub use self::parser::Parser;
pub use self::registry::CompiledSchema;
pub use self::registry::DocumentRegistry;
pub use self::schema::TypeCatalog;
