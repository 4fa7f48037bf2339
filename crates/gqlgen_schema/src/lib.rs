//! Schema layer for gqlgen.
//!
//! This crate provides:
//! - `types`: The immutable schema graph handed to code generation
//! - `builder`: SDL document to schema graph, with validation
//!
//! ```
//! let result = gqlgen_schema::build_schema("type Query { hello: String }");
//! let schema = result.schema.unwrap();
//! assert_eq!(schema.query, "Query");
//! ```

pub mod builder;
pub mod types;

pub use builder::{build_schema, BuildResult, SchemaBuilder};
pub use types::{
    ConstValue, EnumType, EnumValue, Field, InputObjectType, InputValue, InterfaceType,
    NamedType, ObjectType, OperationType, ScalarType, Schema, TypeExpr, TypeKind, UnionType,
    BUILTIN_SCALARS, DEFAULT_DEPRECATION_REASON,
};
