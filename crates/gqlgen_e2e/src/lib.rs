//! Bindings generated from `schema/scenarios.graphql` by the build script,
//! together with the context and scalar types they refer to.
//!
//! The generated modules are compiled exactly as written, so any change to
//! the emitters that breaks user crates breaks this crate first.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Request data every resolver reads.
#[derive(Debug, Default)]
pub struct Context {
    pub greeting: String,
    /// Set once a subscription producer has been dropped.
    pub dropped: Arc<AtomicBool>,
}

pub mod scalars {
    use gqlgen_runtime::async_graphql::Value;
    use gqlgen_runtime::{GraphQLScalar, Result};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EmailAddress(pub String);

    impl GraphQLScalar for EmailAddress {
        fn parse_value(value: Value) -> Result<Value> {
            match &value {
                Value::String(s) if s.contains('@') => Ok(value),
                Value::String(s) => Err(format!("`{s}` is not an email address").into()),
                _ => Err("email addresses are strings".into()),
            }
        }
    }
}

pub mod graphql {
    pub mod types {
        include!(concat!(env!("OUT_DIR"), "/graphql/types.rs"));
    }

    pub mod schema {
        include!(concat!(env!("OUT_DIR"), "/graphql/schema.rs"));
    }

    pub mod sdl {
        include!(concat!(env!("OUT_DIR"), "/graphql/sdl.rs"));
    }
}
