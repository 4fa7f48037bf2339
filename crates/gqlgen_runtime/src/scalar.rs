//! The custom scalar contract.
//!
//! For every `scalar S` in the schema, the generated code expects a Rust type
//! `scalars::S` implementing [`GraphQLScalar`]. The three bridges map onto the
//! engine's scalar hooks:
//!
//! | Bridge | Used for |
//! |--------|----------|
//! | [`GraphQLScalar::serialize`] | resolver results |
//! | [`GraphQLScalar::parse_value`] | argument values before decoding |
//! | [`GraphQLScalar::parse_literal`] | input validation of literals and variables |
//!
//! All three default to the serde representation, so most scalars only need
//! `impl GraphQLScalar for S {}`.

use crate::Result;
use async_graphql::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A custom scalar.
pub trait GraphQLScalar: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Converts a resolved value to its wire form.
    ///
    /// `serde::Serialize` has a method of the same name, so call this one as
    /// `GraphQLScalar::serialize(&value)`.
    fn serialize(&self) -> Result<Value> {
        async_graphql::to_value(self).map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    /// Normalizes an input value before it is decoded into `Self`.
    fn parse_value(value: Value) -> Result<Value> {
        Ok(value)
    }

    /// Checks an input value as written in a query or variables.
    ///
    /// The engine's validator hook only reports pass or fail, so a client
    /// that sends a rejected literal sees the engine's generic
    /// `Invalid value for argument` error, not the message returned here.
    /// Errors [`GraphQLScalar::parse_value`] raises while an argument is
    /// decoded keep the scalar's message.
    fn parse_literal(value: &Value) -> Result<Value> {
        let parsed = Self::parse_value(value.clone())?;
        async_graphql::from_value::<Self>(parsed.clone())
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(parsed)
    }
}

/// Compile-time check that a type implements [`GraphQLScalar`].
pub const fn assert_scalar<S: GraphQLScalar>() {}

/// Engine validator for scalar `S`.
#[must_use]
pub fn validator<S: GraphQLScalar>(value: &Value) -> bool {
    S::parse_literal(value).is_ok()
}
