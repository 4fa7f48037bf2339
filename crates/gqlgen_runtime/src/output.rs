//! Resolver result conversion.
//!
//! The counterpart of [`crate::input`]: each combinator turns a resolver's
//! Rust value into the engine's [`FieldValue`], following the field's GraphQL
//! type. Objects travel as their existential (`Box<dyn UserObject>`) so the
//! next level of resolvers can downcast the parent value.

use crate::scalar::GraphQLScalar;
use crate::{AnyStream, Result};
use async_graphql::dynamic::FieldValue;
use async_graphql::{Name, Value};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::any::Any;
use std::fmt::Display;

/// Converts a built-in scalar through its serde representation.
pub fn value<'a, T: Serialize>() -> impl Fn(T) -> Result<FieldValue<'a>> + Copy + Send + Sync {
    |value: T| {
        async_graphql::to_value(&value)
            .map(FieldValue::value)
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}

/// Converts an enum to an enum value named by its `Display` form.
pub fn enumeration<'a, E: Display>() -> impl Fn(E) -> Result<FieldValue<'a>> + Copy + Send + Sync {
    |value: E| Ok(FieldValue::value(Value::Enum(Name::new(value.to_string()))))
}

/// Converts a custom scalar with [`GraphQLScalar::serialize`].
pub fn scalar<'a, S: GraphQLScalar>() -> impl Fn(S) -> Result<FieldValue<'a>> + Copy + Send + Sync {
    |value: S| GraphQLScalar::serialize(&value).map(FieldValue::value)
}

/// Wraps an object existential so field resolvers below can downcast it.
pub fn object<'a, T: Any + Send + Sync>() -> impl Fn(T) -> Result<FieldValue<'a>> + Copy + Send + Sync {
    |value: T| Ok(FieldValue::owned_any(value))
}

/// Maps `None` to `null`.
pub fn nullable<'a, T, F>(inner: F) -> impl Fn(Option<T>) -> Result<FieldValue<'a>>
where
    F: Fn(T) -> Result<FieldValue<'a>>,
{
    move |value| match value {
        Some(value) => inner(value),
        None => Ok(FieldValue::NULL),
    }
}

/// Converts every element of a list.
pub fn list<'a, T, F>(inner: F) -> impl Fn(Vec<T>) -> Result<FieldValue<'a>>
where
    F: Fn(T) -> Result<FieldValue<'a>>,
{
    move |values| {
        let items = values.into_iter().map(&inner).collect::<Result<Vec<_>>>()?;
        Ok(FieldValue::list(items))
    }
}

/// Converts every item of a subscription stream, preserving order.
///
/// The returned stream owns `stream`; dropping it drops the producer.
pub fn stream<'a, T, F>(stream: AnyStream<T>, convert: F) -> impl Stream<Item = Result<FieldValue<'a>>> + Send + 'a
where
    T: 'static,
    F: Fn(T) -> Result<FieldValue<'a>> + Send + 'a,
{
    stream.map(move |item| item.and_then(&convert))
}
