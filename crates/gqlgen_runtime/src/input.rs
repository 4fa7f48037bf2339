//! Argument decoding.
//!
//! Generated field resolvers build one decoder per argument from these
//! combinators, mirroring the argument's GraphQL type:
//!
//! ```
//! use gqlgen_runtime::async_graphql::Value;
//! use gqlgen_runtime::input;
//!
//! // [Int!]
//! let decode = input::nullable(input::list(input::value::<i32>()));
//! let value = Value::List(vec![Value::from(1), Value::from(2)]);
//! assert_eq!(decode(value).unwrap(), Some(vec![1, 2]));
//! ```

use crate::scalar::GraphQLScalar;
use crate::Result;
use async_graphql::dynamic::ObjectAccessor;
use async_graphql::{Name, Value};
use serde::de::DeserializeOwned;

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    async_graphql::from_value(value).map_err(|e| async_graphql::Error::new(e.to_string()))
}

/// Decodes a value through its serde representation. Used for built-in
/// scalars, enums and input objects.
pub fn value<T: DeserializeOwned>() -> impl Fn(Value) -> Result<T> + Copy + Send + Sync {
    from_value::<T>
}

/// Decodes a custom scalar, running [`GraphQLScalar::parse_value`] first.
pub fn scalar<S: GraphQLScalar>() -> impl Fn(Value) -> Result<S> + Copy + Send + Sync {
    |value| from_value(S::parse_value(value)?)
}

/// Maps `null` to `None`.
pub fn nullable<T, F>(inner: F) -> impl Fn(Value) -> Result<Option<T>>
where
    F: Fn(Value) -> Result<T>,
{
    move |value| match value {
        Value::Null => Ok(None),
        value => inner(value).map(Some),
    }
}

/// Decodes every element of a list.
///
/// A single non-list value is accepted as a list of one, as GraphQL input
/// coercion requires.
pub fn list<T, F>(inner: F) -> impl Fn(Value) -> Result<Vec<T>>
where
    F: Fn(Value) -> Result<T>,
{
    move |value| match value {
        Value::List(items) => items.into_iter().map(&inner).collect(),
        value => Ok(vec![inner(value)?]),
    }
}

/// Decodes argument `name`. An absent argument decodes as `null`.
pub fn argument<T>(args: &ObjectAccessor<'_>, name: &str, decode: impl Fn(Value) -> Result<T>) -> Result<T> {
    let value = args
        .get(name)
        .map_or(Value::Null, |accessor| accessor.as_value().clone());
    decode(value).map_err(|e| invalid(name, &e))
}

/// Decodes argument `name`, using `default` when the argument is absent.
pub fn argument_or<T>(
    args: &ObjectAccessor<'_>,
    name: &str,
    decode: impl Fn(Value) -> Result<T>,
    default: impl FnOnce() -> Value,
) -> Result<T> {
    let value = args
        .get(name)
        .map_or_else(default, |accessor| accessor.as_value().clone());
    decode(value).map_err(|e| invalid(name, &e))
}

/// Runs `fill` on a value before decoding it. Generated code passes the
/// default filler of an input object whose fields carry SDL defaults.
pub fn with_defaults<T, F>(fill: fn(&mut Value), decode: F) -> impl Fn(Value) -> Result<T>
where
    F: Fn(Value) -> Result<T>,
{
    move |mut value| {
        fill(&mut value);
        decode(value)
    }
}

/// Inserts `field` into an input object value when it is absent.
pub fn fill_default(value: &mut Value, field: &str, default: impl FnOnce() -> Value) {
    if let Value::Object(fields) = value {
        if !fields.contains_key(field) {
            fields.insert(Name::new(field), default());
        }
    }
}

/// Runs `fill` on the value of `field`, or on each element when it is a list.
pub fn fill_nested(value: &mut Value, field: &str, fill: fn(&mut Value)) {
    fn each(value: &mut Value, fill: fn(&mut Value)) {
        match value {
            Value::List(items) => items.iter_mut().for_each(|item| each(item, fill)),
            value => fill(value),
        }
    }

    if let Value::Object(fields) = value {
        if let Some(nested) = fields.get_mut(field) {
            each(nested, fill);
        }
    }
}

fn invalid(name: &str, error: &async_graphql::Error) -> async_graphql::Error {
    async_graphql::Error::new(format!(
        "invalid value for argument \"{name}\": {}",
        error.message
    ))
}
