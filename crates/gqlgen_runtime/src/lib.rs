//! Runtime support for code generated by gqlgen.
//!
//! Generated `types.rs` and `schema.rs` files refer to this crate for:
//! - `scalar`: The contract custom scalars implement
//! - `input`: Decoding resolver arguments from engine values
//! - `output`: Converting resolver results into engine field values
//! - `literal`: Building SDL default values
//!
//! plus the small set of names every generated signature uses:
//! [`ResolveInfo`], [`Result`], [`AnyStream`] and [`IntoAny`].

pub mod input;
pub mod literal;
pub mod output;
pub mod scalar;

use std::any::Any;
use std::pin::Pin;

pub use async_graphql;
pub use async_trait::async_trait;
pub use scalar::{assert_scalar, GraphQLScalar};
pub use serde;

/// Per-request execution information handed to every resolver.
pub type ResolveInfo<'a> = async_graphql::Context<'a>;

/// Result type of every resolver. Errors reach the engine unchanged.
pub type Result<T, E = async_graphql::Error> = std::result::Result<T, E>;

/// A type-erased, lazily evaluated asynchronous sequence returned by
/// subscription resolvers.
///
/// Nothing runs until the engine polls it. Dropping it cancels the
/// subscription.
pub type AnyStream<T> = Pin<Box<dyn futures::Stream<Item = Result<T>> + Send + 'static>>;

/// Boxes a stream into an [`AnyStream`].
pub fn any_stream<T, S>(stream: S) -> AnyStream<T>
where
    S: futures::Stream<Item = Result<T>> + Send + 'static,
{
    Box::pin(stream)
}

/// Type erasure for generated existentials.
///
/// Every generated interface, object and union trait extends this trait, so
/// a `Box<dyn UserObject>` can be turned back into the concrete value when an
/// interface or union is discriminated.
pub trait IntoAny: Any + Send + Sync {
    /// Erases the value.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Returns the concrete type's name, for error messages.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> IntoAny for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A resolver returned a value whose concrete type is not registered as an
/// implementer of the interface or union it was returned as.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{type_name}` is not a known implementer of `{abstract_type}`")]
pub struct UnknownImplementer {
    /// The GraphQL interface or union.
    pub abstract_type: &'static str,
    /// The Rust type of the returned value.
    pub type_name: &'static str,
}

impl UnknownImplementer {
    #[must_use]
    pub const fn new(abstract_type: &'static str, type_name: &'static str) -> Self {
        Self {
            abstract_type,
            type_name,
        }
    }
}
