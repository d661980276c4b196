//! Core key types for tagweave.
//!
//! This crate defines the keys every other layer agrees on:
//! - [`EntityId`]: the opaque surrogate key assigned once when an entity is created
//! - [`Tag`]: the stable, type-unique string an entity is referenced by in documents
//! - [`TypeKey`]: runtime identity of an entity type, used to route references
//!   to the registry that owns them

mod ids;
mod tag;
mod type_key;

pub use ids::EntityId;
pub use tag::Tag;
pub use type_key::TypeKey;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing key types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tag must not be empty")]
    EmptyTag,

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
