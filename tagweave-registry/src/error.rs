//! Error types for registry operations.

use std::fmt;
use tagweave_types::{EntityId, Tag};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// The key a registry conflict occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryKey {
    Identifier(EntityId),
    Tag(Tag),
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(id) => write!(f, "identifier {id}"),
            Self::Tag(tag) => write!(f, "tag '{tag}'"),
        }
    }
}

/// Registry contract violations. Any of these aborts the current load.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An entity without a tag cannot be registered.
    #[error("{type_name} entity has an empty tag")]
    EmptyTag { type_name: &'static str },

    /// A different entity already holds the identifier or tag.
    #[error("{type_name}: {key} is already registered to a different entity")]
    DuplicateKey {
        type_name: &'static str,
        key: RegistryKey,
    },

    /// A placeholder holds the tag and the entity being registered is not it.
    #[error("{type_name}: tag '{tag}' is held by a pending placeholder")]
    PartialStillPending { type_name: &'static str, tag: Tag },
}
