//! Error types for encoding and decoding.

use std::fmt;
use tagweave_model::ModelError;
use tagweave_registry::RegistryError;
use tagweave_types::Tag;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// A placeholder still pending when a load finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTag {
    pub type_name: &'static str,
    pub tag: Tag,
}

impl fmt::Display for PendingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.type_name, self.tag)
    }
}

fn describe_pending(pending: &[PendingTag]) -> String {
    let names: Vec<String> = pending.iter().map(ToString::to_string).collect();
    format!("{} never decoded: {}", names.len(), names.join(", "))
}

/// Errors that can occur while encoding or decoding documents.
///
/// Any error returned during a load leaves the session's registries partially
/// linked; callers discard or reset the session rather than continue.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A reference member points at an entity without a tag.
    #[error("{type_name}.{member}: referenced entity has no tag")]
    InvalidReference {
        type_name: &'static str,
        member: &'static str,
    },

    /// The document's tag belongs to an entity that is already complete.
    #[error("{type_name} '{tag}' is already complete")]
    AlreadyComplete { type_name: &'static str, tag: Tag },

    /// Referenced tags whose own documents were never decoded.
    #[error("unresolved placeholders at end of load, {}", describe_pending(.pending))]
    UnresolvedPartials { pending: Vec<PendingTag> },

    /// Registry contract violation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A member value could not be encoded or decoded.
    #[error("{type_name}.{member}: {source}")]
    Member {
        type_name: &'static str,
        member: &'static str,
        #[source]
        source: ModelError,
    },

    /// The entity or document has no usable tag.
    #[error("{type_name} has no usable tag")]
    MissingTag { type_name: &'static str },

    /// A supported member is absent and the config requires all members.
    #[error("document for {type_name} is missing member {member}")]
    MissingMember {
        type_name: &'static str,
        member: &'static str,
    },

    /// The document has a field the type does not declare.
    #[error("document for {type_name} has unknown field '{field}'")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    /// The entity type was never registered in the session.
    #[error("entity type not registered in session: {0}")]
    UnknownType(String),

    /// Another type is already registered under this name.
    #[error("entity type name already registered: {0}")]
    DuplicateType(&'static str),

    /// The JSON text is not an object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// JSON syntax error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
