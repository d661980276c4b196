//! Error types for member encoding and decoding.

use crate::ScalarKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while converting a single member value.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The JSON value has the wrong type for the member.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A non-nullable member was given `null`.
    #[error("unexpected null for a non-nullable member")]
    UnexpectedNull,

    /// The value has the right JSON type but cannot be represented.
    #[error("invalid {kind} value: {detail}")]
    InvalidScalar { kind: ScalarKind, detail: String },

    /// A reference handle has no tag to encode.
    #[error("reference to {type_name} has no tag")]
    UnsetReference { type_name: &'static str },

    /// A tag read from a document is not a valid tag.
    #[error("invalid tag: {0}")]
    InvalidTag(#[from] tagweave_types::Error),

    /// No registry is available for the referenced type.
    #[error("no registry for referenced type {0}")]
    UnknownTargetType(&'static str),

    /// The resolver could not produce a live reference.
    #[error("could not resolve {type_name} '{tag}': {reason}")]
    Resolution {
        type_name: &'static str,
        tag: String,
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn mismatch(expected: &'static str, found: &serde_json::Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: json_kind(found),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "decimal",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
