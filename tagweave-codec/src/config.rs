//! Codec configuration.

use crate::CodecResult;
use serde::{Deserialize, Serialize};

/// Options shared by the encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Write the entity identifier as an `Id` field.
    #[serde(default = "default_emit_identifier")]
    pub emit_identifier: bool,
    /// Fail decoding when a supported member is absent from the document.
    #[serde(default)]
    pub require_all_members: bool,
    /// Fail decoding when the document has fields the type does not declare.
    #[serde(default)]
    pub reject_unknown_fields: bool,
}

fn default_emit_identifier() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            emit_identifier: default_emit_identifier(),
            require_all_members: false,
            reject_unknown_fields: false,
        }
    }
}

impl CodecConfig {
    /// Every document must match its type's members exactly.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            require_all_members: true,
            reject_unknown_fields: true,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON. Absent fields take their defaults.
    pub fn from_json(json: &str) -> CodecResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
