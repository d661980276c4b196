//! The flat JSON object one entity is encoded to.

use crate::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tagweave_model::{IDENTIFIER_FIELD, TAG_FIELD};
use tagweave_types::{EntityId, Tag};

/// One encoded entity: a JSON object whose fields keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses JSON text. The top level must be an object.
    pub fn parse(json: &str) -> CodecResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(CodecError::NotAnObject),
        }
    }

    pub fn to_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    pub fn to_json_pretty(&self) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field names in document order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The entity tag. Absent, null, non-string and empty tags are all
    /// rejected.
    pub fn tag(&self, type_name: &'static str) -> CodecResult<Tag> {
        self.fields
            .get(TAG_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| Tag::new(raw).ok())
            .ok_or(CodecError::MissingTag { type_name })
    }

    /// The identifier the entity had when it was encoded, if present and
    /// well formed. Decoding never reuses it.
    #[must_use]
    pub fn identifier(&self) -> Option<EntityId> {
        self.fields
            .get(IDENTIFIER_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| EntityId::parse(raw).ok())
    }

    pub(crate) fn insert(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
