//! Shallow encoding of one entity to one document.

use crate::{CodecConfig, CodecError, CodecResult, Document, LoadSession};
use serde_json::Value;
use tagweave_model::{Entity, IDENTIFIER_FIELD, ModelError, TAG_FIELD};
use tagweave_registry::EntityRegistry;
use tracing::{debug, trace};

/// Renders entities as flat documents.
///
/// Encoding reads the entity and nothing else: references are written as the
/// target's tag, taken from the handle, so encoding an entity never visits
/// the entities it refers to.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes `entity`: `Id` (unless disabled), then `Tag`, then every
    /// supported member in declaration order.
    pub fn encode<T: Entity>(&self, entity: &T) -> CodecResult<Document> {
        let type_name = T::TYPE_NAME;
        if entity.tag().is_unset() {
            return Err(CodecError::MissingTag { type_name });
        }

        let mut document = Document::new();
        if self.config.emit_identifier {
            document.insert(IDENTIFIER_FIELD, Value::String(entity.id().to_string()));
        }
        document.insert(TAG_FIELD, Value::String(entity.tag().to_string()));

        for member in T::descriptor().members() {
            match member.encode(entity) {
                Some(Ok(value)) => document.insert(member.name(), value),
                Some(Err(ModelError::UnsetReference { .. })) => {
                    return Err(CodecError::InvalidReference {
                        type_name,
                        member: member.name(),
                    });
                }
                Some(Err(source)) => {
                    return Err(CodecError::Member {
                        type_name,
                        member: member.name(),
                        source,
                    });
                }
                None => trace!("Skipping unsupported member {}.{}", type_name, member.name()),
            }
        }
        Ok(document)
    }

    /// Encodes `entity` to compact JSON text.
    pub fn encode_to_string<T: Entity>(&self, entity: &T) -> CodecResult<String> {
        self.encode(entity)?.to_json()
    }

    /// Encodes every complete entity of a registry, in registration order.
    pub fn encode_all<T: Entity>(&self, registry: &EntityRegistry<T>) -> CodecResult<Vec<Document>> {
        let documents = registry
            .iter()
            .map(|entity| self.encode(entity))
            .collect::<CodecResult<Vec<_>>>()?;
        debug!("Encoded {} {} documents", documents.len(), T::TYPE_NAME);
        Ok(documents)
    }

    /// Encodes every complete entity in the session as `(type name, document)`
    /// pairs, type by type in registration order.
    pub fn encode_session(
        &self,
        session: &LoadSession,
    ) -> CodecResult<Vec<(&'static str, Document)>> {
        let mut out = Vec::new();
        for (type_name, encode) in session.encoders() {
            out.extend(encode(self, session)?.into_iter().map(|doc| (type_name, doc)));
        }
        Ok(out)
    }
}

pub(crate) fn encode_erased<T: Entity>(
    encoder: &Encoder,
    session: &LoadSession,
) -> CodecResult<Vec<Document>> {
    encoder.encode_all(session.registry::<T>()?)
}
