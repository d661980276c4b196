//! Decoding one document into one entity.

use crate::{CodecConfig, CodecError, CodecResult, Document, LoadSession};
use tagweave_model::{Entity, Ref};
use tagweave_registry::EntryState;
use tagweave_types::EntityId;
use tracing::{debug, trace};

/// Fills entities from documents, resolving references through a
/// [`LoadSession`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decodes the document of one `T` and registers it as complete.
    ///
    /// If earlier documents referenced this tag, the placeholder they share
    /// is completed in place and keeps its identifier, so their references
    /// now point at the populated entity. Otherwise a fresh entity is
    /// registered. The document's `Id` field is ignored.
    ///
    /// Reference members resolve through the session without decoding the
    /// target's document, which may come later or be this same document.
    pub fn decode_into<T: Entity>(
        &self,
        session: &mut LoadSession,
        document: &Document,
    ) -> CodecResult<Ref<T>> {
        let type_name = T::TYPE_NAME;
        let descriptor = T::descriptor();
        let tag = document.tag(type_name)?;

        if self.config.reject_unknown_fields {
            if let Some(field) = document.fields().find(|f| !descriptor.knows_field(f)) {
                return Err(CodecError::UnknownField {
                    type_name,
                    field: field.to_string(),
                });
            }
        }

        // Reserve the tag first so self-references resolve to this entity.
        let handle = session.resolve_tag::<T>(&tag)?;
        if session.registry::<T>()?.state(tag.as_str()) == Some(EntryState::Complete) {
            return Err(CodecError::AlreadyComplete { type_name, tag });
        }

        let mut entity = T::default();
        entity.assign_key(handle.id(), tag.clone());

        for member in descriptor.members() {
            let Some(value) = document.get(member.name()) else {
                if self.config.require_all_members && member.is_supported() {
                    return Err(CodecError::MissingMember {
                        type_name,
                        member: member.name(),
                    });
                }
                continue;
            };
            match member.decode(&mut entity, value, session) {
                Some(result) => result.map_err(|source| CodecError::Member {
                    type_name,
                    member: member.name(),
                    source,
                })?,
                None => trace!("Ignoring unsupported member {}.{}", type_name, member.name()),
            }
        }

        session.registry_mut::<T>()?.register_complete(entity)?;
        debug!("Decoded {} '{}'", type_name, tag);
        Ok(handle)
    }

    /// Parses JSON text and decodes it as a `T`.
    pub fn decode_str<T: Entity>(&self, session: &mut LoadSession, json: &str) -> CodecResult<Ref<T>> {
        let document = Document::parse(json)?;
        self.decode_into(session, &document)
    }

    /// Decodes a document whose type is only known by name.
    pub fn decode_named(
        &self,
        session: &mut LoadSession,
        type_name: &str,
        document: &Document,
    ) -> CodecResult<EntityId> {
        let (_, decode) = session.decoder_for(type_name)?;
        decode(self, session, document)
    }
}

pub(crate) fn decode_erased<T: Entity>(
    decoder: &Decoder,
    session: &mut LoadSession,
    document: &Document,
) -> CodecResult<EntityId> {
    decoder.decode_into::<T>(session, document).map(|handle| handle.id())
}
