//! Per-load registry set and reference resolution.

use crate::decoder::decode_erased;
use crate::encoder::encode_erased;
use crate::{CodecError, CodecResult, Decoder, Document, Encoder, PendingTag};
use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use tagweave_model::{Entity, ModelError, ModelResult, Ref, Resolver};
use tagweave_registry::{EntityRegistry, RegistryResult};
use tagweave_types::{EntityId, Tag, TypeKey};
use tracing::{debug, warn};

pub(crate) type DecodeFn = fn(&Decoder, &mut LoadSession, &Document) -> CodecResult<EntityId>;
pub(crate) type EncodeFn = fn(&Encoder, &LoadSession) -> CodecResult<Vec<Document>>;

/// Type-erased view of an [`EntityRegistry`], for dispatch by [`TypeKey`].
trait ErasedRegistry: Any {
    fn resolve(&mut self, tag: &Tag) -> RegistryResult<EntityId>;
    fn pending_tags(&self) -> Vec<Tag>;
    fn len(&self) -> usize;
    fn reset(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Entity> ErasedRegistry for EntityRegistry<T> {
    fn resolve(&mut self, tag: &Tag) -> RegistryResult<EntityId> {
        resolve_in(self, tag).map(|handle| handle.id())
    }

    fn pending_tags(&self) -> Vec<Tag> {
        EntityRegistry::pending_tags(self)
    }

    fn len(&self) -> usize {
        EntityRegistry::len(self)
    }

    fn reset(&mut self) {
        EntityRegistry::reset(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The live entity for `tag`, complete or placeholder, creating a
/// placeholder when the tag is new.
fn resolve_in<T: Entity>(registry: &mut EntityRegistry<T>, tag: &Tag) -> RegistryResult<Ref<T>> {
    match registry.handle(tag.as_str()) {
        Some(handle) => Ok(handle),
        None => registry.register_partial(tag.clone()),
    }
}

struct TypeEntry {
    name: &'static str,
    registry: Box<dyn ErasedRegistry>,
    decode: DecodeFn,
    encode: EncodeFn,
}

/// One registry per entity type, shared by every document of a load.
///
/// A tag resolves to the same entity for the whole session, whether its own
/// document comes before or after the documents that reference it.
#[derive(Default)]
pub struct LoadSession {
    types: IndexMap<TypeId, TypeEntry>,
    names: HashMap<&'static str, TypeId>,
}

impl LoadSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Type registration ────────────────────────────────────────

    /// Adds a registry for `T`. Registering the same type twice is a no-op.
    pub fn register_type<T: Entity>(&mut self) -> CodecResult<()> {
        let key = TypeId::of::<T>();
        if self.types.contains_key(&key) {
            return Ok(());
        }
        if self.names.contains_key(T::TYPE_NAME) {
            return Err(CodecError::DuplicateType(T::TYPE_NAME));
        }

        let descriptor = T::descriptor();
        self.names.insert(T::TYPE_NAME, key);
        self.types.insert(
            key,
            TypeEntry {
                name: T::TYPE_NAME,
                registry: Box::new(EntityRegistry::<T>::new()),
                decode: decode_erased::<T>,
                encode: encode_erased::<T>,
            },
        );
        debug!(
            "Registered entity type {} ({} members)",
            T::TYPE_NAME,
            descriptor.members().len()
        );
        Ok(())
    }

    /// Builder form of [`LoadSession::register_type`].
    pub fn with_type<T: Entity>(mut self) -> CodecResult<Self> {
        self.register_type::<T>()?;
        Ok(self)
    }

    #[must_use]
    pub fn is_registered<T: Entity>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Registered type names, in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.values().map(|entry| entry.name)
    }

    // ── Registry access ──────────────────────────────────────────

    pub fn registry<T: Entity>(&self) -> CodecResult<&EntityRegistry<T>> {
        self.types
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.registry.as_any().downcast_ref())
            .ok_or_else(|| CodecError::UnknownType(T::TYPE_NAME.to_string()))
    }

    pub fn registry_mut<T: Entity>(&mut self) -> CodecResult<&mut EntityRegistry<T>> {
        self.types
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.registry.as_any_mut().downcast_mut())
            .ok_or_else(|| CodecError::UnknownType(T::TYPE_NAME.to_string()))
    }

    /// Registers an already-built entity as complete.
    pub fn insert<T: Entity>(&mut self, entity: T) -> CodecResult<Ref<T>> {
        Ok(self.registry_mut::<T>()?.register_complete(entity)?)
    }

    /// The entity behind a handle, in either state.
    #[must_use]
    pub fn get<T: Entity>(&self, handle: &Ref<T>) -> Option<&T> {
        self.registry::<T>().ok()?.get(handle)
    }

    /// The complete entity with the given tag.
    #[must_use]
    pub fn lookup<T: Entity>(&self, tag: &str) -> Option<&T> {
        self.registry::<T>().ok()?.lookup_by_tag(tag)
    }

    /// Turns a referenced tag into a live handle.
    ///
    /// `None` stays `None`. A tag already known, complete or placeholder,
    /// yields the existing entity; a new tag gets a placeholder that later
    /// calls with the same tag will share.
    pub fn resolve_or_create<T: Entity>(&mut self, tag: Option<&Tag>) -> CodecResult<Option<Ref<T>>> {
        let Some(tag) = tag else {
            return Ok(None);
        };
        Ok(Some(self.resolve_tag::<T>(tag)?))
    }

    pub(crate) fn resolve_tag<T: Entity>(&mut self, tag: &Tag) -> CodecResult<Ref<T>> {
        Ok(resolve_in(self.registry_mut::<T>()?, tag)?)
    }

    // ── Completion ───────────────────────────────────────────────

    /// Every placeholder still waiting for its document, type by type.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingTag> {
        self.types
            .values()
            .flat_map(|entry| {
                let type_name = entry.name;
                entry
                    .registry
                    .pending_tags()
                    .into_iter()
                    .map(move |tag| PendingTag { type_name, tag })
            })
            .collect()
    }

    /// Fails with every unresolved placeholder if any remain.
    pub fn verify_complete(&self) -> CodecResult<()> {
        let pending = self.pending();
        if pending.is_empty() {
            return Ok(());
        }
        warn!("{} referenced tags were never decoded", pending.len());
        Err(CodecError::UnresolvedPartials { pending })
    }

    /// Total entities across all registries, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.values().map(|entry| entry.registry.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties every registry. Registered types stay registered.
    pub fn reset(&mut self) {
        for entry in self.types.values_mut() {
            entry.registry.reset();
        }
        debug!("Session reset");
    }

    // ── Name-based dispatch ──────────────────────────────────────

    pub(crate) fn decoder_for(&self, type_name: &str) -> CodecResult<(&'static str, DecodeFn)> {
        self.names
            .get(type_name)
            .and_then(|key| self.types.get(key))
            .map(|entry| (entry.name, entry.decode))
            .ok_or_else(|| CodecError::UnknownType(type_name.to_string()))
    }

    pub(crate) fn encoders(&self) -> impl Iterator<Item = (&'static str, EncodeFn)> + '_ {
        self.types.values().map(|entry| (entry.name, entry.encode))
    }
}

impl Resolver for LoadSession {
    fn resolve_or_create(&mut self, target: TypeKey, tag: &Tag) -> ModelResult<EntityId> {
        let entry = self
            .types
            .get_mut(&target.id())
            .ok_or(ModelError::UnknownTargetType(target.name()))?;
        entry
            .registry
            .resolve(tag)
            .map_err(|err| ModelError::Resolution {
                type_name: target.name(),
                tag: tag.to_string(),
                reason: err.to_string(),
            })
    }
}

impl fmt::Debug for LoadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.types
                    .values()
                    .map(|entry| (entry.name, entry.registry.len())),
            )
            .finish()
    }
}
