use crate::{RegistryError, RegistryKey, RegistryResult};
use indexmap::IndexMap;
use std::collections::HashMap;
use tagweave_model::{Entity, Ref};
use tagweave_types::{EntityId, Tag};
use tracing::{debug, trace};

/// Lifecycle state of a registered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Placeholder awaiting its own document.
    Partial,
    /// Fully populated.
    Complete,
}

#[derive(Debug)]
struct Slot<T> {
    entity: T,
    state: EntryState,
}

/// Owns the entities of one type, keyed by identifier and by tag.
///
/// Slots are kept in insertion order. Each tag maps to exactly one slot, so a
/// tag can never be partial and complete at the same time.
#[derive(Debug)]
pub struct EntityRegistry<T> {
    slots: IndexMap<EntityId, Slot<T>>,
    tags: HashMap<Tag, EntityId>,
}

impl<T: Entity> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
            tags: HashMap::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// Complete entity with the given identifier.
    pub fn lookup_by_identifier(&self, id: &EntityId) -> Option<&T> {
        self.slots
            .get(id)
            .filter(|slot| slot.state == EntryState::Complete)
            .map(|slot| &slot.entity)
    }

    /// Complete entity with the given tag.
    pub fn lookup_by_tag(&self, tag: &str) -> Option<&T> {
        self.tags
            .get(tag)
            .and_then(|id| self.lookup_by_identifier(id))
    }

    /// Placeholder with the given tag.
    pub fn lookup_partial(&self, tag: &str) -> Option<&T> {
        self.tags
            .get(tag)
            .and_then(|id| self.slots.get(id))
            .filter(|slot| slot.state == EntryState::Partial)
            .map(|slot| &slot.entity)
    }

    /// The entity a handle points at, in either state.
    pub fn get(&self, handle: &Ref<T>) -> Option<&T> {
        self.slots.get(&handle.id()).map(|slot| &slot.entity)
    }

    /// State of the entity holding `tag`, if any.
    pub fn state(&self, tag: &str) -> Option<EntryState> {
        self.tags
            .get(tag)
            .and_then(|id| self.slots.get(id))
            .map(|slot| slot.state)
    }

    /// A live handle to the entity holding `tag`, in either state.
    pub fn handle(&self, tag: &str) -> Option<Ref<T>> {
        let id = self.tags.get(tag)?;
        let slot = self.slots.get(id)?;
        Some(Ref::new(*id, slot.entity.tag().clone()))
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    // ── Registration ─────────────────────────────────────────────

    /// Registers a complete entity.
    ///
    /// Registering an entity whose identifier is already complete under the
    /// same tag is a no-op. Registering over a placeholder with the same
    /// identifier and tag promotes it. Any other overlap is an error.
    pub fn register_complete(&mut self, entity: T) -> RegistryResult<Ref<T>> {
        let tag = entity.tag().clone();
        if tag.is_unset() {
            return Err(RegistryError::EmptyTag {
                type_name: T::TYPE_NAME,
            });
        }
        let id = entity.id();

        if let Some(slot) = self.slots.get_mut(&id) {
            if slot.entity.tag() != &tag {
                return Err(RegistryError::DuplicateKey {
                    type_name: T::TYPE_NAME,
                    key: RegistryKey::Identifier(id),
                });
            }
            match slot.state {
                EntryState::Complete => {
                    trace!("{} '{}' already registered", T::TYPE_NAME, tag);
                }
                EntryState::Partial => {
                    slot.entity = entity;
                    slot.state = EntryState::Complete;
                    debug!("Promoted {} '{}' to complete", T::TYPE_NAME, tag);
                }
            }
            return Ok(Ref::new(id, tag));
        }

        if let Some(holder) = self.tags.get(&tag) {
            let pending = self
                .slots
                .get(holder)
                .is_some_and(|slot| slot.state == EntryState::Partial);
            return Err(if pending {
                RegistryError::PartialStillPending {
                    type_name: T::TYPE_NAME,
                    tag,
                }
            } else {
                RegistryError::DuplicateKey {
                    type_name: T::TYPE_NAME,
                    key: RegistryKey::Tag(tag),
                }
            });
        }

        self.tags.insert(tag.clone(), id);
        self.slots.insert(
            id,
            Slot {
                entity,
                state: EntryState::Complete,
            },
        );
        Ok(Ref::new(id, tag))
    }

    /// Creates a placeholder for `tag` and returns the handle every referrer
    /// will share until the placeholder is completed.
    pub fn register_partial(&mut self, tag: Tag) -> RegistryResult<Ref<T>> {
        if tag.is_unset() {
            return Err(RegistryError::EmptyTag {
                type_name: T::TYPE_NAME,
            });
        }
        if self.tags.contains_key(&tag) {
            return Err(RegistryError::DuplicateKey {
                type_name: T::TYPE_NAME,
                key: RegistryKey::Tag(tag),
            });
        }

        let id = EntityId::new();
        let mut entity = T::default();
        entity.assign_key(id, tag.clone());
        self.tags.insert(tag.clone(), id);
        self.slots.insert(
            id,
            Slot {
                entity,
                state: EntryState::Partial,
            },
        );
        debug!("Created placeholder {} '{}'", T::TYPE_NAME, tag);
        Ok(Ref::new(id, tag))
    }

    /// Removes an entity in either state. Not part of normal decoding.
    pub fn unregister(&mut self, id: &EntityId) -> Option<T> {
        let slot = self.slots.shift_remove(id)?;
        self.tags.remove(slot.entity.tag());
        Some(slot.entity)
    }

    /// Drops every entity. Only meant for use between independent loads.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.tags.clear();
    }

    // ── Inspection ───────────────────────────────────────────────

    /// Tags of all placeholders, in creation order.
    pub fn pending_tags(&self) -> Vec<Tag> {
        self.slots
            .values()
            .filter(|slot| slot.state == EntryState::Partial)
            .map(|slot| slot.entity.tag().clone())
            .collect()
    }

    /// Complete entities, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots
            .values()
            .filter(|slot| slot.state == EntryState::Complete)
            .map(|slot| &slot.entity)
    }

    /// Number of entities in either state.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn complete_len(&self) -> usize {
        self.iter().count()
    }

    pub fn partial_len(&self) -> usize {
        self.len() - self.complete_len()
    }
}
