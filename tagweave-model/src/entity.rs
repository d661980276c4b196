use crate::TypeDescriptor;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use tagweave_types::{EntityId, Tag, TypeKey};

/// A record that can be encoded to a flat document and referenced by tag.
///
/// `Default` provides the state a placeholder sits in until its own document
/// is decoded. Implementors keep their identifier and tag fixed once keyed;
/// [`Entity::assign_key`] exists for placeholder construction and decoding
/// only.
pub trait Entity: Default + 'static {
    /// Type name used in documents, logs and name-based dispatch.
    const TYPE_NAME: &'static str;

    /// The classified member table, built once per type.
    fn descriptor() -> &'static TypeDescriptor<Self>;

    fn id(&self) -> EntityId;

    fn tag(&self) -> &Tag;

    /// Sets identifier and tag on a default-constructed value.
    fn assign_key(&mut self, id: EntityId, tag: Tag);

    /// Runtime key of this type.
    fn type_key() -> TypeKey {
        TypeKey::of::<Self>(Self::TYPE_NAME)
    }

    /// A reference handle to this entity.
    fn to_ref(&self) -> Ref<Self> {
        Ref::new(self.id(), self.tag().clone())
    }
}

/// A typed reference to an entity, held by the referring entity.
///
/// The handle carries the target's identifier and tag, both immutable for the
/// target's lifetime, so encoding never needs the target itself. The target
/// lives in its registry. Handles compare equal when their identifiers do.
pub struct Ref<T> {
    id: EntityId,
    tag: Tag,
    _target: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    #[must_use]
    pub fn new(id: EntityId, tag: Tag) -> Self {
        Self {
            id,
            tag,
            _target: PhantomData,
        }
    }

    /// A handle pointing nowhere. Encoding it fails.
    #[must_use]
    pub fn unset() -> Self {
        Self::new(EntityId::nil(), Tag::unset())
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.tag.is_unset()
    }
}

impl<T> Default for Ref<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self::new(self.id, self.tag.clone())
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("tag", &self.tag.as_str())
            .field("id", &self.id)
            .finish()
    }
}
