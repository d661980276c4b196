use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of an entity type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// error messages, logs and name-based dispatch.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Builds the key for `T` under the given display name.
    #[must_use]
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    /// Returns the underlying type id.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
