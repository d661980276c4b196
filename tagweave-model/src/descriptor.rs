//! Type descriptors: the classified member table of an entity type.
//!
//! A descriptor is assembled once per type through [`DescriptorBuilder`] and
//! cached by the type's [`Entity::descriptor`] implementation, typically in a
//! `static OnceLock`. Classification never fails: members that cannot be
//! encoded degrade to [`Shape::Unsupported`] and are reported as warnings.

use crate::{Entity, Member, ModelResult, Resolver, Shape};
use serde_json::Value;
use std::fmt;
use tagweave_types::TypeKey;
use tracing::warn;

/// Document field carrying the entity's tag.
pub const TAG_FIELD: &str = "Tag";

/// Document field carrying the entity's identifier.
pub const IDENTIFIER_FIELD: &str = "Id";

trait MemberAccess<T>: Send + Sync {
    fn encode(&self, entity: &T) -> ModelResult<Value>;

    fn decode(&self, entity: &mut T, value: &Value, resolver: &mut dyn Resolver)
    -> ModelResult<()>;
}

struct FieldAccess<T, M> {
    get: fn(&T) -> &M,
    get_mut: fn(&mut T) -> &mut M,
}

impl<T, M: Member> MemberAccess<T> for FieldAccess<T, M> {
    fn encode(&self, entity: &T) -> ModelResult<Value> {
        (self.get)(entity).encode_member()
    }

    fn decode(
        &self,
        entity: &mut T,
        value: &Value,
        resolver: &mut dyn Resolver,
    ) -> ModelResult<()> {
        *(self.get_mut)(entity) = M::decode_member(value, resolver)?;
        Ok(())
    }
}

/// Why a member was classified as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// Declared with [`DescriptorBuilder::unsupported`].
    Declared,
    /// Another member with the same name was declared first.
    DuplicateName,
    /// The name collides with the `Id` or `Tag` document field.
    ReservedName,
}

/// A member that degraded to [`Shape::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationWarning {
    pub member: &'static str,
    pub reason: UnsupportedReason,
}

impl fmt::Display for ClassificationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            UnsupportedReason::Declared => "declared unsupported",
            UnsupportedReason::DuplicateName => "duplicate member name",
            UnsupportedReason::ReservedName => "name is reserved for a key field",
        };
        write!(f, "member '{}' is unsupported: {reason}", self.member)
    }
}

/// One classified member.
pub struct MemberDescriptor<T> {
    name: &'static str,
    shape: Shape,
    access: Option<Box<dyn MemberAccess<T>>>,
}

impl<T> MemberDescriptor<T> {
    /// Document field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.access.is_some()
    }

    /// Encodes this member of `entity`. `None` for unsupported members.
    pub fn encode(&self, entity: &T) -> Option<ModelResult<Value>> {
        self.access.as_ref().map(|access| access.encode(entity))
    }

    /// Decodes `value` into this member of `entity`. `None` for unsupported
    /// members, which are left untouched.
    pub fn decode(
        &self,
        entity: &mut T,
        value: &Value,
        resolver: &mut dyn Resolver,
    ) -> Option<ModelResult<()>> {
        self.access
            .as_ref()
            .map(|access| access.decode(entity, value, resolver))
    }
}

impl<T> fmt::Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

/// The ordered, classified member table of an entity type.
pub struct TypeDescriptor<T> {
    type_key: TypeKey,
    members: Vec<MemberDescriptor<T>>,
    warnings: Vec<ClassificationWarning>,
}

impl<T: Entity> TypeDescriptor<T> {
    /// Starts classifying `T`.
    #[must_use]
    pub fn builder() -> DescriptorBuilder<T> {
        DescriptorBuilder {
            type_key: T::type_key(),
            members: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> TypeDescriptor<T> {
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_key.name()
    }

    /// All members in declaration order, unsupported ones included.
    #[must_use]
    pub fn members(&self) -> &[MemberDescriptor<T>] {
        &self.members
    }

    /// Looks up a member by document field name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.members.iter().find(|m| m.name == name)
    }

    /// `(name, shape)` pairs in declaration order.
    pub fn classify(&self) -> impl Iterator<Item = (&'static str, Shape)> + '_ {
        self.members.iter().map(|m| (m.name, m.shape))
    }

    /// Members that will be encoded and decoded.
    pub fn supported(&self) -> impl Iterator<Item = &MemberDescriptor<T>> {
        self.members.iter().filter(|m| m.is_supported())
    }

    /// True if `field` is a key field or a supported member.
    #[must_use]
    pub fn knows_field(&self, field: &str) -> bool {
        field == TAG_FIELD
            || field == IDENTIFIER_FIELD
            || self.supported().any(|m| m.name == field)
    }

    #[must_use]
    pub fn warnings(&self) -> &[ClassificationWarning] {
        &self.warnings
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type", &self.type_key.name())
            .field("members", &self.members)
            .finish()
    }
}

/// Declares the members of an entity type, in document order.
pub struct DescriptorBuilder<T> {
    type_key: TypeKey,
    members: Vec<MemberDescriptor<T>>,
    warnings: Vec<ClassificationWarning>,
}

impl<T: Entity> DescriptorBuilder<T> {
    /// Declares a member. Its shape follows from the member's Rust type.
    #[must_use]
    pub fn member<M: Member + 'static>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> Self {
        match self.conflict(name) {
            Some(reason) => self.degrade(name, reason),
            None => self.members.push(MemberDescriptor {
                name,
                shape: M::shape(),
                access: Some(Box::new(FieldAccess { get, get_mut })),
            }),
        }
        self
    }

    /// Declares a member that exists on the type but is never encoded.
    #[must_use]
    pub fn unsupported(mut self, name: &'static str) -> Self {
        let reason = self.conflict(name).unwrap_or(UnsupportedReason::Declared);
        self.degrade(name, reason);
        self
    }

    /// Finishes classification, logging every degraded member.
    #[must_use]
    pub fn build(self) -> TypeDescriptor<T> {
        for warning in &self.warnings {
            warn!("{}: {}", self.type_key.name(), warning);
        }
        TypeDescriptor {
            type_key: self.type_key,
            members: self.members,
            warnings: self.warnings,
        }
    }

    fn conflict(&self, name: &str) -> Option<UnsupportedReason> {
        if name == TAG_FIELD || name == IDENTIFIER_FIELD {
            Some(UnsupportedReason::ReservedName)
        } else if self.members.iter().any(|m| m.name == name) {
            Some(UnsupportedReason::DuplicateName)
        } else {
            None
        }
    }

    fn degrade(&mut self, name: &'static str, reason: UnsupportedReason) {
        self.members.push(MemberDescriptor {
            name,
            shape: Shape::Unsupported,
            access: None,
        });
        self.warnings.push(ClassificationWarning {
            member: name,
            reason,
        });
    }
}
