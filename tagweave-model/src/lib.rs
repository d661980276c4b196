//! Entity model for tagweave.
//!
//! Defines the contract between application entity types and the codec:
//! - [`Entity`]: the capability every encodable type exposes (identifier, tag, descriptor)
//! - [`Ref`]: a typed handle standing in for a reference to another entity
//! - [`Shape`]: how a member is encoded: scalar, reference, list or map of either
//! - [`TypeDescriptor`]: the classified member table of a type, built once and cached
//! - [`Member`] / [`Element`]: how individual Rust values move to and from JSON
//! - [`Resolver`]: the seam through which decoded tags become live references
//!
//! Nothing here owns entities or performs document I/O; registries and the
//! encoder/decoder live in their own crates.

mod descriptor;
mod entity;
mod error;
mod shape;
mod value;

pub use descriptor::{
    ClassificationWarning, DescriptorBuilder, IDENTIFIER_FIELD, MemberDescriptor, TAG_FIELD,
    TypeDescriptor, UnsupportedReason,
};
pub use entity::{Entity, Ref};
pub use error::{ModelError, ModelResult};
pub use shape::{ElementKind, ScalarKind, Shape};
pub use value::{Element, Member, Resolver};

pub use tagweave_types::{EntityId, Tag, TypeKey};
