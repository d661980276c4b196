//! Entity registries for tagweave.
//!
//! One [`EntityRegistry`] exists per entity type taking part in a load. It
//! owns the entities of that type and indexes them by identifier and by tag.
//! Every entity is in one of two states:
//! - **Partial**: a placeholder created when a reference to an unseen tag was
//!   decoded; only its identifier and tag are meaningful
//! - **Complete**: registered by the application or filled from its own
//!   document
//!
//! Entities move from partial to complete and never back. They leave the
//! registry only through [`EntityRegistry::unregister`] or
//! [`EntityRegistry::reset`].

mod error;
mod registry;

pub use error::{RegistryError, RegistryKey, RegistryResult};
pub use registry::{EntityRegistry, EntryState};
