//! Shallow JSON codec for graphs of tag-referencing entities.
//!
//! Each entity is written to its own flat [`Document`]. A member that refers
//! to another entity is written as that entity's tag, never inlined, so a
//! graph with cycles becomes a set of independent documents.
//!
//! # Architecture
//!
//! - [`Encoder`] renders one entity, member by member, from its
//!   [`TypeDescriptor`](tagweave_model::TypeDescriptor). It has no side effects.
//! - [`LoadSession`] owns one [`EntityRegistry`](tagweave_registry::EntityRegistry)
//!   per entity type and turns tags into live references, creating partial
//!   placeholders for tags whose documents have not been decoded yet.
//! - [`Decoder`] fills one entity from its document, resolving references
//!   through the session rather than by decoding the target's document.
//! - [`Loader`] drives a whole load and checks that every placeholder was
//!   completed, reporting all stragglers at once.
//!
//! Documents can be decoded in any order. Decoding the same tag twice is
//! rejected with [`CodecError::AlreadyComplete`].

mod config;
mod decoder;
mod document;
mod encoder;
mod error;
mod loader;
mod session;

pub use config::CodecConfig;
pub use decoder::Decoder;
pub use document::Document;
pub use encoder::Encoder;
pub use error::{CodecError, CodecResult, PendingTag};
pub use loader::{LoadReport, Loader};
pub use session::LoadSession;
