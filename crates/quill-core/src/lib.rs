//! Entity consistency and aggregation layer for Quill.
//!
//! The document store holds three collections (addresses, authors, posts)
//! and offers neither transactions nor joins. This crate is where the
//! service makes up for both:
//!
//! - [`codec`] converts external hex identifiers into native ones and is the
//!   only place identifiers are decoded.
//! - [`accessor`] wraps each collection with typed single-round-trip CRUD.
//! - [`assemble`] combines already-resolved records into response views.
//! - [`BlogService`] runs the ordered multi-collection sequences behind every
//!   RPC method, including the author → address delete cascade.
//!
//! None of the sequences are atomic. Where a later step fails after an
//! earlier write succeeded, the earlier write stays: a failed author insert
//! leaves its address orphaned, and a post whose writers cannot be resolved
//! stays persisted.

pub mod accessor;
pub mod assemble;
pub mod codec;
pub mod error;
pub mod model;
pub mod service;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use accessor::{AddressAccessor, AuthorAccessor, AuthorCursor, PostAccessor};
pub use codec::IdKind;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use model::{
    Address, AddressUpdate, Author, AuthorUpdate, NewAddress, NewAuthor, NewPost, Post,
    PostUpdate,
};
pub use service::{BlogService, DeleteOutcome};
pub use view::{AddressView, AuthorView, PostView};

// Re-export key types
pub use quill_types::{DocumentId, Timestamp};
