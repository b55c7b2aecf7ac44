//! Document storage for Quill.
//!
//! The service persists authors, addresses, and posts in a schemaless
//! document store organised into named collections. The store offers
//! single-document operations only: no multi-document transactions and no
//! joins. Everything that spans collections is the caller's job.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- collection map behind a lock, for tests,
//!   local runs, and embedding
//!
//! # Design Rules
//!
//! 1. Every operation is a single round trip against a single document.
//! 2. Documents are JSON objects; the native identifier lives under `_id`.
//! 3. A handle is shared by all in-flight operations and is safe for
//!    concurrent use.
//! 4. Cursors must be released on every exit path. Dropping a cursor
//!    releases it; [`DocumentCursor::close`] does so explicitly.
//! 5. A closed handle refuses all further work with [`StoreError::Closed`].
//! 6. All backend errors are propagated, never retried.

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::{DeleteAck, Document, Filter, InsertAck, ReplaceAck, ID_FIELD};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentCursor, DocumentStore};
