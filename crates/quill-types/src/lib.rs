//! Foundation types for Quill.
//!
//! Every other Quill crate depends on `quill-types`. It owns the two
//! primitives that cross every layer of the system:
//!
//! - [`DocumentId`]: the document store's native 12-byte identifier, with
//!   its 24-character hex external form
//! - [`Timestamp`]: UTC wall-clock instant with a zero value and a stable
//!   textual rendering

pub mod error;
pub mod id;
pub mod temporal;

pub use error::TypeError;
pub use id::DocumentId;
pub use temporal::Timestamp;
