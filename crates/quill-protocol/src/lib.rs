//! Wire protocol for the Quill blog service.
//!
//! Every RPC method is a JSON request/response exchange at a fixed path. The
//! one streaming method answers with newline-delimited JSON frames, the last
//! of which may carry a terminal error [`Status`].
//!
//! Identifiers travel as 24-character hex strings and timestamps as RFC 3339
//! text. Nothing in this crate knows about the document store.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::{FrameDecoder, StreamFrame, MAX_FRAME_SIZE};
pub use endpoint::{endpoints, HealthResponse, NDJSON_CONTENT_TYPE};
pub use error::{ProtocolError, ProtocolResult, Status, StatusCode};
pub use message::{
    Address, AllAuthorsRequest, Author, AuthorIdRequest, AuthorRequest, AuthorResponse,
    BlogIdRequest, BlogRequest, BlogResponse, DeleteResponse, Post,
};
