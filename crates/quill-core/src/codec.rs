//! Identifier codec.
//!
//! External identifiers are 24-character hex strings; native identifiers are
//! [`DocumentId`]s. Decoding is the only way a request-supplied or
//! stored reference string becomes a native identifier. Failures on caller
//! input are [`InvalidArgument`](ServiceError::InvalidArgument); failures on
//! identifiers the store handed back are [`Internal`](ServiceError::Internal).
//!
//! Decoding accepts either hex case. Encoding is always lowercase.

use std::fmt;

use quill_types::DocumentId;

use crate::error::{ServiceError, ServiceResult};

/// Which identifier is being decoded, for error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Author,
    Address,
    Post,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Author => write!(f, "author id"),
            Self::Address => write!(f, "address id"),
            Self::Post => write!(f, "blog id"),
        }
    }
}

/// Decode an external identifier.
pub fn decode(kind: IdKind, raw: &str) -> ServiceResult<DocumentId> {
    DocumentId::from_hex(raw)
        .map_err(|e| ServiceError::InvalidArgument(format!("malformed {kind} {raw:?}: {e}")))
}

/// Decode an identifier produced by the store, such as an insert
/// acknowledgment. `origin` names the collection for the error message.
pub fn decode_stored(origin: &str, raw: &serde_json::Value) -> ServiceResult<DocumentId> {
    raw.as_str()
        .and_then(|s| DocumentId::from_hex(s).ok())
        .ok_or_else(|| ServiceError::Internal(format!("unexpected id from {origin}: {raw}")))
}

/// Encode a native identifier into its external form. Total.
pub fn encode(id: &DocumentId) -> String {
    id.to_hex()
}
