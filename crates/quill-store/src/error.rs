/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store handle has been closed.
    #[error("store handle is closed")]
    Closed,

    /// The cursor was already closed.
    #[error("cursor is closed")]
    CursorClosed,

    /// A document with the same `_id` already exists in the collection.
    #[error("duplicate key in {collection}: {id}")]
    DuplicateKey { collection: String, id: String },

    /// The document cannot be stored as given.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure inside the storage backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
