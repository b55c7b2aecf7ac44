use async_trait::async_trait;
use quill_types::DocumentId;

use crate::document::{DeleteAck, Document, Filter, InsertAck, ReplaceAck};
use crate::error::StoreResult;

/// Handle to a connected document store.
///
/// All implementations must satisfy these invariants:
/// - Each method is one round trip touching at most one document, except
///   [`find`](Self::find) which opens a cursor.
/// - No method retries; every backend failure is returned immediately.
/// - The handle is shared across concurrently running operations.
/// - After [`close`](Self::close) every method returns
///   [`StoreError::Closed`](crate::StoreError::Closed).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document. A missing `_id` is assigned by the store.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertAck>;

    /// Return the first document selected by `filter`, if any.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Replace the whole body of the document with identifier `id`.
    ///
    /// The stored `_id` is kept. A `matched` count of zero means no document
    /// had that identifier.
    async fn replace_one(
        &self,
        collection: &str,
        id: &DocumentId,
        document: Document,
    ) -> StoreResult<ReplaceAck>;

    /// Delete the first document selected by `filter`.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteAck>;

    /// Open a cursor over every document selected by `filter`, in natural
    /// (insertion) order.
    async fn find(&self, collection: &str, filter: &Filter)
        -> StoreResult<Box<dyn DocumentCursor>>;

    /// Close the handle. Idempotent.
    async fn close(&self) -> StoreResult<()>;
}

/// Forward-only cursor over a query result.
///
/// A cursor holds backend resources until it is exhausted and closed, or
/// dropped. Implementations must release those resources on drop so that an
/// abandoned cursor never leaks.
#[async_trait]
pub trait DocumentCursor: Send {
    /// The next document, or `None` once the result set is exhausted.
    async fn next(&mut self) -> StoreResult<Option<Document>>;

    /// Release the cursor. Idempotent.
    async fn close(&mut self) -> StoreResult<()>;
}
