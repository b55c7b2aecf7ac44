use std::sync::Arc;

use quill_store::{DocumentCursor, DocumentStore, Filter};
use quill_types::DocumentId;

use super::{from_document, Records};
use crate::error::ServiceResult;
use crate::model::Author;

/// CRUD over the `authors` collection, plus lookup by email and a full scan.
#[derive(Clone)]
pub struct AuthorAccessor {
    records: Records<Author>,
}

impl AuthorAccessor {
    pub const COLLECTION: &'static str = "authors";

    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: Records::new(store, Self::COLLECTION, "author"),
        }
    }

    pub async fn insert(&self, author: &Author) -> ServiceResult<DocumentId> {
        self.records.insert(author).await
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> ServiceResult<Author> {
        self.records.find_by_id(id).await
    }

    /// First author whose email matches exactly.
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Author> {
        self.records
            .find_one(&Filter::eq("email", email), || format!("email {email:?}"))
            .await
    }

    pub async fn replace(&self, id: &DocumentId, author: &Author) -> ServiceResult<()> {
        self.records.replace(id, author).await
    }

    pub async fn delete_by_id(&self, id: &DocumentId) -> ServiceResult<u64> {
        self.records.delete_by_id(id).await
    }

    /// Open a cursor over every author. Each call starts a fresh scan.
    pub async fn find_all(&self) -> ServiceResult<AuthorCursor> {
        let inner = self
            .records
            .store
            .find(Self::COLLECTION, &Filter::all())
            .await?;
        Ok(AuthorCursor { inner })
    }
}

/// Lazy, forward-only sequence of authors backed by a store cursor.
///
/// Dropping the cursor releases it; call [`close`](Self::close) to release it
/// explicitly.
pub struct AuthorCursor {
    inner: Box<dyn DocumentCursor>,
}

impl AuthorCursor {
    pub async fn next(&mut self) -> ServiceResult<Option<Author>> {
        match self.inner.next().await? {
            Some(doc) => from_document(AuthorAccessor::COLLECTION, doc).map(Some),
            None => Ok(None),
        }
    }

    pub async fn close(&mut self) -> ServiceResult<()> {
        self.inner.close().await?;
        Ok(())
    }
}
