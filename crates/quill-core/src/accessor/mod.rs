//! Typed accessors over the three collections.
//!
//! Each accessor call is exactly one store round trip. Store failures and
//! undecodable documents surface as [`ServiceError::Internal`]; nothing is
//! retried. Accessors never call one another: cross-collection sequencing
//! belongs to [`BlogService`](crate::BlogService).

mod address;
mod author;
mod post;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use quill_store::{Document, DocumentStore, Filter, InsertAck};
use quill_types::DocumentId;

use crate::codec;
use crate::error::{ServiceError, ServiceResult};

pub use address::AddressAccessor;
pub use author::{AuthorAccessor, AuthorCursor};
pub use post::PostAccessor;

/// CRUD over one collection, decoding documents as `T`.
struct Records<T> {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
    entity: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Records<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection,
            entity: self.entity,
            _record: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Records<T> {
    fn new(store: Arc<dyn DocumentStore>, collection: &'static str, entity: &'static str) -> Self {
        Self {
            store,
            collection,
            entity,
            _record: PhantomData,
        }
    }

    async fn insert(&self, record: &T) -> ServiceResult<DocumentId> {
        let ack = self
            .store
            .insert_one(self.collection, to_document(record)?)
            .await?;
        let id = inserted_id(self.collection, &ack)?;
        debug!(collection = self.collection, %id, "inserted");
        Ok(id)
    }

    async fn find_one(&self, filter: &Filter, what: impl FnOnce() -> String) -> ServiceResult<T> {
        let found = self.store.find_one(self.collection, filter).await?;
        debug!(collection = self.collection, ?filter, hit = found.is_some(), "find_one");
        match found {
            Some(doc) => from_document(self.collection, doc),
            None => Err(ServiceError::NotFound(format!(
                "cannot find {} with {}",
                self.entity,
                what()
            ))),
        }
    }

    async fn find_by_id(&self, id: &DocumentId) -> ServiceResult<T> {
        self.find_one(&Filter::by_id(*id), || format!("id {id}")).await
    }

    async fn replace(&self, id: &DocumentId, record: &T) -> ServiceResult<()> {
        let ack = self
            .store
            .replace_one(self.collection, id, to_document(record)?)
            .await?;
        debug!(
            collection = self.collection,
            %id,
            matched = ack.matched,
            modified = ack.modified,
            "replaced"
        );
        if ack.matched == 0 {
            return Err(ServiceError::NotFound(format!(
                "cannot find {} with id {id} to replace",
                self.entity
            )));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &DocumentId) -> ServiceResult<u64> {
        let ack = self
            .store
            .delete_one(self.collection, &Filter::by_id(*id))
            .await?;
        debug!(collection = self.collection, %id, deleted = ack.deleted, "deleted");
        Ok(ack.deleted)
    }
}

fn to_document<T: Serialize>(record: &T) -> ServiceResult<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ServiceError::Internal(format!(
            "record serialized to a non-object value: {other}"
        ))),
        Err(e) => Err(ServiceError::Internal(format!("cannot encode record: {e}"))),
    }
}

fn from_document<T: DeserializeOwned>(collection: &str, doc: Document) -> ServiceResult<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| {
        ServiceError::Internal(format!("cannot decode document from {collection}: {e}"))
    })
}

/// Convert an insert acknowledgment into the new document's identifier.
fn inserted_id(collection: &str, ack: &InsertAck) -> ServiceResult<DocumentId> {
    codec::decode_stored(collection, &ack.inserted_id)
}
