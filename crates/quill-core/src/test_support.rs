//! Store wrapper that fails chosen operations, for partial-failure tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use quill_store::{
    DeleteAck, Document, DocumentCursor, DocumentStore, Filter, InMemoryDocumentStore, InsertAck,
    ReplaceAck, StoreError, StoreResult,
};
use quill_types::DocumentId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Insert,
    FindOne,
    Replace,
    Delete,
    Find,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Return a backend error.
    Fail,
    /// Perform an insert but acknowledge it with a non-identifier value.
    BogusAck,
}

/// Delegates to an [`InMemoryDocumentStore`], recording every call and
/// injecting faults per (collection, operation).
pub struct FaultyStore {
    inner: Arc<InMemoryDocumentStore>,
    faults: Mutex<Vec<(String, Op, Fault)>>,
    calls: Mutex<Vec<(String, Op)>>,
}

impl FaultyStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            inner,
            faults: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every `op` on `collection` fail from now on.
    pub fn fail(&self, collection: &str, op: Op) {
        self.inject(collection, op, Fault::Fail);
    }

    pub fn inject(&self, collection: &str, op: Op, fault: Fault) {
        self.faults
            .lock()
            .unwrap()
            .push((collection.to_string(), op, fault));
    }

    /// How many times `op` was attempted on `collection`.
    pub fn calls(&self, collection: &str, op: Op) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, o)| c == collection && *o == op)
            .count()
    }

    fn enter(&self, collection: &str, op: Op) -> Option<Fault> {
        self.calls.lock().unwrap().push((collection.to_string(), op));
        self.faults
            .lock()
            .unwrap()
            .iter()
            .find(|(c, o, _)| c == collection && *o == op)
            .map(|(_, _, fault)| *fault)
    }

    fn injected(collection: &str, op: Op) -> StoreError {
        StoreError::Backend(format!("injected {op:?} failure on {collection}"))
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertAck> {
        match self.enter(collection, Op::Insert) {
            Some(Fault::Fail) => Err(Self::injected(collection, Op::Insert)),
            Some(Fault::BogusAck) => {
                self.inner.insert_one(collection, document).await?;
                Ok(InsertAck {
                    inserted_id: Value::from(17),
                })
            }
            None => self.inner.insert_one(collection, document).await,
        }
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        match self.enter(collection, Op::FindOne) {
            Some(_) => Err(Self::injected(collection, Op::FindOne)),
            None => self.inner.find_one(collection, filter).await,
        }
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: &DocumentId,
        document: Document,
    ) -> StoreResult<ReplaceAck> {
        match self.enter(collection, Op::Replace) {
            Some(_) => Err(Self::injected(collection, Op::Replace)),
            None => self.inner.replace_one(collection, id, document).await,
        }
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteAck> {
        match self.enter(collection, Op::Delete) {
            Some(_) => Err(Self::injected(collection, Op::Delete)),
            None => self.inner.delete_one(collection, filter).await,
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Box<dyn DocumentCursor>> {
        match self.enter(collection, Op::Find) {
            Some(_) => Err(Self::injected(collection, Op::Find)),
            None => self.inner.find(collection, filter).await,
        }
    }

    async fn close(&self) -> StoreResult<()> {
        self.inner.close().await
    }
}
