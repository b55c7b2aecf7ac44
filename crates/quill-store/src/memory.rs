use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use quill_types::DocumentId;

use crate::document::{document_id, DeleteAck, Document, Filter, InsertAck, ReplaceAck, ID_FIELD};
use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentCursor, DocumentStore};

type Collections = HashMap<String, Vec<Document>>;

/// In-memory document store.
///
/// Collections are vectors of documents in insertion order, held behind a
/// `RwLock` for safe concurrent access. Documents are cloned on read and
/// write. The store tracks how many cursors are open so tests can verify
/// that every cursor is released.
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
    open_cursors: Arc<AtomicUsize>,
    closed: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            open_cursors: Arc::new(AtomicUsize::new(0)),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|map| map.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Returns `true` if no collection holds any document.
    pub fn is_empty(&self) -> bool {
        self.collections
            .read()
            .map(|map| map.values().all(Vec::is_empty))
            .unwrap_or(true)
    }

    /// Sorted names of collections that have ever been written to.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Number of cursors opened and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Returns `true` once [`DocumentStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn read_lock(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.ensure_open()?;
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".into()))
    }

    fn write_lock(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.ensure_open()?;
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".into()))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<InsertAck> {
        let id = match document.get(ID_FIELD) {
            None => DocumentId::generate(),
            Some(_) => document_id(&document).ok_or_else(|| {
                StoreError::InvalidDocument(format!("{ID_FIELD} is not a native identifier"))
            })?,
        };
        document.insert(ID_FIELD.into(), Value::String(id.to_hex()));

        let mut map = self.write_lock()?;
        let docs = map.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| document_id(d) == Some(id)) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id: id.to_hex(),
            });
        }
        docs.push(document);
        debug!(collection, id = %id, "inserted document");
        Ok(InsertAck {
            inserted_id: Value::String(id.to_hex()),
        })
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let map = self.read_lock()?;
        let found = map
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned();
        debug!(collection, ?filter, found = found.is_some(), "find_one");
        Ok(found)
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: &DocumentId,
        mut document: Document,
    ) -> StoreResult<ReplaceAck> {
        document.insert(ID_FIELD.into(), Value::String(id.to_hex()));

        let mut map = self.write_lock()?;
        let Some(slot) = map
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| document_id(d) == Some(*id)))
        else {
            debug!(collection, id = %id, "replace_one matched nothing");
            return Ok(ReplaceAck::default());
        };
        let modified = u64::from(*slot != document);
        *slot = document;
        debug!(collection, id = %id, modified, "replaced document");
        Ok(ReplaceAck {
            matched: 1,
            modified,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<DeleteAck> {
        let mut map = self.write_lock()?;
        let Some(docs) = map.get_mut(collection) else {
            return Ok(DeleteAck::default());
        };
        let deleted = match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                1
            }
            None => 0,
        };
        debug!(collection, ?filter, deleted, "delete_one");
        Ok(DeleteAck { deleted })
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Box<dyn DocumentCursor>> {
        let map = self.read_lock()?;
        let docs: Vec<Document> = map
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        debug!(collection, ?filter, count = docs.len(), "opened cursor");
        Ok(Box::new(MemoryCursor {
            docs: docs.into_iter(),
            open: Some(Arc::clone(&self.open_cursors)),
        }))
    }

    async fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("in-memory store closed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("collections", &self.collection_names())
            .field("open_cursors", &self.open_cursors())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Cursor over a snapshot of the matching documents.
struct MemoryCursor {
    docs: std::vec::IntoIter<Document>,
    open: Option<Arc<AtomicUsize>>,
}

impl MemoryCursor {
    fn release(&mut self) {
        if let Some(counter) = self.open.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl DocumentCursor for MemoryCursor {
    async fn next(&mut self) -> StoreResult<Option<Document>> {
        if self.open.is_none() {
            return Err(StoreError::CursorClosed);
        }
        Ok(self.docs.next())
    }

    async fn close(&mut self) -> StoreResult<()> {
        self.release();
        Ok(())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.release();
    }
}
