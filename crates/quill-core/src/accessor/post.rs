use std::sync::Arc;

use quill_store::DocumentStore;
use quill_types::DocumentId;

use super::Records;
use crate::error::ServiceResult;
use crate::model::Post;

/// CRUD over the `blog` collection.
#[derive(Clone)]
pub struct PostAccessor {
    records: Records<Post>,
}

impl PostAccessor {
    pub const COLLECTION: &'static str = "blog";

    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: Records::new(store, Self::COLLECTION, "blog"),
        }
    }

    pub async fn insert(&self, post: &Post) -> ServiceResult<DocumentId> {
        self.records.insert(post).await
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> ServiceResult<Post> {
        self.records.find_by_id(id).await
    }

    pub async fn replace(&self, id: &DocumentId, post: &Post) -> ServiceResult<()> {
        self.records.replace(id, post).await
    }

    pub async fn delete_by_id(&self, id: &DocumentId) -> ServiceResult<u64> {
        self.records.delete_by_id(id).await
    }
}
