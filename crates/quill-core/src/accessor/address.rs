use std::sync::Arc;

use quill_store::DocumentStore;
use quill_types::DocumentId;

use super::Records;
use crate::error::ServiceResult;
use crate::model::Address;

/// CRUD over the `addresses` collection.
#[derive(Clone)]
pub struct AddressAccessor {
    records: Records<Address>,
}

impl AddressAccessor {
    pub const COLLECTION: &'static str = "addresses";

    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: Records::new(store, Self::COLLECTION, "address"),
        }
    }

    /// Insert a new address and return the identifier the store assigned.
    pub async fn insert(&self, address: &Address) -> ServiceResult<DocumentId> {
        self.records.insert(address).await
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> ServiceResult<Address> {
        self.records.find_by_id(id).await
    }

    pub async fn replace(&self, id: &DocumentId, address: &Address) -> ServiceResult<()> {
        self.records.replace(id, address).await
    }

    /// Delete by identifier, returning how many documents were removed.
    pub async fn delete_by_id(&self, id: &DocumentId) -> ServiceResult<u64> {
        self.records.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use quill_store::InMemoryDocumentStore;
    use quill_types::Timestamp;

    fn nairobi() -> Address {
        Address {
            id: None,
            city: "Nairobi".into(),
            country: "Kenya".into(),
            zip_code: "00101".into(),
            postal_address: "243".into(),
            created: Timestamp::now(),
            updated: None,
        }
    }

    #[tokio::test]
    async fn insert_find_replace_delete() {
        let accessor = AddressAccessor::new(Arc::new(InMemoryDocumentStore::new()));
        let id = accessor.insert(&nairobi()).await.unwrap();

        let mut found = accessor.find_by_id(&id).await.unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.city, "Nairobi");

        found.city = "Mombasa".into();
        found.updated = Some(Timestamp::now());
        accessor.replace(&id, &found).await.unwrap();
        assert_eq!(accessor.find_by_id(&id).await.unwrap().city, "Mombasa");

        assert_eq!(accessor.delete_by_id(&id).await.unwrap(), 1);
        assert_eq!(accessor.delete_by_id(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_address_is_not_found() {
        let accessor = AddressAccessor::new(Arc::new(InMemoryDocumentStore::new()));
        let id = DocumentId::generate();
        let err = accessor.find_by_id(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().contains(&id.to_hex()));

        let err = accessor.replace(&id, &nairobi()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn closed_store_is_internal() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let accessor = AddressAccessor::new(store.clone());
        store.close().await.unwrap();
        let err = accessor.insert(&nairobi()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
