//! Community repository backed by the single `community` document.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::CommunityData;
use crate::domain::ports::{
    CommunityRepository, CommunityRepositoryError, RecordStore, StoreError, StorePath,
};

const DOCUMENT: &str = "community";

fn map_store_error(error: StoreError) -> CommunityRepositoryError {
    match error {
        StoreError::Unavailable { message } => CommunityRepositoryError::unavailable(message),
        StoreError::InvalidPath { message }
        | StoreError::Denied { message }
        | StoreError::Protocol { message } => CommunityRepositoryError::query(message),
    }
}

fn document_path() -> Result<StorePath, CommunityRepositoryError> {
    StorePath::new(DOCUMENT).map_err(map_store_error)
}

/// Record-store-backed implementation of the community repository port.
#[derive(Clone)]
pub struct StoreCommunityRepository {
    store: Arc<dyn RecordStore>,
}

impl StoreCommunityRepository {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommunityRepository for StoreCommunityRepository {
    async fn load(&self) -> Result<CommunityData, CommunityRepositoryError> {
        let value = self
            .store
            .read_once(&document_path()?)
            .await
            .map_err(map_store_error)?;
        match value {
            None => Ok(CommunityData::default()),
            Some(raw) => serde_json::from_value(raw)
                .map_err(|error| CommunityRepositoryError::corrupt(error.to_string())),
        }
    }

    async fn save(&self, data: &CommunityData) -> Result<(), CommunityRepositoryError> {
        let value = serde_json::to_value(data)
            .map_err(|error| CommunityRepositoryError::query(error.to_string()))?;
        self.store
            .write(&document_path()?, value)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommunityPartner;
    use crate::outbound::store::InMemoryRecordStore;

    #[tokio::test]
    async fn absent_document_loads_as_empty() {
        let repo = StoreCommunityRepository::new(Arc::new(InMemoryRecordStore::new()));
        let data = repo.load().await.expect("load");
        assert!(data.partners.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = StoreCommunityRepository::new(Arc::new(InMemoryRecordStore::new()));
        let data = CommunityData {
            partners: vec![CommunityPartner {
                name: "sandhani".to_owned(),
                image_url: "https://example.org/sandhani.png".to_owned(),
            }],
        };
        repo.save(&data).await.expect("save");
        let loaded = repo.load().await.expect("load");
        assert_eq!(loaded, data);
    }
}
