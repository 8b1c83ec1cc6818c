//! Notice repository backed by the `notices/` collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::{
    JsonMap, NoticeRepository, NoticeRepositoryError, RecordStore, StoreError, StorePath,
};
use crate::domain::{Notice, NoticeUpdate};

const COLLECTION: &str = "notices";

fn map_store_error(error: StoreError) -> NoticeRepositoryError {
    match error {
        StoreError::Unavailable { message } => NoticeRepositoryError::unavailable(message),
        StoreError::InvalidPath { message }
        | StoreError::Denied { message }
        | StoreError::Protocol { message } => NoticeRepositoryError::query(message),
    }
}

fn collection_path() -> Result<StorePath, NoticeRepositoryError> {
    StorePath::new(COLLECTION).map_err(map_store_error)
}

fn entry_path(id: &str) -> Result<StorePath, NoticeRepositoryError> {
    collection_path()?.child(id).map_err(map_store_error)
}

/// Record-store-backed implementation of the notice repository port.
#[derive(Clone)]
pub struct StoreNoticeRepository {
    store: Arc<dyn RecordStore>,
}

impl StoreNoticeRepository {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NoticeRepository for StoreNoticeRepository {
    async fn list(&self) -> Result<Vec<Notice>, NoticeRepositoryError> {
        let value = self
            .store
            .read_once(&collection_path()?)
            .await
            .map_err(map_store_error)?;
        let Some(Value::Object(entries)) = value else {
            return Ok(Vec::new());
        };

        // Push keys sort in insertion order, so walking them backwards
        // yields newest first.
        let mut notices = Vec::with_capacity(entries.len());
        for (key, raw) in entries.into_iter().rev() {
            match serde_json::from_value::<Notice>(raw) {
                Ok(mut notice) => {
                    notice.id = key;
                    notices.push(notice);
                }
                Err(error) => {
                    warn!(id = %key, %error, "skipping unreadable notice");
                }
            }
        }
        Ok(notices)
    }

    async fn append(&self, notice: &Notice) -> Result<Notice, NoticeRepositoryError> {
        let body = serde_json::to_value(Notice {
            id: String::new(),
            ..notice.clone()
        })
        .map_err(|error| NoticeRepositoryError::query(error.to_string()))?;
        let key = self
            .store
            .push(&collection_path()?, body)
            .await
            .map_err(map_store_error)?;
        Ok(Notice {
            id: key,
            ..notice.clone()
        })
    }

    async fn update(&self, id: &str, update: &NoticeUpdate) -> Result<(), NoticeRepositoryError> {
        let value = serde_json::to_value(update)
            .map_err(|error| NoticeRepositoryError::query(error.to_string()))?;
        let fields = match value {
            Value::Object(map) => map,
            _ => JsonMap::new(),
        };
        self.store
            .write_partial(&entry_path(id)?, fields)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, id: &str) -> Result<(), NoticeRepositoryError> {
        self.store
            .delete(&entry_path(id)?)
            .await
            .map_err(map_store_error)
    }
}
