//! Device token repository backed by the `fcm_tokens/` collection.
//!
//! Tokens are stored under sanitised copies of themselves, so saving the
//! same token twice refreshes one record instead of growing the registry.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::{
    DeviceTokenRepository, DeviceTokenRepositoryError, RecordStore, StoreError, StorePath,
};
use crate::domain::{DeviceToken, sanitise_token_key};

const COLLECTION: &str = "fcm_tokens";

fn map_store_error(error: StoreError) -> DeviceTokenRepositoryError {
    match error {
        StoreError::Unavailable { message } => DeviceTokenRepositoryError::unavailable(message),
        StoreError::InvalidPath { message }
        | StoreError::Denied { message }
        | StoreError::Protocol { message } => DeviceTokenRepositoryError::query(message),
    }
}

fn collection_path() -> Result<StorePath, DeviceTokenRepositoryError> {
    StorePath::new(COLLECTION).map_err(map_store_error)
}

fn token_path(raw_token: &str) -> Result<StorePath, DeviceTokenRepositoryError> {
    collection_path()?
        .child(sanitise_token_key(raw_token))
        .map_err(map_store_error)
}

/// Record-store-backed implementation of the device token repository port.
#[derive(Clone)]
pub struct StoreDeviceTokenRepository {
    store: Arc<dyn RecordStore>,
}

impl StoreDeviceTokenRepository {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DeviceTokenRepository for StoreDeviceTokenRepository {
    async fn list(&self) -> Result<Vec<DeviceToken>, DeviceTokenRepositoryError> {
        let value = self
            .store
            .read_once(&collection_path()?)
            .await
            .map_err(map_store_error)?;
        let Some(Value::Object(entries)) = value else {
            return Ok(Vec::new());
        };

        let mut tokens = Vec::with_capacity(entries.len());
        for (key, raw) in entries {
            match serde_json::from_value::<DeviceToken>(raw) {
                Ok(token) => tokens.push(token),
                Err(error) => {
                    warn!(key = %key, %error, "skipping unreadable device token");
                }
            }
        }
        Ok(tokens)
    }

    async fn save(&self, token: &DeviceToken) -> Result<(), DeviceTokenRepositoryError> {
        let value = serde_json::to_value(token)
            .map_err(|error| DeviceTokenRepositoryError::query(error.to_string()))?;
        self.store
            .write(&token_path(&token.token)?, value)
            .await
            .map_err(map_store_error)
    }

    async fn remove(&self, raw_token: &str) -> Result<(), DeviceTokenRepositoryError> {
        self.store
            .delete(&token_path(raw_token)?)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::store::InMemoryRecordStore;

    fn token(raw: &str) -> DeviceToken {
        DeviceToken {
            token: raw.to_owned(),
            last_updated: 1_712_741_400_000,
            device_info: Some("test agent".to_owned()),
        }
    }

    fn repository() -> StoreDeviceTokenRepository {
        StoreDeviceTokenRepository::new(Arc::new(InMemoryRecordStore::new()))
    }

    #[tokio::test]
    async fn re_registration_replaces_the_record() {
        let repo = repository();
        repo.save(&token("tok.1/x")).await.expect("first save");
        repo.save(&token("tok.1/x")).await.expect("second save");

        let tokens = repo.list().await.expect("list");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, "tok.1/x");
    }

    #[tokio::test]
    async fn remove_accepts_the_raw_token() {
        let repo = repository();
        repo.save(&token("tok.1/x")).await.expect("save");
        repo.remove("tok.1/x").await.expect("remove");
        assert!(repo.list().await.expect("list").is_empty());
    }
}
