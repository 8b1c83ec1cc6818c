//! Campaign repository backed by the `campaigns/` collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use crate::domain::ports::{
    CampaignRepository, CampaignRepositoryError, JsonMap, RecordStore, StoreError, StorePath,
};
use crate::domain::{Campaign, CampaignComment, CampaignDraft, DonorId};

const COLLECTION: &str = "campaigns";

fn map_store_error(error: StoreError) -> CampaignRepositoryError {
    match error {
        StoreError::Unavailable { message } => CampaignRepositoryError::unavailable(message),
        StoreError::InvalidPath { message }
        | StoreError::Denied { message }
        | StoreError::Protocol { message } => CampaignRepositoryError::query(message),
    }
}

fn collection_path() -> Result<StorePath, CampaignRepositoryError> {
    StorePath::new(COLLECTION).map_err(map_store_error)
}

fn entry_path(id: &str) -> Result<StorePath, CampaignRepositoryError> {
    collection_path()?.child(id).map_err(map_store_error)
}

fn fields_of(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

/// Record-store-backed implementation of the campaign repository port.
#[derive(Clone)]
pub struct StoreCampaignRepository {
    store: Arc<dyn RecordStore>,
}

impl StoreCampaignRepository {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CampaignRepository for StoreCampaignRepository {
    async fn list(&self) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        let value = self
            .store
            .read_once(&collection_path()?)
            .await
            .map_err(map_store_error)?;
        let Some(Value::Object(entries)) = value else {
            return Ok(Vec::new());
        };

        let mut campaigns = Vec::with_capacity(entries.len());
        for (key, raw) in entries.into_iter().rev() {
            match serde_json::from_value::<Campaign>(raw) {
                Ok(mut campaign) => {
                    campaign.id = key;
                    campaigns.push(campaign);
                }
                Err(error) => {
                    warn!(id = %key, %error, "skipping unreadable campaign");
                }
            }
        }
        Ok(campaigns)
    }

    async fn find(&self, id: &str) -> Result<Option<Campaign>, CampaignRepositoryError> {
        let value = self
            .store
            .read_once(&entry_path(id)?)
            .await
            .map_err(map_store_error)?;
        match value {
            None => Ok(None),
            Some(raw) => serde_json::from_value::<Campaign>(raw)
                .map(|mut campaign| {
                    campaign.id = id.to_owned();
                    Some(campaign)
                })
                .map_err(|error| CampaignRepositoryError::corrupt(id, error.to_string())),
        }
    }

    async fn append(&self, campaign: &Campaign) -> Result<Campaign, CampaignRepositoryError> {
        let body = serde_json::to_value(Campaign {
            id: String::new(),
            ..campaign.clone()
        })
        .map_err(|error| CampaignRepositoryError::query(error.to_string()))?;
        let key = self
            .store
            .push(&collection_path()?, body)
            .await
            .map_err(map_store_error)?;
        Ok(Campaign {
            id: key,
            ..campaign.clone()
        })
    }

    async fn update(
        &self,
        id: &str,
        draft: &CampaignDraft,
    ) -> Result<(), CampaignRepositoryError> {
        let fields = fields_of(json!({
            "title": draft.title,
            "description": draft.description,
            "imageUrl": draft.image_url,
        }));
        self.store
            .write_partial(&entry_path(id)?, fields)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, id: &str) -> Result<(), CampaignRepositoryError> {
        self.store
            .delete(&entry_path(id)?)
            .await
            .map_err(map_store_error)
    }

    async fn set_like(
        &self,
        id: &str,
        uid: &DonorId,
        liked: bool,
    ) -> Result<(), CampaignRepositoryError> {
        let likes_path = entry_path(id)?.child("likes").map_err(map_store_error)?;
        // Clearing a like removes the key, so absent and cleared entries
        // look the same to readers.
        let value = if liked { json!(true) } else { Value::Null };
        let mut fields = JsonMap::new();
        fields.insert(uid.to_string(), value);
        self.store
            .write_partial(&likes_path, fields)
            .await
            .map_err(map_store_error)
    }

    async fn append_comment(
        &self,
        id: &str,
        comment: &CampaignComment,
    ) -> Result<(), CampaignRepositoryError> {
        let comments_path = entry_path(id)?.child("comments").map_err(map_store_error)?;
        let body = serde_json::to_value(comment)
            .map_err(|error| CampaignRepositoryError::query(error.to_string()))?;
        self.store
            .push(&comments_path, body)
            .await
            .map_err(map_store_error)?;
        Ok(())
    }
}
