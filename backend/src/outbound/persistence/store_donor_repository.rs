//! Donor repository backed by the `users/` collection of the record store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::warn;

use crate::domain::donor::date_string;
use crate::domain::ports::{
    DonorRepository, DonorRepositoryError, JsonMap, RecordStore, StoreError, StorePath,
};
use crate::domain::{DonorId, DonorRecord, DonorUpdate};

const COLLECTION: &str = "users";

fn map_store_error(error: StoreError) -> DonorRepositoryError {
    match error {
        StoreError::Unavailable { message } => DonorRepositoryError::unavailable(message),
        StoreError::InvalidPath { message }
        | StoreError::Denied { message }
        | StoreError::Protocol { message } => DonorRepositoryError::query(message),
    }
}

fn collection_path() -> Result<StorePath, DonorRepositoryError> {
    StorePath::new(COLLECTION).map_err(map_store_error)
}

fn record_path(uid: &DonorId) -> Result<StorePath, DonorRepositoryError> {
    collection_path()?.child(uid.as_ref()).map_err(map_store_error)
}

fn fields_of(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

/// Record-store-backed implementation of the donor repository port.
#[derive(Clone)]
pub struct StoreDonorRepository {
    store: Arc<dyn RecordStore>,
}

impl StoreDonorRepository {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DonorRepository for StoreDonorRepository {
    async fn find(&self, uid: &DonorId) -> Result<Option<DonorRecord>, DonorRepositoryError> {
        let value = self
            .store
            .read_once(&record_path(uid)?)
            .await
            .map_err(map_store_error)?;
        match value {
            None => Ok(None),
            Some(raw) => serde_json::from_value(raw)
                .map(Some)
                .map_err(|error| DonorRepositoryError::corrupt(uid.as_ref(), error.to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<DonorRecord>, DonorRepositoryError> {
        let value = self
            .store
            .read_once(&collection_path()?)
            .await
            .map_err(map_store_error)?;
        let Some(Value::Object(entries)) = value else {
            return Ok(Vec::new());
        };

        // One unreadable record must not take the whole listing down.
        let mut records = Vec::with_capacity(entries.len());
        for (key, raw) in entries {
            match serde_json::from_value::<DonorRecord>(raw) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(uid = %key, %error, "skipping unreadable donor record");
                }
            }
        }
        Ok(records)
    }

    async fn create(&self, record: &DonorRecord) -> Result<(), DonorRepositoryError> {
        let value = serde_json::to_value(record)
            .map_err(|error| DonorRepositoryError::query(error.to_string()))?;
        self.store
            .write(&record_path(&record.uid)?, value)
            .await
            .map_err(map_store_error)
    }

    async fn update_fields(
        &self,
        uid: &DonorId,
        update: &DonorUpdate,
    ) -> Result<(), DonorRepositoryError> {
        let value = serde_json::to_value(update)
            .map_err(|error| DonorRepositoryError::query(error.to_string()))?;
        self.store
            .write_partial(&record_path(uid)?, fields_of(value))
            .await
            .map_err(map_store_error)
    }

    async fn set_last_donation_date(
        &self,
        uid: &DonorId,
        date: NaiveDate,
    ) -> Result<(), DonorRepositoryError> {
        let fields = fields_of(json!({
            "lastDonationDate": date.format(date_string::FORMAT).to_string(),
        }));
        self.store
            .write_partial(&record_path(uid)?, fields)
            .await
            .map_err(map_store_error)
    }

    async fn set_availability(
        &self,
        uid: &DonorId,
        is_available: bool,
    ) -> Result<(), DonorRepositoryError> {
        let fields = fields_of(json!({ "isAvailable": is_available }));
        self.store
            .write_partial(&record_path(uid)?, fields)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, uid: &DonorId) -> Result<(), DonorRepositoryError> {
        self.store
            .delete(&record_path(uid)?)
            .await
            .map_err(map_store_error)
    }
}
