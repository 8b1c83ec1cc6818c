//! Port for donor record persistence.
//!
//! Adapters back this trait with the `users/` collection of the record
//! store. Partial setters exist because availability reconciliation must
//! touch exactly one field and nothing else.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DonorId, DonorRecord, DonorUpdate};

/// Errors raised by donor repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonorRepositoryError {
    /// The backing store could not be reached.
    #[error("donor store unreachable: {message}")]
    Unavailable { message: String },
    /// The store rejected or failed the operation.
    #[error("donor store operation failed: {message}")]
    Query { message: String },
    /// A stored record could not be decoded.
    #[error("corrupt donor record at {uid}: {message}")]
    Corrupt { uid: String, message: String },
}

impl DonorRepositoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn corrupt(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            uid: uid.into(),
            message: message.into(),
        }
    }
}

/// Port for donor record storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Fetch one record, `None` when no donor exists under `uid`.
    async fn find(&self, uid: &DonorId) -> Result<Option<DonorRecord>, DonorRepositoryError>;

    /// Fetch every stored record, admins included.
    async fn list(&self) -> Result<Vec<DonorRecord>, DonorRepositoryError>;

    /// Store a complete record under its id.
    async fn create(&self, record: &DonorRecord) -> Result<(), DonorRepositoryError>;

    /// Merge the populated fields of `update` into the record.
    async fn update_fields(
        &self,
        uid: &DonorId,
        update: &DonorUpdate,
    ) -> Result<(), DonorRepositoryError>;

    /// Overwrite only `lastDonationDate`.
    async fn set_last_donation_date(
        &self,
        uid: &DonorId,
        date: NaiveDate,
    ) -> Result<(), DonorRepositoryError>;

    /// Overwrite only `isAvailable`.
    async fn set_availability(
        &self,
        uid: &DonorId,
        is_available: bool,
    ) -> Result<(), DonorRepositoryError>;

    /// Remove the record. Removing an absent record succeeds.
    async fn delete(&self, uid: &DonorId) -> Result<(), DonorRepositoryError>;
}

/// Fixture repository holding no records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDonorRepository;

#[async_trait]
impl DonorRepository for FixtureDonorRepository {
    async fn find(&self, _uid: &DonorId) -> Result<Option<DonorRecord>, DonorRepositoryError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<DonorRecord>, DonorRepositoryError> {
        Ok(Vec::new())
    }

    async fn create(&self, _record: &DonorRecord) -> Result<(), DonorRepositoryError> {
        Ok(())
    }

    async fn update_fields(
        &self,
        _uid: &DonorId,
        _update: &DonorUpdate,
    ) -> Result<(), DonorRepositoryError> {
        Ok(())
    }

    async fn set_last_donation_date(
        &self,
        _uid: &DonorId,
        _date: NaiveDate,
    ) -> Result<(), DonorRepositoryError> {
        Ok(())
    }

    async fn set_availability(
        &self,
        _uid: &DonorId,
        _is_available: bool,
    ) -> Result<(), DonorRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _uid: &DonorId) -> Result<(), DonorRepositoryError> {
        Ok(())
    }
}
