//! Port for push-subscription token persistence.

use async_trait::async_trait;

use crate::domain::DeviceToken;

/// Errors raised by device token repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceTokenRepositoryError {
    #[error("token store unreachable: {message}")]
    Unavailable { message: String },
    #[error("token store operation failed: {message}")]
    Query { message: String },
}

impl DeviceTokenRepositoryError {
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
}

/// Port for device token storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTokenRepository: Send + Sync {
    /// Every registered token.
    async fn list(&self) -> Result<Vec<DeviceToken>, DeviceTokenRepositoryError>;

    /// Store a registration under its sanitised key, replacing any
    /// previous registration of the same token.
    async fn save(&self, token: &DeviceToken) -> Result<(), DeviceTokenRepositoryError>;

    /// Remove the registration of one raw token.
    async fn remove(&self, raw_token: &str) -> Result<(), DeviceTokenRepositoryError>;
}

/// Fixture repository holding no tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDeviceTokenRepository;

#[async_trait]
impl DeviceTokenRepository for FixtureDeviceTokenRepository {
    async fn list(&self) -> Result<Vec<DeviceToken>, DeviceTokenRepositoryError> {
        Ok(Vec::new())
    }

    async fn save(&self, _token: &DeviceToken) -> Result<(), DeviceTokenRepositoryError> {
        Ok(())
    }

    async fn remove(&self, _raw_token: &str) -> Result<(), DeviceTokenRepositoryError> {
        Ok(())
    }
}
