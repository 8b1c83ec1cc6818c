//! Port for the community partner document.

use async_trait::async_trait;

use crate::domain::CommunityData;

/// Errors raised by community repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommunityRepositoryError {
    #[error("community store unreachable: {message}")]
    Unavailable { message: String },
    #[error("community store operation failed: {message}")]
    Query { message: String },
    #[error("corrupt community document: {message}")]
    Corrupt { message: String },
}

impl CommunityRepositoryError {
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

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

/// Port for the single community document.
///
/// The partner list is small and always replaced wholesale, mirroring how
/// the store keeps it as one node.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// The current document; an absent node reads as the empty default.
    async fn load(&self) -> Result<CommunityData, CommunityRepositoryError>;

    /// Replace the document.
    async fn save(&self, data: &CommunityData) -> Result<(), CommunityRepositoryError>;
}

/// Fixture repository with an empty roster.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommunityRepository;

#[async_trait]
impl CommunityRepository for FixtureCommunityRepository {
    async fn load(&self) -> Result<CommunityData, CommunityRepositoryError> {
        Ok(CommunityData::default())
    }

    async fn save(&self, _data: &CommunityData) -> Result<(), CommunityRepositoryError> {
        Ok(())
    }
}
