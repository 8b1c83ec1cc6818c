//! Port for campaign persistence.

use async_trait::async_trait;

use crate::domain::{Campaign, CampaignComment, CampaignDraft, DonorId};

/// Errors raised by campaign repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CampaignRepositoryError {
    #[error("campaign store unreachable: {message}")]
    Unavailable { message: String },
    #[error("campaign store operation failed: {message}")]
    Query { message: String },
    #[error("corrupt campaign at {id}: {message}")]
    Corrupt { id: String, message: String },
}

impl CampaignRepositoryError {
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

    pub fn corrupt(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Port for campaign storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// All campaigns, newest first.
    async fn list(&self) -> Result<Vec<Campaign>, CampaignRepositoryError>;

    /// Fetch one campaign, `None` when absent.
    async fn find(&self, id: &str) -> Result<Option<Campaign>, CampaignRepositoryError>;

    /// Append a campaign, returning it with the generated id filled in.
    async fn append(&self, campaign: &Campaign) -> Result<Campaign, CampaignRepositoryError>;

    /// Overwrite the editable fields of one campaign.
    async fn update(&self, id: &str, draft: &CampaignDraft)
    -> Result<(), CampaignRepositoryError>;

    /// Remove one campaign together with its likes and comments.
    async fn delete(&self, id: &str) -> Result<(), CampaignRepositoryError>;

    /// Set or clear the like entry of one donor on one campaign.
    async fn set_like(
        &self,
        id: &str,
        uid: &DonorId,
        liked: bool,
    ) -> Result<(), CampaignRepositoryError>;

    /// Append a comment under one campaign.
    async fn append_comment(
        &self,
        id: &str,
        comment: &CampaignComment,
    ) -> Result<(), CampaignRepositoryError>;
}

/// Fixture repository holding no campaigns.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCampaignRepository;

#[async_trait]
impl CampaignRepository for FixtureCampaignRepository {
    async fn list(&self) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: &str) -> Result<Option<Campaign>, CampaignRepositoryError> {
        Ok(None)
    }

    async fn append(&self, campaign: &Campaign) -> Result<Campaign, CampaignRepositoryError> {
        Ok(campaign.clone())
    }

    async fn update(
        &self,
        _id: &str,
        _draft: &CampaignDraft,
    ) -> Result<(), CampaignRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &str) -> Result<(), CampaignRepositoryError> {
        Ok(())
    }

    async fn set_like(
        &self,
        _id: &str,
        _uid: &DonorId,
        _liked: bool,
    ) -> Result<(), CampaignRepositoryError> {
        Ok(())
    }

    async fn append_comment(
        &self,
        _id: &str,
        _comment: &CampaignComment,
    ) -> Result<(), CampaignRepositoryError> {
        Ok(())
    }
}
