//! Driving port for campaign posts.

use async_trait::async_trait;

use crate::domain::{Campaign, CampaignComment, CampaignDraft, DonorId, Error};

/// Driving port for the campaign feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignFeed: Send + Sync {
    /// All campaigns, newest first. Public.
    async fn list(&self) -> Result<Vec<Campaign>, Error>;

    /// Publish a campaign. Administrators only.
    async fn post(&self, actor: &DonorId, draft: CampaignDraft) -> Result<Campaign, Error>;

    /// Edit a campaign's content. Administrators only.
    async fn revise(&self, actor: &DonorId, id: &str, draft: CampaignDraft) -> Result<(), Error>;

    /// Delete a campaign. Administrators only.
    async fn retract(&self, actor: &DonorId, id: &str) -> Result<(), Error>;

    /// Flip the acting donor's like on a campaign, returning the new state.
    async fn toggle_like(&self, actor: &DonorId, id: &str) -> Result<bool, Error>;

    /// Append a comment under a campaign as the acting donor.
    async fn comment(
        &self,
        actor: &DonorId,
        id: &str,
        text: String,
    ) -> Result<CampaignComment, Error>;
}

/// Fixture feed with no campaigns.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCampaignFeed;

#[async_trait]
impl CampaignFeed for FixtureCampaignFeed {
    async fn list(&self) -> Result<Vec<Campaign>, Error> {
        Ok(Vec::new())
    }

    async fn post(&self, _actor: &DonorId, _draft: CampaignDraft) -> Result<Campaign, Error> {
        Err(Error::service_unavailable("campaign store not configured"))
    }

    async fn revise(&self, _actor: &DonorId, id: &str, _draft: CampaignDraft) -> Result<(), Error> {
        Err(Error::not_found(format!("campaign {id} not found")))
    }

    async fn retract(&self, _actor: &DonorId, _id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn toggle_like(&self, _actor: &DonorId, id: &str) -> Result<bool, Error> {
        Err(Error::not_found(format!("campaign {id} not found")))
    }

    async fn comment(
        &self,
        _actor: &DonorId,
        id: &str,
        _text: String,
    ) -> Result<CampaignComment, Error> {
        Err(Error::not_found(format!("campaign {id} not found")))
    }
}
