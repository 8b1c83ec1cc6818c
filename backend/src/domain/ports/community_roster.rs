//! Driving port for the community partner roster.

use async_trait::async_trait;

use crate::domain::{CommunityData, CommunityPartner, DonorId, Error};

/// Driving port for reading and managing community partners.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRoster: Send + Sync {
    /// The current roster. Public.
    async fn roster(&self) -> Result<CommunityData, Error>;

    /// Append a partner. Administrators only.
    async fn add_partner(&self, actor: &DonorId, partner: CommunityPartner) -> Result<(), Error>;

    /// Remove the partner at `index`. Administrators only.
    async fn remove_partner(&self, actor: &DonorId, index: usize) -> Result<(), Error>;
}

/// Fixture roster with no partners.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommunityRoster;

#[async_trait]
impl CommunityRoster for FixtureCommunityRoster {
    async fn roster(&self) -> Result<CommunityData, Error> {
        Ok(CommunityData::default())
    }

    async fn add_partner(&self, _actor: &DonorId, _partner: CommunityPartner) -> Result<(), Error> {
        Ok(())
    }

    async fn remove_partner(&self, _actor: &DonorId, index: usize) -> Result<(), Error> {
        Err(Error::invalid_request(format!(
            "no partner at index {index}"
        )))
    }
}
