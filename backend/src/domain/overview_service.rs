//! Administrative overview counters.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::access::{map_donor_repo_error, require_admin};
use crate::domain::ports::{
    CampaignRepository, DonorRepository, NoticeRepository, RegistryCounts, RegistryOverview,
};
use crate::domain::{DonorId, Error};

/// Overview service implementing the driving port.
#[derive(Clone)]
pub struct RegistryOverviewService<D, N, C> {
    donors: Arc<D>,
    notices: Arc<N>,
    campaigns: Arc<C>,
}

impl<D, N, C> RegistryOverviewService<D, N, C> {
    /// Create the service over the three collection repositories.
    pub fn new(donors: Arc<D>, notices: Arc<N>, campaigns: Arc<C>) -> Self {
        Self {
            donors,
            notices,
            campaigns,
        }
    }
}

#[async_trait]
impl<D, N, C> RegistryOverview for RegistryOverviewService<D, N, C>
where
    D: DonorRepository,
    N: NoticeRepository,
    C: CampaignRepository,
{
    async fn overview(&self, actor: &DonorId) -> Result<RegistryCounts, Error> {
        require_admin(self.donors.as_ref(), actor).await?;

        let records = self.donors.list().await.map_err(map_donor_repo_error)?;
        let donors = records.iter().filter(|r| r.is_donor()).count();
        // The dashboard counter filters on the stored flag, the same way
        // the store-side listing filter does.
        let available_donors = records
            .iter()
            .filter(|r| r.is_donor() && r.is_available)
            .count();

        let notices = self
            .notices
            .list()
            .await
            .map_err(|error| Error::internal(format!("notice store error: {error}")))?
            .len();
        let campaigns = self
            .campaigns
            .list()
            .await
            .map_err(|error| Error::internal(format!("campaign store error: {error}")))?
            .len();

        Ok(RegistryCounts {
            donors,
            available_donors,
            notices,
            campaigns,
        })
    }
}
