//! Driving port for the administrative overview counters.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DonorId, Error};

/// Headline counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCounts {
    pub donors: usize,
    /// Donors whose stored flag marks them ready to donate.
    pub available_donors: usize,
    pub notices: usize,
    pub campaigns: usize,
}

/// Driving port for the overview counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryOverview: Send + Sync {
    /// Current counters. Administrators only.
    async fn overview(&self, actor: &DonorId) -> Result<RegistryCounts, Error>;
}

/// Fixture overview with all counters at zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistryOverview;

#[async_trait]
impl RegistryOverview for FixtureRegistryOverview {
    async fn overview(&self, _actor: &DonorId) -> Result<RegistryCounts, Error> {
        Ok(RegistryCounts::default())
    }
}
