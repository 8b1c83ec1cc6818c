//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AlertCenter, CampaignFeed, CommunityRoster, DonorDirectory, DonorOnboarding, NoticeBoard,
    RegistryOverview,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub onboarding: Arc<dyn DonorOnboarding>,
    pub donors: Arc<dyn DonorDirectory>,
    pub notices: Arc<dyn NoticeBoard>,
    pub campaigns: Arc<dyn CampaignFeed>,
    pub community: Arc<dyn CommunityRoster>,
    pub alerts: Arc<dyn AlertCenter>,
    pub overview: Arc<dyn RegistryOverview>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub onboarding: Arc<dyn DonorOnboarding>,
    pub donors: Arc<dyn DonorDirectory>,
    pub notices: Arc<dyn NoticeBoard>,
    pub campaigns: Arc<dyn CampaignFeed>,
    pub community: Arc<dyn CommunityRoster>,
    pub alerts: Arc<dyn AlertCenter>,
    pub overview: Arc<dyn RegistryOverview>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureAlertCenter, FixtureCampaignFeed, FixtureCommunityRoster,
    ///     FixtureDonorDirectory, FixtureDonorOnboarding, FixtureNoticeBoard,
    ///     FixtureRegistryOverview,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let ports = HttpStatePorts {
    ///     onboarding: Arc::new(FixtureDonorOnboarding),
    ///     donors: Arc::new(FixtureDonorDirectory),
    ///     notices: Arc::new(FixtureNoticeBoard),
    ///     campaigns: Arc::new(FixtureCampaignFeed),
    ///     community: Arc::new(FixtureCommunityRoster),
    ///     alerts: Arc::new(FixtureAlertCenter),
    ///     overview: Arc::new(FixtureRegistryOverview),
    /// };
    /// let state = HttpState::new(ports);
    /// let _donors = state.donors.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            onboarding,
            donors,
            notices,
            campaigns,
            community,
            alerts,
            overview,
        } = ports;
        Self {
            onboarding,
            donors,
            notices,
            campaigns,
            community,
            alerts,
            overview,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
