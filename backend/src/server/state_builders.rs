//! Assembly of the HTTP and WebSocket states from the record store.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use backend::domain::ports::RecordStore;
use backend::domain::{
    AlertCenterService, CampaignFeedService, CommunityRosterService, DonorDirectoryService,
    DonorOnboardingService, NoticeBoardService, RegistryOverviewService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::inbound::ws::WsState;
use backend::outbound::identity::InMemoryIdentityProvider;
use backend::outbound::persistence::{
    StoreCampaignRepository, StoreCommunityRepository, StoreDeviceTokenRepository,
    StoreDonorRepository, StoreNoticeRepository,
};
use backend::outbound::push::LoggingPushGateway;

/// Wire every service over the chosen record store.
pub(crate) fn build_states(store: Arc<dyn RecordStore>) -> (HttpState, WsState) {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let donors = Arc::new(StoreDonorRepository::new(Arc::clone(&store)));
    let notices = Arc::new(StoreNoticeRepository::new(Arc::clone(&store)));
    let campaigns = Arc::new(StoreCampaignRepository::new(Arc::clone(&store)));
    let community = Arc::new(StoreCommunityRepository::new(Arc::clone(&store)));
    let tokens = Arc::new(StoreDeviceTokenRepository::new(Arc::clone(&store)));

    let identity = Arc::new(InMemoryIdentityProvider::new());
    let gateway = Arc::new(LoggingPushGateway);

    let http_state = HttpState::new(HttpStatePorts {
        onboarding: Arc::new(DonorOnboardingService::new(
            Arc::clone(&donors),
            identity,
            Arc::clone(&clock),
        )),
        donors: Arc::new(DonorDirectoryService::new(
            Arc::clone(&donors),
            Arc::clone(&clock),
        )),
        notices: Arc::new(NoticeBoardService::new(
            Arc::clone(&donors),
            Arc::clone(&notices),
            Arc::clone(&clock),
        )),
        campaigns: Arc::new(CampaignFeedService::new(
            Arc::clone(&donors),
            Arc::clone(&campaigns),
            Arc::clone(&clock),
        )),
        community: Arc::new(CommunityRosterService::new(
            Arc::clone(&donors),
            community,
        )),
        alerts: Arc::new(AlertCenterService::new(
            Arc::clone(&donors),
            tokens,
            gateway,
            Arc::clone(&clock),
        )),
        overview: Arc::new(RegistryOverviewService::new(donors, notices, campaigns)),
    });

    let ws_state = WsState { store };
    (http_state, ws_state)
}
