//! Shared fixtures for HTTP adapter tests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};

use crate::domain::ports::{
    FixtureAlertCenter, FixtureCampaignFeed, FixtureCommunityRoster, FixtureDonorDirectory,
    FixtureDonorOnboarding, FixtureNoticeBoard, FixtureRegistryOverview,
};
use crate::inbound::http::state::HttpStatePorts;

/// Ports bundle made entirely of fixtures; tests override what they probe.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        onboarding: Arc::new(FixtureDonorOnboarding),
        donors: Arc::new(FixtureDonorDirectory),
        notices: Arc::new(FixtureNoticeBoard),
        campaigns: Arc::new(FixtureCampaignFeed),
        community: Arc::new(FixtureCommunityRoster),
        alerts: Arc::new(FixtureAlertCenter),
        overview: Arc::new(FixtureRegistryOverview),
    }
}

/// Cookie-session middleware with a throwaway key for tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build()
}
