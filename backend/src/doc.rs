//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API: every endpoint of the inbound HTTP
//! layer, the shared schemas, and the session cookie security scheme.
//! Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Donor registry API",
        description = "HTTP interface for the blood-donation registry: donor \
                       accounts and availability, notices, campaigns, community \
                       partners, and emergency alerts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::auth::update_donation_date,
        crate::inbound::http::donors::list_donors,
        crate::inbound::http::donors::search_donors,
        crate::inbound::http::donors::update_donor,
        crate::inbound::http::donors::delete_donor,
        crate::inbound::http::notices::list_notices,
        crate::inbound::http::notices::publish_notice,
        crate::inbound::http::notices::update_notice,
        crate::inbound::http::notices::delete_notice,
        crate::inbound::http::campaigns::list_campaigns,
        crate::inbound::http::campaigns::toggle_like,
        crate::inbound::http::campaigns::add_comment,
        crate::inbound::http::campaigns::publish_campaign,
        crate::inbound::http::campaigns::update_campaign,
        crate::inbound::http::campaigns::delete_campaign,
        crate::inbound::http::community::get_community,
        crate::inbound::http::community::add_partner,
        crate::inbound::http::community::remove_partner,
        crate::inbound::http::alerts::register_device,
        crate::inbound::http::alerts::broadcast_alert,
        crate::inbound::http::alerts::admin_overview,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::Notice,
        crate::domain::NoticeUpdate,
        crate::domain::CampaignDraft,
        crate::domain::CampaignComment,
        crate::domain::CommunityData,
        crate::domain::CommunityPartner,
        crate::domain::DonorUpdate,
        crate::domain::ports::BroadcastSummary,
        crate::domain::ports::RegistryCounts,
        crate::inbound::http::auth::RegisterPayload,
        crate::inbound::http::auth::LoginPayload,
        crate::inbound::http::auth::DonationDatePayload,
        crate::inbound::http::auth::DonorResponse,
        crate::inbound::http::donors::StoredDonorResponse,
        crate::inbound::http::notices::NoticePayload,
        crate::inbound::http::campaigns::CommentPayload,
        crate::inbound::http::campaigns::CampaignResponse,
        crate::inbound::http::community::PartnerPayload,
        crate::inbound::http::alerts::DevicePayload,
        crate::inbound::http::alerts::AlertPayload,
    ))
)]
pub struct ApiDoc;
