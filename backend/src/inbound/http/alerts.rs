//! Device registration and emergency broadcast HTTP handlers.
//!
//! ```text
//! POST /api/v1/devices
//! POST /api/v1/admin/alerts
//! GET  /api/v1/admin/overview
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AlertMessage, BroadcastSummary, DeviceRegistration, RegistryCounts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for registering a device token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    pub token: Option<String>,
    pub device_info: Option<String>,
}

/// Request payload for an emergency broadcast.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Register a device for push alerts.
///
/// Re-registering the same token refreshes its record rather than creating
/// a duplicate.
#[utoipa::path(
    post,
    path = "/api/v1/devices",
    request_body = DevicePayload,
    responses(
        (status = 204, description = "Device registered"),
        (status = 400, description = "Missing token", body = crate::domain::Error)
    ),
    tags = ["alerts"],
    security([]),
    operation_id = "registerDevice"
)]
#[post("/devices")]
pub async fn register_device(
    state: web::Data<HttpState>,
    payload: web::Json<DevicePayload>,
) -> ApiResult<HttpResponse> {
    let DevicePayload { token, device_info } = payload.into_inner();
    let token = token
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("token"))?;
    state
        .alerts
        .register_device(DeviceRegistration { token, device_info })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Push an emergency alert to every registered device.
#[utoipa::path(
    post,
    path = "/api/v1/admin/alerts",
    request_body = AlertPayload,
    responses(
        (status = 200, description = "Broadcast outcome", body = BroadcastSummary),
        (status = 400, description = "Missing title", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error),
        (status = 503, description = "Push gateway unavailable", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "broadcastAlert"
)]
#[post("/admin/alerts")]
pub async fn broadcast_alert(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AlertPayload>,
) -> ApiResult<web::Json<BroadcastSummary>> {
    let actor = session.require_donor_id()?;
    let AlertPayload { title, body } = payload.into_inner();
    let title = title
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("title"))?;
    let summary = state
        .alerts
        .broadcast(
            &actor,
            AlertMessage {
                title,
                body: body.unwrap_or_default(),
            },
        )
        .await?;
    Ok(web::Json(summary))
}

/// Headline counters for the admin dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    responses(
        (status = 200, description = "Registry counters", body = RegistryCounts),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "adminOverview"
)]
#[get("/admin/overview")]
pub async fn admin_overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RegistryCounts>> {
    let actor = session.require_donor_id()?;
    Ok(web::Json(state.overview.overview(&actor).await?))
}
