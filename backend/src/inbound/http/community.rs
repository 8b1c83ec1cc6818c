//! Community roster HTTP handlers.
//!
//! ```text
//! GET    /api/v1/community
//! POST   /api/v1/admin/community/partners
//! DELETE /api/v1/admin/community/partners/{index}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CommunityData, CommunityPartner};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for adding a partner.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPayload {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// Public community page data.
#[utoipa::path(
    get,
    path = "/api/v1/community",
    responses((status = 200, description = "Partner roster", body = CommunityData)),
    tags = ["community"],
    security([]),
    operation_id = "getCommunity"
)]
#[get("/community")]
pub async fn get_community(state: web::Data<HttpState>) -> ApiResult<web::Json<CommunityData>> {
    Ok(web::Json(state.community.roster().await?))
}

/// Add a community partner.
#[utoipa::path(
    post,
    path = "/api/v1/admin/community/partners",
    request_body = PartnerPayload,
    responses(
        (status = 204, description = "Partner added"),
        (status = 400, description = "Missing name or logo URL", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "addPartner"
)]
#[post("/admin/community/partners")]
pub async fn add_partner(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PartnerPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let PartnerPayload { name, image_url } = payload.into_inner();
    let name = name
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("name"))?;
    let image_url = image_url
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("imageUrl"))?;
    state
        .community
        .add_partner(&actor, CommunityPartner { name, image_url })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove the community partner at a position.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/community/partners/{index}",
    params(("index" = usize, Path, description = "Zero-based roster position")),
    responses(
        (status = 204, description = "Partner removed"),
        (status = 400, description = "No partner at that position", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "removePartner"
)]
#[delete("/admin/community/partners/{index}")]
pub async fn remove_partner(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<usize>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    state
        .community
        .remove_partner(&actor, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
