//! Campaign feed HTTP handlers.
//!
//! ```text
//! GET    /api/v1/campaigns
//! POST   /api/v1/campaigns/{id}/like
//! POST   /api/v1/campaigns/{id}/comments
//! POST   /api/v1/admin/campaigns
//! PUT    /api/v1/admin/campaigns/{id}
//! DELETE /api/v1/admin/campaigns/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Campaign, CampaignComment, CampaignDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for a comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub text: Option<String>,
}

/// One campaign with aggregate counters for the feed view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub date: String,
    pub like_count: usize,
    pub comments: Vec<CampaignComment>,
}

impl From<Campaign> for CampaignResponse {
    fn from(campaign: Campaign) -> Self {
        let like_count = campaign.like_count();
        let comments = campaign.comments_in_order().into_iter().cloned().collect();
        Self {
            id: campaign.id,
            title: campaign.title,
            description: campaign.description,
            image_url: campaign.image_url,
            date: campaign.date,
            like_count,
            comments,
        }
    }
}

/// Public campaign feed, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    responses((status = 200, description = "Campaigns, newest first", body = [CampaignResponse])),
    tags = ["campaigns"],
    security([]),
    operation_id = "listCampaigns"
)]
#[get("/campaigns")]
pub async fn list_campaigns(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CampaignResponse>>> {
    let campaigns = state.campaigns.list().await?;
    Ok(web::Json(
        campaigns.into_iter().map(CampaignResponse::from).collect(),
    ))
}

/// Toggle the signed-in donor's like on a campaign.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/{id}/like",
    params(("id" = String, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "New like state"),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 404, description = "Campaign not found", body = crate::domain::Error)
    ),
    tags = ["campaigns"],
    operation_id = "toggleLike"
)]
#[post("/campaigns/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let liked = state
        .campaigns
        .toggle_like(&actor, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "liked": liked })))
}

/// Comment on a campaign as the signed-in donor.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/{id}/comments",
    request_body = CommentPayload,
    params(("id" = String, Path, description = "Campaign id")),
    responses(
        (status = 201, description = "Comment stored", body = CampaignComment),
        (status = 400, description = "Empty comment", body = crate::domain::Error),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 404, description = "Campaign not found", body = crate::domain::Error)
    ),
    tags = ["campaigns"],
    operation_id = "addComment"
)]
#[post("/campaigns/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let text = payload
        .into_inner()
        .text
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("text"))?;
    let comment = state
        .campaigns
        .comment(&actor, &path.into_inner(), text)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Publish a campaign.
#[utoipa::path(
    post,
    path = "/api/v1/admin/campaigns",
    request_body = CampaignDraft,
    responses(
        (status = 201, description = "Campaign published", body = CampaignResponse),
        (status = 400, description = "Missing title or image", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "publishCampaign"
)]
#[post("/admin/campaigns")]
pub async fn publish_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CampaignDraft>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let campaign = state.campaigns.post(&actor, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(CampaignResponse::from(campaign)))
}

/// Edit a campaign's content.
#[utoipa::path(
    put,
    path = "/api/v1/admin/campaigns/{id}",
    request_body = CampaignDraft,
    params(("id" = String, Path, description = "Campaign id")),
    responses(
        (status = 204, description = "Campaign updated"),
        (status = 403, description = "Not an administrator", body = crate::domain::Error),
        (status = 404, description = "Campaign not found", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "updateCampaign"
)]
#[put("/admin/campaigns/{id}")]
pub async fn update_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CampaignDraft>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    state
        .campaigns
        .revise(&actor, &path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a campaign.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/campaigns/{id}",
    params(("id" = String, Path, description = "Campaign id")),
    responses(
        (status = 204, description = "Campaign deleted"),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "deleteCampaign"
)]
#[delete("/admin/campaigns/{id}")]
pub async fn delete_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    state.campaigns.retract(&actor, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn campaign_response_counts_only_active_likes() {
        let mut likes = BTreeMap::new();
        likes.insert("a".to_owned(), true);
        likes.insert("b".to_owned(), false);
        let campaign = Campaign {
            id: "c1".to_owned(),
            title: "Winter drive".to_owned(),
            description: String::new(),
            image_url: "https://example.org/banner.jpg".to_owned(),
            date: "2024-04-01T10:00:00Z".to_owned(),
            likes,
            comments: BTreeMap::new(),
        };
        let response = CampaignResponse::from(campaign);
        assert_eq!(response.like_count, 1);
        assert!(response.comments.is_empty());
    }
}
