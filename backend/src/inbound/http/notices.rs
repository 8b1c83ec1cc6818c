//! Notice-board HTTP handlers.
//!
//! ```text
//! GET    /api/v1/notices
//! POST   /api/v1/admin/notices
//! PUT    /api/v1/admin/notices/{id}
//! DELETE /api/v1/admin/notices/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::NewNotice;
use crate::domain::{Notice, NoticeUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for publishing a notice.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticePayload {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// Public notice listing, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notices",
    responses((status = 200, description = "Notices, newest first", body = [Notice])),
    tags = ["notices"],
    security([]),
    operation_id = "listNotices"
)]
#[get("/notices")]
pub async fn list_notices(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Notice>>> {
    Ok(web::Json(state.notices.list().await?))
}

/// Publish a notice.
#[utoipa::path(
    post,
    path = "/api/v1/admin/notices",
    request_body = NoticePayload,
    responses(
        (status = 201, description = "Notice published", body = Notice),
        (status = 400, description = "Missing title", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "publishNotice"
)]
#[post("/admin/notices")]
pub async fn publish_notice(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NoticePayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let NoticePayload { title, message } = payload.into_inner();
    let title = title
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("title"))?;
    let notice = state
        .notices
        .publish(
            &actor,
            NewNotice {
                title,
                message: message.unwrap_or_default(),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(notice))
}

/// Edit a notice.
#[utoipa::path(
    put,
    path = "/api/v1/admin/notices/{id}",
    request_body = NoticeUpdate,
    params(("id" = String, Path, description = "Notice id")),
    responses(
        (status = 204, description = "Notice updated"),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "updateNotice"
)]
#[put("/admin/notices/{id}")]
pub async fn update_notice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<NoticeUpdate>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    state
        .notices
        .amend(&actor, &path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a notice.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/notices/{id}",
    params(("id" = String, Path, description = "Notice id")),
    responses(
        (status = 204, description = "Notice deleted"),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "deleteNotice"
)]
#[delete("/admin/notices/{id}")]
pub async fn delete_notice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    state.notices.retract(&actor, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNoticeBoard;
    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_utils::fixture_ports;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn listing_is_public() {
        let mut board = MockNoticeBoard::new();
        board.expect_list().times(1).return_once(|| {
            Ok(vec![Notice {
                id: "n1".to_owned(),
                title: "Urgent O-".to_owned(),
                message: "Two bags needed".to_owned(),
                date: "2024-04-10".to_owned(),
            }])
        });

        let mut ports = fixture_ports();
        ports.notices = Arc::new(board);
        let state = actix_web::web::Data::new(HttpState::new(ports));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .service(list_notices),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/notices").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body[0]["id"], "n1");
    }

    #[actix_web::test]
    async fn publishing_requires_a_session() {
        let state = actix_web::web::Data::new(HttpState::new(fixture_ports()));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .service(publish_notice),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin/notices")
                .set_json(serde_json::json!({ "title": "t", "message": "m" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
