//! WebSocket inbound adapter streaming record store changes.
//!
//! The browser app keeps its notice board and campaign feed live through
//! store subscriptions. This adapter exposes the same change feed over a
//! WebSocket: every time the subscribed node changes, the client receives
//! the full node as one JSON text frame, starting with the current value
//! at connect time.

mod session;

use std::sync::Arc;

use actix_web::error::ErrorServiceUnavailable;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::warn;

use crate::domain::ports::{RecordStore, StorePath};

/// Dependency bundle for the WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub store: Arc<dyn RecordStore>,
}

/// Collections exposed as public change feeds.
///
/// Only listable, non-personal nodes are streamed; donor records stay
/// behind the REST endpoints and their access checks.
const PUBLIC_FEEDS: [&str; 3] = ["notices", "campaigns", "community"];

/// Open a change feed on one public collection.
pub async fn feed(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<WsState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let collection = path.into_inner();
    if !PUBLIC_FEEDS.contains(&collection.as_str()) {
        return Err(actix_web::error::ErrorNotFound(format!(
            "no public feed named {collection}"
        )));
    }

    let store_path = StorePath::new(&collection)
        .map_err(|error| actix_web::error::ErrorInternalServerError(error.to_string()))?;
    let subscription = state.store.subscribe(&store_path).await.map_err(|error| {
        warn!(%collection, %error, "store subscription failed");
        ErrorServiceUnavailable("record store unavailable")
    })?;

    let (response, session, stream) = actix_ws::handle(&req, body)?;
    actix_web::rt::spawn(session::run_feed(session, stream, subscription));
    Ok(response)
}

/// Register the WebSocket routes.
pub fn configure(config: &mut web::ServiceConfig) {
    config.service(web::resource("/ws/{collection}").route(web::get().to(feed)));
}
