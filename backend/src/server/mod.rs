//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_states;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::alerts::{admin_overview, broadcast_alert, register_device};
use backend::inbound::http::auth::{
    current_user, login, logout, register, update_donation_date,
};
use backend::inbound::http::campaigns::{
    add_comment, delete_campaign, list_campaigns, publish_campaign, toggle_like, update_campaign,
};
use backend::inbound::http::community::{add_partner, get_community, remove_partner};
use backend::inbound::http::donors::{delete_donor, list_donors, search_donors, update_donor};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::notices::{
    delete_notice, list_notices, publish_notice, update_notice,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::ws;
use backend::inbound::ws::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(update_donation_date)
        .service(list_donors)
        .service(search_donors)
        .service(update_donor)
        .service(delete_donor)
        .service(list_notices)
        .service(publish_notice)
        .service(update_notice)
        .service(delete_notice)
        .service(list_campaigns)
        .service(toggle_like)
        .service(add_comment)
        .service(publish_campaign)
        .service(update_campaign)
        .service(delete_campaign)
        .service(get_community)
        .service(add_partner)
        .service(remove_partner)
        .service(register_device)
        .service(broadcast_alert)
        .service(admin_overview);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .service(api)
        .service(ready)
        .service(live)
        .configure(ws::configure);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Build the HTTP server from the configuration.
pub fn create_server(
    config: ServerConfig,
    health_state: web::Data<HealthState>,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        store,
    } = config;

    let (http_state, ws_state) = build_states(store);
    let deps = AppDependencies {
        health_state,
        http_state: web::Data::new(http_state),
        ws_state: web::Data::new(ws_state),
        key,
        cookie_secure,
        same_site,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();
    Ok(server)
}
