//! End-to-end flows over the HTTP adapter with the in-memory store.
//!
//! Drives the public API the way the browser app does: register, sign in,
//! record donations, and manage content as an administrator, checking that
//! the stored availability flag tracks the cooldown rule at every step.

use std::sync::Arc;

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use serde_json::{Value, json};

use backend::domain::ports::{RecordStore, StorePath};
use backend::domain::{
    AlertCenterService, CampaignFeedService, CommunityRosterService, DonorDirectoryService,
    DonorOnboardingService, NoticeBoardService, RegistryOverviewService,
};
use backend::inbound::http::alerts::{admin_overview, broadcast_alert, register_device};
use backend::inbound::http::auth::{
    current_user, login, logout, register, update_donation_date,
};
use backend::inbound::http::campaigns::{
    add_comment, list_campaigns, publish_campaign, toggle_like,
};
use backend::inbound::http::community::{add_partner, get_community};
use backend::inbound::http::donors::{list_donors, search_donors};
use backend::inbound::http::notices::{list_notices, publish_notice};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::identity::InMemoryIdentityProvider;
use backend::outbound::persistence::{
    StoreCampaignRepository, StoreCommunityRepository, StoreDeviceTokenRepository,
    StoreDonorRepository, StoreNoticeRepository,
};
use backend::outbound::push::LoggingPushGateway;
use backend::outbound::store::InMemoryRecordStore;

fn build_state(store: Arc<InMemoryRecordStore>) -> HttpState {
    let clock: Arc<dyn mockable::Clock> = Arc::new(DefaultClock);
    let store: Arc<dyn RecordStore> = store;

    let donors = Arc::new(StoreDonorRepository::new(Arc::clone(&store)));
    let notices = Arc::new(StoreNoticeRepository::new(Arc::clone(&store)));
    let campaigns = Arc::new(StoreCampaignRepository::new(Arc::clone(&store)));
    let community = Arc::new(StoreCommunityRepository::new(Arc::clone(&store)));
    let tokens = Arc::new(StoreDeviceTokenRepository::new(Arc::clone(&store)));
    let identity = Arc::new(InMemoryIdentityProvider::new());

    HttpState::new(HttpStatePorts {
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
            Arc::new(LoggingPushGateway),
            Arc::clone(&clock),
        )),
        overview: Arc::new(RegistryOverviewService::new(donors, notices, campaigns)),
    })
}

async fn spawn_app(
    store: Arc<InMemoryRecordStore>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let state = web::Data::new(build_state(store));
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build();

    test::init_service(
        App::new().app_data(state).service(
            web::scope("/api/v1")
                .wrap(session)
                .service(register)
                .service(login)
                .service(logout)
                .service(current_user)
                .service(update_donation_date)
                .service(list_donors)
                .service(search_donors)
                .service(list_notices)
                .service(publish_notice)
                .service(list_campaigns)
                .service(toggle_like)
                .service(add_comment)
                .service(publish_campaign)
                .service(get_community)
                .service(add_partner)
                .service(register_device)
                .service(broadcast_alert)
                .service(admin_overview),
        ),
    )
    .await
}

fn days_ago(days: i64) -> String {
    (Utc::now().date_naive() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn register_payload(name: &str, email: &str, last_donation_date: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "01712345678",
        "bloodGroup": "O+",
        "area": "Mirpur, Dhaka",
        "lastDonationDate": last_donation_date,
        "password": "secret123",
    })
}

async fn register_account<S>(app: &S, payload: Value) -> (Value, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201, "registration should succeed");
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie issued")
        .into_owned();
    let body: Value = test::read_body_json(res).await;
    (body, cookie)
}

/// Promote an account to administrator by editing the stored record, the
/// way an operator would through the hosted console.
async fn promote_to_admin(store: &InMemoryRecordStore, uid: &str) {
    let path = StorePath::new(format!("users/{uid}")).expect("valid path");
    let mut fields = serde_json::Map::new();
    fields.insert("role".to_owned(), json!("admin"));
    store.write_partial(&path, fields).await.expect("promote");
}

#[actix_web::test]
async fn registration_applies_the_cooldown_rule_immediately() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (body, _cookie) = register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", &days_ago(10)),
    )
    .await;

    assert_eq!(body["isAvailable"], false);
    assert_eq!(body["daysRemaining"], 80);

    // The stored flag was reconciled to match the rule.
    let uid = body["uid"].as_str().expect("uid in response");
    let raw = store
        .read_once(&StorePath::new(format!("users/{uid}")).expect("path"))
        .await
        .expect("read")
        .expect("record stored");
    assert_eq!(raw["isAvailable"], false);
}

#[actix_web::test]
async fn recording_an_old_donation_restores_eligibility() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (body, cookie) = register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", &days_ago(10)),
    )
    .await;
    assert_eq!(body["isAvailable"], false);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/users/me/last-donation-date")
            .cookie(cookie.clone())
            .set_json(json!({ "date": days_ago(120) }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let refreshed: Value = test::read_body_json(res).await;
    assert_eq!(refreshed["isAvailable"], true);
    assert_eq!(refreshed["daysRemaining"], 0);
    assert_eq!(refreshed["lastDonationDate"], days_ago(120));

    // Exactly 90 days ago sits on the inclusive boundary.
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/users/me/last-donation-date")
            .cookie(cookie)
            .set_json(json!({ "date": days_ago(90) }))
            .to_request(),
    )
    .await;
    let boundary: Value = test::read_body_json(res).await;
    assert_eq!(boundary["isAvailable"], true);
}

#[actix_web::test]
async fn a_stale_stored_flag_heals_on_the_next_load() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (body, cookie) = register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", &days_ago(200)),
    )
    .await;
    let uid = body["uid"].as_str().expect("uid in response").to_owned();

    // Sabotage the derived flag behind the engine's back.
    let path = StorePath::new(format!("users/{uid}")).expect("path");
    let mut fields = serde_json::Map::new();
    fields.insert("isAvailable".to_owned(), json!(false));
    store.write_partial(&path, fields).await.expect("sabotage");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let me: Value = test::read_body_json(res).await;
    assert_eq!(me["isAvailable"], true);

    let healed = store
        .read_once(&path)
        .await
        .expect("read")
        .expect("record present");
    assert_eq!(healed["isAvailable"], true);
}

#[actix_web::test]
async fn login_rejects_wrong_passwords_and_refreshes_state() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;
    register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", ""),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "rahim@example.org", "password": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 401);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "rahim@example.org", "password": "secret123" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["isAvailable"], true);
    assert_eq!(body["daysRemaining"], 0);
}

#[actix_web::test]
async fn public_listing_filters_by_blood_group_and_hides_admins() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (first, _) = register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", ""),
    )
    .await;
    let mut second_payload = register_payload("Karim Hossain", "karim@example.org", "");
    second_payload["bloodGroup"] = json!("B+");
    register_account(&app, second_payload).await;

    // Promote the first account; it must vanish from the public listing.
    promote_to_admin(&store, first["uid"].as_str().expect("uid")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/donors").to_request(),
    )
    .await;
    let listing: Value = test::read_body_json(res).await;
    let names: Vec<&str> = listing
        .as_array()
        .expect("array")
        .iter()
        .map(|donor| donor["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["Karim Hossain"]);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/donors?bloodGroup=O%2B")
            .to_request(),
    )
    .await;
    let filtered: Value = test::read_body_json(res).await;
    assert!(filtered.as_array().expect("array").is_empty());
}

#[actix_web::test]
async fn administrators_manage_notices_and_donors_cannot() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (admin_body, admin_cookie) = register_account(
        &app,
        register_payload("Admin", "admin@example.org", ""),
    )
    .await;
    promote_to_admin(&store, admin_body["uid"].as_str().expect("uid")).await;

    let (_donor_body, donor_cookie) = register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", ""),
    )
    .await;

    // A plain donor is turned away.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/notices")
            .cookie(donor_cookie)
            .set_json(json!({ "title": "Urgent O-", "message": "Two bags needed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 403);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/notices")
            .cookie(admin_cookie.clone())
            .set_json(json!({ "title": "Urgent O-", "message": "Two bags needed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/notices").to_request(),
    )
    .await;
    let notices: Value = test::read_body_json(res).await;
    assert_eq!(notices[0]["title"], "Urgent O-");

    // The admin search sees both records.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/donors?search=rahim")
            .cookie(admin_cookie.clone())
            .to_request(),
    )
    .await;
    let found: Value = test::read_body_json(res).await;
    assert_eq!(found.as_array().expect("array").len(), 1);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/overview")
            .cookie(admin_cookie)
            .to_request(),
    )
    .await;
    let overview: Value = test::read_body_json(res).await;
    assert_eq!(overview["donors"], 1);
    assert_eq!(overview["notices"], 1);
}

#[actix_web::test]
async fn campaign_likes_and_comments_flow() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (admin_body, admin_cookie) = register_account(
        &app,
        register_payload("Admin", "admin@example.org", ""),
    )
    .await;
    promote_to_admin(&store, admin_body["uid"].as_str().expect("uid")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/campaigns")
            .cookie(admin_cookie)
            .set_json(json!({
                "title": "Winter drive",
                "description": "Join us",
                "imageUrl": "https://example.org/banner.jpg",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let campaign: Value = test::read_body_json(res).await;
    let id = campaign["id"].as_str().expect("campaign id").to_owned();

    let (_reader, reader_cookie) = register_account(
        &app,
        register_payload("Rahim Uddin", "rahim@example.org", ""),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/campaigns/{id}/like"))
            .cookie(reader_cookie.clone())
            .to_request(),
    )
    .await;
    let like: Value = test::read_body_json(res).await;
    assert_eq!(like["liked"], true);

    // Toggling again clears the like.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/campaigns/{id}/like"))
            .cookie(reader_cookie.clone())
            .to_request(),
    )
    .await;
    let unlike: Value = test::read_body_json(res).await;
    assert_eq!(unlike["liked"], false);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/campaigns/{id}/comments"))
            .cookie(reader_cookie)
            .set_json(json!({ "text": "Count me in" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let comment: Value = test::read_body_json(res).await;
    assert_eq!(comment["userName"], "Rahim Uddin");

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/campaigns").to_request(),
    )
    .await;
    let feed: Value = test::read_body_json(res).await;
    assert_eq!(feed[0]["likeCount"], 0);
    assert_eq!(feed[0]["comments"][0]["text"], "Count me in");
}

#[actix_web::test]
async fn broadcast_reaches_registered_devices() {
    let store = Arc::new(InMemoryRecordStore::new());
    let app = spawn_app(Arc::clone(&store)).await;

    let (admin_body, admin_cookie) = register_account(
        &app,
        register_payload("Admin", "admin@example.org", ""),
    )
    .await;
    promote_to_admin(&store, admin_body["uid"].as_str().expect("uid")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/devices")
            .set_json(json!({ "token": "device.token/one", "deviceInfo": "test agent" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 204);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/alerts")
            .cookie(admin_cookie)
            .set_json(json!({ "title": "Urgent O-", "body": "Two bags needed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let summary: Value = test::read_body_json(res).await;
    assert_eq!(summary["delivered"], 1);
    assert_eq!(summary["pruned"], 0);
}
