//! Account HTTP handlers: registration, login, logout, current user.
//!
//! ```text
//! POST /api/v1/auth/register
//! POST /api/v1/auth/login
//! POST /api/v1/auth/logout
//! GET  /api/v1/users/me
//! PUT  /api/v1/users/me/last-donation-date
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{DonorSnapshot, LoginRequest, RegisterRequest};
use crate::domain::{Error, NewDonor};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_blood_group_field, parse_date_field,
};

/// Request payload for donor registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub area: Option<String>,
    pub institution: Option<String>,
    /// `YYYY-MM-DD`, or empty for "never donated".
    pub last_donation_date: Option<String>,
    pub password: Option<String>,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request payload for the donation date update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationDatePayload {
    /// `YYYY-MM-DD`; submitting without a selected date is an error.
    pub date: Option<String>,
}

/// Response payload for one donor with computed availability.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorResponse {
    pub uid: String,
    pub name: String,
    pub blood_group: String,
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub phone: String,
    pub email: String,
    /// `YYYY-MM-DD`, empty when the donor has never donated.
    pub last_donation_date: String,
    /// Availability computed from the cooldown rule at response time.
    pub is_available: bool,
    /// Whole days left until the donor may donate again.
    pub days_remaining: u32,
    pub role: String,
}

impl From<DonorSnapshot> for DonorResponse {
    fn from(snapshot: DonorSnapshot) -> Self {
        let DonorSnapshot {
            record,
            availability,
        } = snapshot;
        Self {
            uid: record.uid.to_string(),
            name: record.name,
            blood_group: record.blood_group.to_string(),
            area: record.area,
            institution: record.institution,
            phone: record.phone,
            email: record.email,
            last_donation_date: record
                .last_donation_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            is_available: availability.is_available,
            days_remaining: availability.days_remaining,
            role: match record.role {
                crate::domain::DonorRole::Admin => "admin".to_owned(),
                crate::domain::DonorRole::Donor => "donor".to_owned(),
            },
        }
    }
}

fn parse_register_payload(payload: RegisterPayload) -> Result<RegisterRequest, Error> {
    let name = payload
        .name
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("name"))?;
    let email = payload
        .email
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("email"))?;
    let phone = payload
        .phone
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("phone"))?;
    let blood_group_raw = payload
        .blood_group
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("bloodGroup"))?;
    let area = payload
        .area
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("area"))?;
    let password = payload
        .password
        .filter(|value| !value.is_empty())
        .ok_or_else(|| missing_field_error("password"))?;

    let blood_group = parse_blood_group_field("bloodGroup", &blood_group_raw)?;
    let last_donation_date = match payload.last_donation_date.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_date_field("lastDonationDate", raw)?),
    };

    let profile = NewDonor::try_new(
        name,
        blood_group,
        area,
        payload.institution,
        phone,
        email,
        last_donation_date,
    )
    .map_err(|err| Error::invalid_request(err.to_string()))?;

    Ok(RegisterRequest { profile, password })
}

/// Register a donor account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Donor registered and signed in", body = DonorResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 409, description = "Email already in use", body = crate::domain::Error),
        (status = 503, description = "Identity provider or store unavailable", body = crate::domain::Error)
    ),
    tags = ["auth"],
    security([]),
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterPayload>,
) -> ApiResult<HttpResponse> {
    let request = parse_register_payload(payload.into_inner())?;
    let snapshot = state.onboarding.register(request).await?;
    session.persist_donor(&snapshot.record.uid)?;
    Ok(HttpResponse::Created().json(DonorResponse::from(snapshot)))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Signed in", body = DonorResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Invalid credentials", body = crate::domain::Error)
    ),
    tags = ["auth"],
    security([]),
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginPayload>,
) -> ApiResult<web::Json<DonorResponse>> {
    let LoginPayload { email, password } = payload.into_inner();
    let email = email
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("email"))?;
    let password = password
        .filter(|value| !value.is_empty())
        .ok_or_else(|| missing_field_error("password"))?;
    let snapshot = state
        .onboarding
        .login(LoginRequest { email, password })
        .await?;
    session.persist_donor(&snapshot.record.uid)?;
    Ok(web::Json(DonorResponse::from(snapshot)))
}

/// Sign out and clear the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The authenticated donor's record with fresh availability.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current donor", body = DonorResponse),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 404, description = "Record deleted", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DonorResponse>> {
    let uid = session.require_donor_id()?;
    let snapshot = state.donors.profile(&uid).await?;
    Ok(web::Json(DonorResponse::from(snapshot)))
}

/// Record a new donation date for the signed-in donor.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/last-donation-date",
    request_body = DonationDatePayload,
    responses(
        (status = 200, description = "Date recorded and availability refreshed", body = DonorResponse),
        (status = 400, description = "Missing or malformed date", body = crate::domain::Error),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 503, description = "Store write failed, try again", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "updateLastDonationDate"
)]
#[put("/users/me/last-donation-date")]
pub async fn update_donation_date(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonationDatePayload>,
) -> ApiResult<web::Json<DonorResponse>> {
    let uid = session.require_donor_id()?;
    let raw = payload
        .into_inner()
        .date
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_field_error("date"))?;
    let date = parse_date_field("date", &raw)?;
    let snapshot = state.donors.record_donation(&uid, date).await?;
    Ok(web::Json(DonorResponse::from(snapshot)))
}
