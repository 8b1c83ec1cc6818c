//! Donor listing and administration HTTP handlers.
//!
//! ```text
//! GET    /api/v1/donors
//! GET    /api/v1/admin/donors
//! PATCH  /api/v1/admin/donors/{uid}
//! DELETE /api/v1/admin/donors/{uid}
//! ```

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{AvailabilityFilter, DonorSearch};
use crate::domain::{DonorId, DonorRecord, DonorUpdate, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::DonorResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_blood_group_field;

/// Query parameters for the public donor listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PublicListingQuery {
    /// Narrow the listing to one blood group, e.g. `O+`.
    pub blood_group: Option<String>,
}

/// Query parameters for the administrative donor search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminSearchQuery {
    /// Substring matched against name, area, and phone.
    pub search: Option<String>,
    pub blood_group: Option<String>,
    /// `all`, `available`, or `unavailable`.
    pub status: Option<String>,
}

/// One row of the administrative donor table: the raw stored record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredDonorResponse {
    pub uid: String,
    pub name: String,
    pub blood_group: String,
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub phone: String,
    pub email: String,
    pub last_donation_date: String,
    /// The stored flag, as the store-side filters see it.
    pub is_available: bool,
    pub role: String,
}

impl From<DonorRecord> for StoredDonorResponse {
    fn from(record: DonorRecord) -> Self {
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
            is_available: record.is_available,
            role: match record.role {
                crate::domain::DonorRole::Admin => "admin".to_owned(),
                crate::domain::DonorRole::Donor => "donor".to_owned(),
            },
        }
    }
}

fn parse_uid(raw: &str) -> Result<DonorId, Error> {
    DonorId::new(raw).map_err(|err| Error::invalid_request(format!("invalid donor id: {err}")))
}

/// Public donor listing with availability computed per record.
#[utoipa::path(
    get,
    path = "/api/v1/donors",
    params(PublicListingQuery),
    responses(
        (status = 200, description = "Donors, admins excluded", body = [DonorResponse]),
        (status = 400, description = "Unknown blood group", body = crate::domain::Error)
    ),
    tags = ["donors"],
    security([]),
    operation_id = "listDonors"
)]
#[get("/donors")]
pub async fn list_donors(
    state: web::Data<HttpState>,
    query: web::Query<PublicListingQuery>,
) -> ApiResult<web::Json<Vec<DonorResponse>>> {
    let blood_group = match query.into_inner().blood_group.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_blood_group_field("bloodGroup", raw)?),
    };
    let listing = state.donors.list_public(blood_group).await?;
    Ok(web::Json(
        listing.into_iter().map(DonorResponse::from).collect(),
    ))
}

/// Administrative donor search over the stored records.
#[utoipa::path(
    get,
    path = "/api/v1/admin/donors",
    params(AdminSearchQuery),
    responses(
        (status = 200, description = "Matching records", body = [StoredDonorResponse]),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "searchDonors"
)]
#[get("/admin/donors")]
pub async fn search_donors(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AdminSearchQuery>,
) -> ApiResult<web::Json<Vec<StoredDonorResponse>>> {
    let actor = session.require_donor_id()?;
    let query = query.into_inner();

    let blood_group = match query.blood_group.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_blood_group_field("bloodGroup", raw)?),
    };
    let status = match query.status.as_deref() {
        None => AvailabilityFilter::All,
        Some(raw) => raw
            .parse::<AvailabilityFilter>()
            .map_err(|message| Error::invalid_request(message))?,
    };

    let criteria = DonorSearch {
        term: query.search.filter(|term| !term.trim().is_empty()),
        blood_group,
        status,
    };
    let records = state.donors.search(&actor, criteria).await?;
    Ok(web::Json(
        records.into_iter().map(StoredDonorResponse::from).collect(),
    ))
}

/// Administrative partial edit of one donor record.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/donors/{uid}",
    request_body = DonorUpdate,
    params(("uid" = String, Path, description = "Donor record id")),
    responses(
        (status = 204, description = "Record updated"),
        (status = 400, description = "Empty or malformed edit", body = crate::domain::Error),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "updateDonor"
)]
#[patch("/admin/donors/{uid}")]
pub async fn update_donor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DonorUpdate>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let uid = parse_uid(&path.into_inner())?;
    state
        .donors
        .amend(&actor, &uid, payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Administrative removal of one donor record.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/donors/{uid}",
    params(("uid" = String, Path, description = "Donor record id")),
    responses(
        (status = 204, description = "Record removed"),
        (status = 403, description = "Not an administrator", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "deleteDonor"
)]
#[delete("/admin/donors/{uid}")]
pub async fn delete_donor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_donor_id()?;
    let uid = parse_uid(&path.into_inner())?;
    state.donors.remove(&actor, &uid).await?;
    Ok(HttpResponse::NoContent().finish())
}
