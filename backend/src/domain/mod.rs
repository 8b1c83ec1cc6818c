//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities the adapters exchange, the
//! cooldown rule that derives donor availability, and the services that
//! implement the driving ports over the repository ports. Types stay
//! transport agnostic; serde attributes document the store and wire shape.

mod access;
mod alert_service;
pub mod availability;
mod availability_sync;
mod campaign;
mod campaign_service;
mod community;
mod community_service;
mod device_token;
pub mod donor;
mod donor_directory_service;
mod error;
mod notice;
mod notice_service;
mod onboarding_service;
mod overview_service;
pub mod ports;

pub use self::alert_service::AlertCenterService;
pub use self::availability::{Availability, DONATION_COOLDOWN_DAYS, calculate_availability};
pub use self::availability_sync::AvailabilitySynchronizer;
pub use self::campaign::{Campaign, CampaignComment, CampaignDraft};
pub use self::campaign_service::CampaignFeedService;
pub use self::community::{CommunityData, CommunityPartner};
pub use self::community_service::CommunityRosterService;
pub use self::device_token::{DeviceToken, sanitise_token_key};
pub use self::donor::{
    BloodGroup, DonorId, DonorRecord, DonorRole, DonorUpdate, DonorValidationError, NewDonor,
};
pub use self::donor_directory_service::DonorDirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::notice::{Notice, NoticeUpdate};
pub use self::notice_service::NoticeBoardService;
pub use self::onboarding_service::{DonorOnboardingService, MIN_PASSWORD_CHARS};
pub use self::overview_service::RegistryOverviewService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
