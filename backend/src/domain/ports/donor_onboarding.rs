//! Driving port for registration and login.

use async_trait::async_trait;

use crate::domain::ports::DonorSnapshot;
use crate::domain::{Availability, Error, NewDonor};

/// Registration payload after DTO validation.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub profile: NewDonor,
    pub password: String,
}

/// Credential pair presented at login.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Driving port for account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorOnboarding: Send + Sync {
    /// Create the identity account, store the donor record, and return it.
    async fn register(&self, request: RegisterRequest) -> Result<DonorSnapshot, Error>;

    /// Verify credentials, reconcile the availability flag, and return the
    /// donor record.
    async fn login(&self, request: LoginRequest) -> Result<DonorSnapshot, Error>;
}

/// Fixture onboarding that accepts registrations and rejects logins.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDonorOnboarding;

#[async_trait]
impl DonorOnboarding for FixtureDonorOnboarding {
    async fn register(&self, request: RegisterRequest) -> Result<DonorSnapshot, Error> {
        let record = request.profile.into_record(crate::domain::DonorId::random());
        Ok(DonorSnapshot {
            record,
            availability: Availability::ELIGIBLE,
        })
    }

    async fn login(&self, _request: LoginRequest) -> Result<DonorSnapshot, Error> {
        Err(Error::unauthorized("invalid email or password"))
    }
}
