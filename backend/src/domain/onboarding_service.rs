//! Registration and login services.
//!
//! Account credentials live with the external identity provider; the
//! donor profile lives in the record store under the provider-issued id.
//! Both flows end by reconciling the availability flag so a session never
//! starts from a stale record.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::error;

use crate::domain::access::map_donor_repo_error;
use crate::domain::ports::{
    DonorOnboarding, DonorRepository, DonorSnapshot, IdentityProvider, IdentityProviderError,
    LoginRequest, RegisterRequest,
};
use crate::domain::{AvailabilitySynchronizer, Error};

/// Shortest password the registry accepts.
pub const MIN_PASSWORD_CHARS: usize = 6;

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::EmailAlreadyInUse => Error::conflict("email already in use")
            .with_details(json!({ "field": "email", "code": "email_in_use" })),
        IdentityProviderError::WeakPassword { message } => {
            Error::invalid_request(format!("password rejected: {message}"))
                .with_details(json!({ "field": "password", "code": "weak_password" }))
        }
        IdentityProviderError::InvalidCredentials => {
            Error::unauthorized("invalid email or password")
        }
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}

/// Onboarding service implementing the driving port.
#[derive(Clone)]
pub struct DonorOnboardingService<D, I> {
    donors: Arc<D>,
    identity: Arc<I>,
    synchronizer: AvailabilitySynchronizer<D>,
}

impl<D, I> DonorOnboardingService<D, I> {
    /// Create the service over its collaborators.
    pub fn new(donors: Arc<D>, identity: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        let synchronizer = AvailabilitySynchronizer::new(Arc::clone(&donors), clock);
        Self {
            donors,
            identity,
            synchronizer,
        }
    }
}

#[async_trait]
impl<D, I> DonorOnboarding for DonorOnboardingService<D, I>
where
    D: DonorRepository,
    I: IdentityProvider,
{
    async fn register(&self, request: RegisterRequest) -> Result<DonorSnapshot, Error> {
        if request.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(Error::invalid_request(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ))
            .with_details(json!({ "field": "password", "code": "weak_password" })));
        }

        let uid = self
            .identity
            .create_account(&request.profile.email, &request.password)
            .await
            .map_err(map_identity_error)?;

        let mut record = request.profile.into_record(uid);
        if let Err(create_error) = self.donors.create(&record).await {
            // The identity account now exists without a profile. There is
            // no rollback against the provider; the next registration
            // attempt with this email surfaces the conflict.
            error!(
                uid = %record.uid,
                error = %create_error,
                "donor record write failed after account creation"
            );
            return Err(map_donor_repo_error(create_error));
        }

        let availability = self.synchronizer.synchronize(&record).await;
        record.is_available = availability.is_available;
        Ok(DonorSnapshot {
            record,
            availability,
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<DonorSnapshot, Error> {
        let uid = self
            .identity
            .verify_credentials(&request.email, &request.password)
            .await
            .map_err(map_identity_error)?;

        let mut record = self
            .donors
            .find(&uid)
            .await
            .map_err(map_donor_repo_error)?
            .ok_or_else(|| Error::unauthorized("no donor profile for this account"))?;

        let availability = self.synchronizer.synchronize(&record).await;
        record.is_available = availability.is_available;
        Ok(DonorSnapshot {
            record,
            availability,
        })
    }
}

#[cfg(test)]
#[path = "onboarding_service_tests.rs"]
mod tests;
