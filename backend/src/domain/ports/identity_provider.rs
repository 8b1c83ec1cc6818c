//! Port for the external identity provider.
//!
//! Account credentials never touch the record store; the provider owns
//! them and hands back an opaque stable id that doubles as the donor
//! record key.

use async_trait::async_trait;

use crate::domain::DonorId;

/// Errors raised by identity provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    /// An account already exists for the email address.
    #[error("email already in use")]
    EmailAlreadyInUse,
    /// The password does not meet the provider's strength rules.
    #[error("password too weak: {message}")]
    WeakPassword { message: String },
    /// The email/password pair did not match an account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The provider could not be reached or is misconfigured.
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },
}

impl IdentityProviderError {
    pub fn weak_password(message: impl Into<String>) -> Self {
        Self::WeakPassword {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port for account creation and credential verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its opaque stable id.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<DonorId, IdentityProviderError>;

    /// Verify a credential pair and return the account id.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<DonorId, IdentityProviderError>;
}

/// Fixture provider that accepts everything and mints fresh ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn create_account(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<DonorId, IdentityProviderError> {
        Ok(DonorId::random())
    }

    async fn verify_credentials(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<DonorId, IdentityProviderError> {
        Ok(DonorId::random())
    }
}
