//! In-process identity provider stand-in.
//!
//! Keeps accounts in memory with salted credential digests. Real
//! deployments authenticate against the hosted identity service; this
//! adapter exists for local runs and tests, which is also why it enforces
//! the same observable rules (duplicate emails, minimum password length).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::DonorId;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};

/// Shortest password the provider accepts.
const MIN_PASSWORD_CHARS: usize = 6;

struct Account {
    uid: DonorId,
    salt: String,
    digest: String,
}

/// In-memory [`IdentityProvider`] implementation.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryIdentityProvider {
    /// Create a provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Account>> {
        self.accounts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Account>> {
        self.accounts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<DonorId, IdentityProviderError> {
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(IdentityProviderError::weak_password(format!(
                "at least {MIN_PASSWORD_CHARS} characters required"
            )));
        }

        let key = normalise_email(email);
        let mut accounts = self.lock_write();
        if accounts.contains_key(&key) {
            return Err(IdentityProviderError::EmailAlreadyInUse);
        }

        let uid = DonorId::random();
        let salt = Uuid::new_v4().simple().to_string();
        let account = Account {
            uid: uid.clone(),
            digest: digest(&salt, password),
            salt,
        };
        accounts.insert(key, account);
        Ok(uid)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<DonorId, IdentityProviderError> {
        let key = normalise_email(email);
        let accounts = self.lock_read();
        let account = accounts
            .get(&key)
            .ok_or(IdentityProviderError::InvalidCredentials)?;
        if digest(&account.salt, password) != account.digest {
            return Err(IdentityProviderError::InvalidCredentials);
        }
        Ok(account.uid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_accounts_verify_with_the_right_password() {
        let provider = InMemoryIdentityProvider::new();
        let uid = provider
            .create_account("Rahim@Example.org", "secret123")
            .await
            .expect("account created");

        let verified = provider
            .verify_credentials("rahim@example.org", "secret123")
            .await
            .expect("credentials verify");
        assert_eq!(verified, uid);
    }

    #[tokio::test]
    async fn wrong_passwords_are_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider
            .create_account("rahim@example.org", "secret123")
            .await
            .expect("account created");

        let err = provider
            .verify_credentials("rahim@example.org", "wrong-pass")
            .await
            .expect_err("rejected");
        assert_eq!(err, IdentityProviderError::InvalidCredentials);
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider
            .create_account("rahim@example.org", "secret123")
            .await
            .expect("account created");

        let err = provider
            .create_account("RAHIM@example.org", "other-secret")
            .await
            .expect_err("duplicate");
        assert_eq!(err, IdentityProviderError::EmailAlreadyInUse);
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let provider = InMemoryIdentityProvider::new();
        let err = provider
            .create_account("rahim@example.org", "short")
            .await
            .expect_err("weak password");
        assert!(matches!(err, IdentityProviderError::WeakPassword { .. }));
    }
}
