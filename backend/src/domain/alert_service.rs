//! Device registration and emergency broadcasts.
//!
//! Message transport is external; this service only manages the token
//! registry and the fan-out bookkeeping. Broadcasts prune registrations
//! the gateway reports as dead so the registry does not accrete garbage.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::access::require_admin;
use crate::domain::ports::{
    AlertCenter, AlertMessage, BroadcastSummary, DeviceRegistration, DeviceTokenRepository,
    DeviceTokenRepositoryError, DonorRepository, PushGateway, PushGatewayError,
};
use crate::domain::{DeviceToken, DonorId, Error};

fn map_token_repo_error(error: DeviceTokenRepositoryError) -> Error {
    match error {
        DeviceTokenRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("token store unavailable: {message}"))
        }
        DeviceTokenRepositoryError::Query { message } => {
            Error::internal(format!("token store error: {message}"))
        }
    }
}

fn map_gateway_error(error: PushGatewayError) -> Error {
    match error {
        PushGatewayError::Unavailable { message } => {
            Error::service_unavailable(format!("push gateway unavailable: {message}"))
        }
        PushGatewayError::Rejected { message } => {
            Error::internal(format!("push gateway rejected the broadcast: {message}"))
        }
    }
}

/// Alert centre service implementing the driving port.
#[derive(Clone)]
pub struct AlertCenterService<D, T, G> {
    donors: Arc<D>,
    tokens: Arc<T>,
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<D, T, G> AlertCenterService<D, T, G> {
    /// Create the service over its collaborators.
    pub fn new(donors: Arc<D>, tokens: Arc<T>, gateway: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            donors,
            tokens,
            gateway,
            clock,
        }
    }
}

#[async_trait]
impl<D, T, G> AlertCenter for AlertCenterService<D, T, G>
where
    D: DonorRepository,
    T: DeviceTokenRepository,
    G: PushGateway,
{
    async fn register_device(&self, registration: DeviceRegistration) -> Result<(), Error> {
        if registration.token.trim().is_empty() {
            return Err(Error::invalid_request("device token must not be empty"));
        }
        let token = DeviceToken {
            token: registration.token,
            last_updated: self.clock.utc().timestamp_millis(),
            device_info: registration.device_info,
        };
        self.tokens.save(&token).await.map_err(map_token_repo_error)
    }

    async fn broadcast(
        &self,
        actor: &DonorId,
        message: AlertMessage,
    ) -> Result<BroadcastSummary, Error> {
        require_admin(self.donors.as_ref(), actor).await?;
        if message.title.trim().is_empty() {
            return Err(Error::invalid_request("alert title must not be empty"));
        }

        let registered = self.tokens.list().await.map_err(map_token_repo_error)?;
        if registered.is_empty() {
            info!("no devices subscribed, broadcast skipped");
            return Ok(BroadcastSummary::default());
        }

        let raw_tokens: Vec<String> = registered
            .into_iter()
            .map(|device| device.token)
            .collect();
        let report = self
            .gateway
            .send_to_tokens(&message, &raw_tokens)
            .await
            .map_err(map_gateway_error)?;

        // Registrations the gateway no longer recognises are dropped best
        // effort; a failed removal just means one more attempt next time.
        let mut pruned = 0;
        for dead in &report.invalid_tokens {
            match self.tokens.remove(dead).await {
                Ok(()) => pruned += 1,
                Err(remove_error) => {
                    warn!(error = %remove_error, "failed to prune dead device token");
                }
            }
        }

        info!(
            delivered = report.success_count,
            pruned, "emergency broadcast completed"
        );
        Ok(BroadcastSummary {
            delivered: report.success_count,
            pruned,
        })
    }
}
