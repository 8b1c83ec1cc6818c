//! Driving port for device registration and emergency broadcasts.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::AlertMessage;
use crate::domain::{DonorId, Error};

/// A device registration presented by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistration {
    pub token: String,
    pub device_info: Option<String>,
}

/// Outcome of one emergency broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastSummary {
    /// Devices the gateway accepted the message for.
    pub delivered: usize,
    /// Stale registrations dropped after the gateway rejected them.
    pub pruned: usize,
}

/// Driving port for alert subscriptions and broadcasts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertCenter: Send + Sync {
    /// Register or refresh a device token.
    async fn register_device(&self, registration: DeviceRegistration) -> Result<(), Error>;

    /// Push an emergency alert to every registered device.
    /// Administrators only.
    async fn broadcast(
        &self,
        actor: &DonorId,
        message: AlertMessage,
    ) -> Result<BroadcastSummary, Error>;
}

/// Fixture centre with no registered devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAlertCenter;

#[async_trait]
impl AlertCenter for FixtureAlertCenter {
    async fn register_device(&self, _registration: DeviceRegistration) -> Result<(), Error> {
        Ok(())
    }

    async fn broadcast(
        &self,
        _actor: &DonorId,
        _message: AlertMessage,
    ) -> Result<BroadcastSummary, Error> {
        Ok(BroadcastSummary::default())
    }
}
