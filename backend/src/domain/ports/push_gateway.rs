//! Port for the external push-message gateway.
//!
//! Message transport is owned by the hosted platform; this port only hands
//! over a batch of registration tokens and reads back which of them the
//! gateway no longer recognises.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

/// Notification content pushed to subscribed devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertMessage {
    pub title: String,
    pub body: String,
}

/// Outcome of one multicast send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of tokens the gateway accepted.
    pub success_count: usize,
    /// Tokens the gateway rejected as no longer valid; callers should
    /// drop their registrations.
    pub invalid_tokens: Vec<String>,
}

/// Errors raised by push gateway adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushGatewayError {
    #[error("push gateway unreachable: {message}")]
    Unavailable { message: String },
    #[error("push gateway rejected the request: {message}")]
    Rejected { message: String },
}

impl PushGatewayError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Port for multicast push delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver `message` to every token in `tokens`.
    async fn send_to_tokens(
        &self,
        message: &AlertMessage,
        tokens: &[String],
    ) -> Result<DeliveryReport, PushGatewayError>;
}

/// Fixture gateway that reports every token as delivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePushGateway;

#[async_trait]
impl PushGateway for FixturePushGateway {
    async fn send_to_tokens(
        &self,
        _message: &AlertMessage,
        tokens: &[String],
    ) -> Result<DeliveryReport, PushGatewayError> {
        Ok(DeliveryReport {
            success_count: tokens.len(),
            invalid_tokens: Vec::new(),
        })
    }
}
