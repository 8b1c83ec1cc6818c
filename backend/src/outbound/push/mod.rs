//! Push gateway adapters.
//!
//! Transport belongs to the hosted messaging platform and runs outside
//! this process. The logging adapter stands in wherever no real gateway
//! is wired up: broadcasts succeed, nothing leaves the machine, and the
//! log keeps an audit trail of what would have been sent.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AlertMessage, DeliveryReport, PushGateway, PushGatewayError};

/// Gateway that logs instead of sending.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPushGateway;

#[async_trait]
impl PushGateway for LoggingPushGateway {
    async fn send_to_tokens(
        &self,
        message: &AlertMessage,
        tokens: &[String],
    ) -> Result<DeliveryReport, PushGatewayError> {
        info!(
            title = %message.title,
            recipients = tokens.len(),
            "push broadcast (logging gateway, nothing sent)"
        );
        Ok(DeliveryReport {
            success_count: tokens.len(),
            invalid_tokens: Vec::new(),
        })
    }
}
