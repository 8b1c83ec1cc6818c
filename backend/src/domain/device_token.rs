//! Push-subscription device tokens.
//!
//! Tokens arrive from the client messaging SDK and are stored keyed by a
//! sanitised copy of themselves, which keeps registration idempotent per
//! device without a separate lookup.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::donor::FORBIDDEN_KEY_CHARS;

/// One registered device as stored under `fcm_tokens/{sanitised}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceToken {
    /// The raw token handed to the push gateway.
    pub token: String,
    /// Registration instant in epoch milliseconds.
    pub last_updated: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
}

/// Derive the store key for a raw token.
///
/// Store keys cannot contain `.`, `#`, `$`, `[`, `]`, or `/`; each is
/// replaced by an underscore. The raw token is kept in the record body, so
/// the substitution never needs to be reversed.
pub fn sanitise_token_key(token: &str) -> String {
    token
        .chars()
        .map(|c| {
            if FORBIDDEN_KEY_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
