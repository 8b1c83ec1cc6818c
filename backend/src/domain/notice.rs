//! Notice-board entries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One published notice as stored under `notices/{id}`.
///
/// The `id` is the store key, not part of the stored value, so it is
/// skipped when the body is written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub message: String,
    /// Publication date, stamped when the notice is created.
    pub date: String,
}

/// Fields of a notice edit; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NoticeUpdate {
    /// Whether the edit carries no changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.message.is_none()
    }
}
