//! Campaign posts with likes and comments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DonorId;

/// One reader comment under a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignComment {
    pub user_name: String,
    pub text: String,
    /// Posting instant in epoch milliseconds.
    pub timestamp: i64,
}

/// One campaign post as stored under `campaigns/{id}`.
///
/// Likes are keyed by donor id so a donor can like a post at most once;
/// comments are keyed by their push id, which sorts chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Creation instant in RFC 3339.
    pub date: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub likes: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub comments: BTreeMap<String, CampaignComment>,
}

impl Campaign {
    /// Number of distinct likers.
    pub fn like_count(&self) -> usize {
        self.likes.values().filter(|liked| **liked).count()
    }

    /// Whether the given donor currently likes this campaign.
    pub fn liked_by(&self, uid: &DonorId) -> bool {
        self.likes.get(uid.as_ref()).copied().unwrap_or(false)
    }

    /// Comments in posting order.
    pub fn comments_in_order(&self) -> Vec<&CampaignComment> {
        self.comments.values().collect()
    }
}

/// Payload for creating or fully editing a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
}
