//! Community partner roster.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One partner organisation shown on the community page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPartner {
    pub name: String,
    pub image_url: String,
}

/// The community document stored under `community`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityData {
    #[serde(default)]
    pub partners: Vec<CommunityPartner>,
}
