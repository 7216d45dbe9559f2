//! Customer return processing.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;

use super::StatusReply;

/// What happens to a returned unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Restock,
    Quarantine,
    Scrap,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnScan {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub qty: i64,
    pub disposition: Disposition,
    /// Required for restock; quarantine and scrap use fixed areas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_location_id: Option<String>,
}

pub async fn scan_line(
    api: &ApiClient,
    return_id: &str,
    scan: &ReturnScan,
) -> Result<StatusReply, ApiError> {
    api.post(&format!("/api/v1/returns/{return_id}/scan-line"), scan)
        .await
}

pub async fn complete(api: &ApiClient, return_id: &str) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/returns/{return_id}/complete"))
        .await
}
