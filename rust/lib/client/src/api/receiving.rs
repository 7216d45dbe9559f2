//! Inbound receiving endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;

use super::StatusReply;

#[derive(Debug, Clone, Deserialize)]
pub struct InboundOrder {
    pub id: String,
    pub tenant_id: i64,
    pub client_id: String,
    pub warehouse_id: String,
    pub reference_number: String,
    pub status: String,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

/// One scanned carton against an inbound order. The barcode resolves to
/// a product server-side; `location_staging_id` is where it was dropped.
#[derive(Debug, Clone, Serialize)]
pub struct InboundScan {
    pub barcode: String,
    pub qty: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    /// ISO date (YYYY-MM-DD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub location_staging_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundLine {
    pub id: i64,
    pub inbound_id: String,
    pub product_id: String,
    pub expected_qty: Option<i64>,
    pub received_qty: i64,
    pub batch_id: Option<String>,
    pub notes: Option<String>,
}

pub async fn orders(api: &ApiClient) -> Result<Vec<InboundOrder>, ApiError> {
    api.get("/api/v1/inbound").await
}

pub async fn start_receiving(api: &ApiClient, inbound_id: &str) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/inbound/{inbound_id}/start-receiving"))
        .await
}

/// Records one received carton and returns the updated line.
pub async fn scan_line(
    api: &ApiClient,
    inbound_id: &str,
    scan: &InboundScan,
) -> Result<InboundLine, ApiError> {
    api.post(&format!("/api/v1/inbound/{inbound_id}/scan-line"), scan)
        .await
}

pub async fn complete(api: &ApiClient, inbound_id: &str) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/inbound/{inbound_id}/complete"))
        .await
}
