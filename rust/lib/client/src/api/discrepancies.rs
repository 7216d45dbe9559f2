//! Stock discrepancy reporting.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;

/// A counted-vs-system mismatch observed at one location.
#[derive(Debug, Clone, Serialize)]
pub struct DiscrepancyReport {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub location_id: String,
    pub counted_qty: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Discrepancy {
    pub id: String,
    pub tenant_id: i64,
    pub client_id: String,
    pub warehouse_id: String,
    pub product_id: String,
    pub batch_id: Option<String>,
    pub location_id: String,
    pub system_qty: i64,
    pub counted_qty: i64,
    pub delta_qty: i64,
    pub reason: Option<String>,
    pub status: String,
}

/// Files a report; the backend computes the delta against system stock
/// and leaves it pending supervisor review.
pub async fn report(
    api: &ApiClient,
    body: &DiscrepancyReport,
) -> Result<Discrepancy, ApiError> {
    api.post("/api/v1/discrepancies", body).await
}
