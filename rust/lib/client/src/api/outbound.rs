//! Packing and dispatch confirmation for outbound orders.

use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::http::ApiClient;

use super::StatusReply;

/// Optional packing details; an empty confirm is a plain "it is packed".
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackingConfirm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carton_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
}

pub async fn confirm_packing(
    api: &ApiClient,
    outbound_id: &str,
    details: &PackingConfirm,
) -> Result<StatusReply, ApiError> {
    api.post(&format!("/api/v1/packing/{outbound_id}/confirm"), details)
        .await
}

/// Marks the order as dispatched out of the given packing location.
pub async fn confirm_dispatch(
    api: &ApiClient,
    outbound_id: &str,
    packing_location_id: &str,
) -> Result<StatusReply, ApiError> {
    api.post(
        &format!("/api/v1/dispatch/{outbound_id}/confirm"),
        &json!({ "packing_location_id": packing_location_id }),
    )
    .await
}
