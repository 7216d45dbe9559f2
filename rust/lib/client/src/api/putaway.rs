//! Putaway endpoints.
//!
//! Putaway tasks are synthesized from receiving-area stock, so they carry
//! no id of their own; confirming identifies the movement by its fields.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;

use super::StatusReply;

#[derive(Debug, Clone, Deserialize)]
pub struct PutawayTask {
    pub client_id: String,
    pub warehouse_id: String,
    pub product_id: String,
    pub batch_id: Option<String>,
    pub from_location_id: String,
    pub on_hand_qty: i64,
    pub suggested_to_location_id: Option<String>,
    pub suggested_to_location_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PutawayConfirm {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub qty: i64,
    pub from_location_id: String,
    pub to_location_id: String,
}

pub async fn tasks(api: &ApiClient) -> Result<Vec<PutawayTask>, ApiError> {
    api.get("/api/v1/putaway/tasks").await
}

pub async fn confirm(
    api: &ApiClient,
    movement: &PutawayConfirm,
) -> Result<StatusReply, ApiError> {
    api.post("/api/v1/putaway/confirm", movement).await
}
