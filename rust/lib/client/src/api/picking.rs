//! Picking task endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;

use super::StatusReply;

#[derive(Debug, Clone, Deserialize)]
pub struct PickTask {
    pub id: String,
    pub outbound_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickLine {
    pub id: i64,
    pub product_id: String,
    pub batch_id: Option<String>,
    pub from_location_id: String,
    pub from_location_code: String,
    pub zone_type: String,
    /// ISO date (YYYY-MM-DD), present for expiry-tracked batches.
    pub expiry_date: Option<String>,
    pub qty_to_pick: i64,
    pub qty_picked: i64,
}

/// One confirmed pick movement. `to_location_id` is the packing staging
/// location the goods were dropped at.
#[derive(Debug, Clone, Serialize)]
pub struct PickScan {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub qty: i64,
    pub from_location_id: String,
    pub to_location_id: String,
}

pub async fn tasks(api: &ApiClient) -> Result<Vec<PickTask>, ApiError> {
    api.get("/api/v1/picking/tasks").await
}

pub async fn task_lines(api: &ApiClient, task_id: &str) -> Result<Vec<PickLine>, ApiError> {
    api.get(&format!("/api/v1/picking/tasks/{task_id}/lines"))
        .await
}

pub async fn start_task(api: &ApiClient, task_id: &str) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/picking/tasks/{task_id}/start"))
        .await
}

pub async fn scan(
    api: &ApiClient,
    task_id: &str,
    movement: &PickScan,
) -> Result<StatusReply, ApiError> {
    api.post(&format!("/api/v1/picking/tasks/{task_id}/scan"), movement)
        .await
}

pub async fn complete_task(api: &ApiClient, task_id: &str) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/picking/tasks/{task_id}/complete"))
        .await
}
