//! Back-office surface: generic resource CRUD plus the typed endpoints
//! that do not fit the catalog (zones, locations, CSV imports, invites,
//! invoicing, audit trail, dashboard).
//!
//! The generic calls translate a singular or plural resource name to its
//! REST path and move untyped JSON, which is what the admin tables edit.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::http::{ApiClient, MultipartForm};

use super::StatusReply;

/// Map a singular/plural resource name to its API path.
fn resource_path(resource: &str) -> Result<&'static str, ApiError> {
    match resource.to_lowercase().as_str() {
        "client" | "clients" => Ok("/api/v1/clients"),
        "warehouse" | "warehouses" => Ok("/api/v1/warehouses"),
        "product" | "products" => Ok("/api/v1/products"),
        "user" | "users" => Ok("/api/v1/users"),
        "inbound" | "inbounds" => Ok("/api/v1/inbound"),
        "outbound" | "outbounds" => Ok("/api/v1/outbound"),
        "invoice" | "invoices" => Ok("/api/v1/invoices"),
        "return" | "returns" => Ok("/api/v1/returns"),
        "discrepancy" | "discrepancies" => Ok("/api/v1/discrepancies"),
        other => Err(ApiError::UnknownResource(other.to_string())),
    }
}

pub async fn list(api: &ApiClient, resource: &str) -> Result<Vec<Value>, ApiError> {
    api.get(resource_path(resource)?).await
}

pub async fn get(api: &ApiClient, resource: &str, id: &str) -> Result<Value, ApiError> {
    api.get(&format!("{}/{id}", resource_path(resource)?)).await
}

pub async fn create(api: &ApiClient, resource: &str, body: &Value) -> Result<Value, ApiError> {
    api.post(resource_path(resource)?, body).await
}

pub async fn update(
    api: &ApiClient,
    resource: &str,
    id: &str,
    body: &Value,
) -> Result<Value, ApiError> {
    api.put(&format!("{}/{id}", resource_path(resource)?), body)
        .await
}

// ── Warehouse layout ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub warehouse_id: String,
    pub name: String,
    pub zone_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneCreate {
    pub name: String,
    /// RECEIVING, STORAGE, PACKING, QUARANTINE...
    pub zone_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: String,
    pub warehouse_id: String,
    pub zone_id: i64,
    pub code: String,
    pub barcode_value: String,
    pub aisle: Option<String>,
    pub rack: Option<String>,
    pub level: Option<String>,
    pub bin: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationCreate {
    pub zone_id: i64,
    pub code: String,
    pub barcode_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aisle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
}

pub async fn zones(api: &ApiClient, warehouse_id: &str) -> Result<Vec<Zone>, ApiError> {
    api.get(&format!("/api/v1/warehouses/{warehouse_id}/zones"))
        .await
}

pub async fn create_zone(
    api: &ApiClient,
    warehouse_id: &str,
    zone: &ZoneCreate,
) -> Result<Zone, ApiError> {
    api.post(&format!("/api/v1/warehouses/{warehouse_id}/zones"), zone)
        .await
}

pub async fn locations(api: &ApiClient, warehouse_id: &str) -> Result<Vec<Location>, ApiError> {
    api.get(&format!("/api/v1/warehouses/{warehouse_id}/locations"))
        .await
}

pub async fn create_location(
    api: &ApiClient,
    warehouse_id: &str,
    location: &LocationCreate,
) -> Result<Location, ApiError> {
    api.post(
        &format!("/api/v1/warehouses/{warehouse_id}/locations"),
        location,
    )
    .await
}

// ── CSV imports ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CsvImportReply {
    pub created: i64,
    pub errors: Vec<CsvRowError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvRowError {
    pub row: i64,
    pub field: String,
    pub message: String,
}

/// Bulk-creates locations in one zone from a CSV file.
pub async fn import_locations_csv(
    api: &ApiClient,
    warehouse_id: &str,
    zone_id: i64,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<CsvImportReply, ApiError> {
    let form = MultipartForm::new().file("file", filename, bytes);
    api.post_multipart(
        &format!("/api/v1/warehouses/{warehouse_id}/locations/import-csv?zone_id={zone_id}"),
        form,
    )
    .await
}

/// Bulk-creates products for one client from a CSV file.
pub async fn import_products_csv(
    api: &ApiClient,
    client_id: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<CsvImportReply, ApiError> {
    let form = MultipartForm::new().file("file", filename, bytes);
    api.post_multipart(
        &format!("/api/v1/products/import-csv?client_id={client_id}"),
        form,
    )
    .await
}

// ── Invites, invoicing, audit, dashboard ────────────────────────────

/// Invites a client-side user by email; they receive a tokenized link.
pub async fn invite_user(
    api: &ApiClient,
    email: &str,
    client_id: &str,
    language: &str,
) -> Result<StatusReply, ApiError> {
    api.post(
        "/api/v1/users/invite",
        &json!({ "email": email, "client_id": client_id, "language": language }),
    )
    .await
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub period_start: String,
    pub period_end: String,
    pub status: String,
    pub currency: String,
    pub subtotal: f64,
    pub tax_total: f64,
    pub total: f64,
    pub pdf_file_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateInvoice {
    pub client_id: String,
    /// ISO date (YYYY-MM-DD), inclusive.
    pub period_start: String,
    /// ISO date (YYYY-MM-DD), inclusive.
    pub period_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

pub async fn invoices(api: &ApiClient) -> Result<Vec<Invoice>, ApiError> {
    api.get("/api/v1/invoices").await
}

pub async fn generate_invoice(
    api: &ApiClient,
    request: &GenerateInvoice,
) -> Result<Invoice, ApiError> {
    api.post("/api/v1/invoices/generate", request).await
}

pub async fn issue_invoice(api: &ApiClient, invoice_id: &str) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/invoices/{invoice_id}/issue"))
        .await
}

pub async fn mark_invoice_paid(
    api: &ApiClient,
    invoice_id: &str,
) -> Result<StatusReply, ApiError> {
    api.post_empty(&format!("/api/v1/invoices/{invoice_id}/mark-paid"))
        .await
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_user_id: Option<String>,
    pub ip_address: Option<String>,
    /// ISO timestamp.
    pub created_at: String,
}

/// Most recent audit entries for the tenant, newest first.
pub async fn audit_logs(api: &ApiClient) -> Result<Vec<AuditLogEntry>, ApiError> {
    api.get("/api/v1/audit/logs").await
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub inbound: i64,
    pub outbound: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopClient {
    pub client_id: String,
    pub name: String,
    pub outbound_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSummary {
    pub date: String,
    pub inbound_today: i64,
    pub outbound_today: i64,
    pub discrepancies_pending: i64,
    pub occupied_positions: i64,
    pub expiring_30: i64,
    pub expiring_60: i64,
    pub expiring_90: i64,
    pub trend_14d: Vec<TrendPoint>,
    pub top_clients: Vec<TopClient>,
}

pub async fn dashboard_summary(api: &ApiClient) -> Result<DashboardSummary, ApiError> {
    api.get("/api/v1/dashboard/summary").await
}
