//! HTTP client for the WLMS backend API.
//!
//! Wraps [`reqwest`] with bearer authentication, transparent token refresh
//! and typed endpoint wrappers for every backend surface the terminals use.
//! Credentials live in a shared [`wlms_session::Session`] so that several
//! clients (or several screens of one terminal) observe the same pair.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use config::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{ApiClient, MultipartForm, RequestBody};

#[cfg(test)]
mod testing;
