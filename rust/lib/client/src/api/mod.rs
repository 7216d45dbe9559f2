//! Typed wrappers for the backend surface, one module per area.
//!
//! Every function takes the shared [`crate::ApiClient`] and speaks the
//! backend's wire shapes verbatim (snake_case JSON, integer quantities,
//! UUIDs as strings). Mutations acknowledge with [`StatusReply`].

pub mod admin;
pub mod auth;
pub mod discrepancies;
pub mod outbound;
pub mod picking;
pub mod putaway;
pub mod receiving;
pub mod returns;

use serde::Deserialize;

/// Standard `{"status": "ok"}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub status: String,
}

impl StatusReply {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
