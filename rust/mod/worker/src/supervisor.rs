//! Supervisor override: credential check plus attempt bookkeeping.

use tracing::warn;
use wlms_client::api::auth;
use wlms_client::{ApiClient, ApiError};
use wlms_scan::{GateError, LineGate, OverrideAttempts};

use crate::error::WorkerError;

/// Verifies supervisor credentials and, on success, grants the gate and
/// corrects its observed fields.
///
/// Credential rejections (401/403) count as failed attempts under the
/// screen's override policy; transport and other failures do not, so a
/// flaky network cannot lock a worker out.
pub(crate) async fn verify(
    api: &ApiClient,
    attempts: &mut OverrideAttempts,
    gate: &mut LineGate,
    email: &str,
    password: &str,
) -> Result<(), WorkerError> {
    attempts.check()?;
    match auth::verify_supervisor(api, email, password).await {
        Ok(_) => {
            attempts.record_success();
            gate.grant_override();
            Ok(())
        }
        Err(ApiError::RequestFailed { status, .. }) if status == 401 || status == 403 => {
            attempts.record_failure();
            warn!(status, failures = attempts.failures(), "supervisor override denied");
            Err(GateError::OverrideDenied.into())
        }
        Err(err) => Err(err.into()),
    }
}
