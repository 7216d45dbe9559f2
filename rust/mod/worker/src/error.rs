//! Screen-level error type.

use thiserror::Error;
use wlms_client::ApiError;
use wlms_scan::GateError;

/// Anything a screen handler can fail with. Gate and API errors pass
/// through unchanged; the rest is screen-local validation.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no task selected")]
    NoTaskSelected,

    #[error("no line selected")]
    NoLineSelected,

    #[error("destination required")]
    DestinationRequired,
}
