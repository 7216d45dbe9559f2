use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    /// Observed value differs from the expected one; submission is
    /// blocked and the override flow should be offered.
    #[error("scan mismatch: {field}")]
    ScanMismatch { field: String },

    /// Supervisor credential check failed. Retryable.
    #[error("override denied")]
    OverrideDenied,

    /// Too many failed override attempts under a bounding policy.
    #[error("override locked, wait for cooldown")]
    OverrideLocked,
}
