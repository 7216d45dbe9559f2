//! Scan verification gate.
//!
//! Compares scanned identifiers against expected system values and
//! blocks stock-movement submits on mismatch until a supervisor
//! override is granted. Pure data and transition functions; callers
//! do the network I/O and feed the results back in.

pub mod compare;
pub mod error;
pub mod gate;
pub mod policy;

pub use compare::{ScanOutcome, compare};
pub use error::GateError;
pub use gate::{GatePhase, LineGate};
pub use policy::{OverrideAttempts, OverridePolicy};
