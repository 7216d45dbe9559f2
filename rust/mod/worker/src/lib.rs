//! Worker terminal screens.
//!
//! Each screen is a plain state struct with async handlers that mutate it
//! in place: a busy flag wraps every network call and failures land in the
//! screen's `error` field. A scan gate guards each stock movement. The
//! embedding UI reads the state after a handler returns.

pub mod error;
pub mod pick;
pub mod putaway;

mod supervisor;

pub use error::WorkerError;
pub use pick::PickScreen;
pub use putaway::PutawayScreen;

/// Gate field names shared by the scan screens.
pub const FIELD_PRODUCT: &str = "product";
pub const FIELD_FROM_LOCATION: &str = "from_location";

#[cfg(test)]
mod testing;
