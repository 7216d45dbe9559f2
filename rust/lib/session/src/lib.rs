//! Credential storage for the WLMS client.
//!
//! Holds the access/refresh token pair behind a [`TokenStore`] seam and
//! exposes it through an injectable [`Session`]. The two slots always
//! move together: a pair is saved whole, cleared whole, never half-set.

pub mod error;
pub mod file;
pub mod pair;
pub mod session;
pub mod store;

pub use error::SessionError;
pub use file::FileTokenStore;
pub use pair::CredentialPair;
pub use session::Session;
pub use store::{MemoryTokenStore, TokenStore};
