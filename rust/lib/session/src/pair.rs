use serde::{Deserialize, Serialize};

/// The two credential slots, always handled as one value.
///
/// No expiry metadata is kept. An expired access token is discovered
/// reactively when the server answers 401, at which point the refresh
/// token is exchanged for a whole new pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived bearer token attached to authorized requests.
    pub access_token: String,

    /// Longer-lived secret exchanged for a new pair on refresh.
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}
