//! Sign-in, sign-out, recovery flows and the current user's profile.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use wlms_session::CredentialPair;

use crate::error::ApiError;
use crate::http::ApiClient;

use super::StatusReply;

/// The signed-in user as the backend reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub tenant_id: i64,
    pub client_id: Option<String>,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub language_pref: String,
    pub is_active: bool,
}

#[derive(Deserialize)]
struct LoginReply {
    access_token: String,
    refresh_token: String,
    user: UserProfile,
}

/// Profile fields the user may change about themselves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_pref: Option<String>,
}

/// Signs in with a username or email and stores the issued pair in the
/// client's session.
pub async fn login(
    api: &ApiClient,
    username: &str,
    password: &str,
) -> Result<UserProfile, ApiError> {
    let reply: LoginReply = api
        .post_noauth(
            "/api/v1/auth/login",
            &json!({ "username": username, "password": password }),
        )
        .await?;
    api.session().set(CredentialPair::new(
        reply.access_token,
        reply.refresh_token,
    ))?;
    Ok(reply.user)
}

/// Signs out. The server call is best-effort; local credentials are
/// dropped no matter what it answers.
pub async fn logout(api: &ApiClient) -> Result<(), ApiError> {
    if let Err(err) = api.post_empty::<StatusReply>("/api/v1/auth/logout").await {
        debug!(error = %err, "server-side logout failed, clearing locally anyway");
    }
    api.session().clear()?;
    Ok(())
}

/// Requests a password-reset email. The backend answers ok regardless of
/// whether the address exists.
pub async fn forgot_password(api: &ApiClient, email: &str) -> Result<StatusReply, ApiError> {
    api.post_noauth("/api/v1/auth/forgot-password", &json!({ "email": email }))
        .await
}

/// Redeems a reset token for a new password.
pub async fn reset_password(
    api: &ApiClient,
    token: &str,
    new_password: &str,
) -> Result<StatusReply, ApiError> {
    api.post_noauth(
        "/api/v1/auth/reset-password",
        &json!({ "token": token, "new_password": new_password }),
    )
    .await
}

/// Checks supervisor or admin credentials without touching the current
/// session. Wrong credentials come back as a 401 server rejection (not
/// [`ApiError::Unauthorized`], since no stored token was involved), and
/// a non-supervisor account as a 403.
pub async fn verify_supervisor(
    api: &ApiClient,
    email: &str,
    password: &str,
) -> Result<StatusReply, ApiError> {
    api.post_noauth(
        "/api/v1/auth/verify-supervisor",
        &json!({ "email": email, "password": password }),
    )
    .await
}

/// Redeems an invite token and sets the account password. The new user
/// signs in normally afterwards; no pair is issued here.
pub async fn accept_invite(
    api: &ApiClient,
    token: &str,
    password: &str,
    full_name: &str,
    language_pref: &str,
) -> Result<StatusReply, ApiError> {
    api.post_noauth(
        "/api/v1/users/invite/accept",
        &json!({
            "token": token,
            "password": password,
            "full_name": full_name,
            "language_pref": language_pref,
        }),
    )
    .await
}

/// Fetches the signed-in user's profile.
pub async fn me(api: &ApiClient) -> Result<UserProfile, ApiError> {
    api.get("/api/v1/users/me").await
}

/// Updates the signed-in user's own profile fields.
pub async fn update_me(api: &ApiClient, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
    api.patch("/api/v1/users/me", update).await
}
