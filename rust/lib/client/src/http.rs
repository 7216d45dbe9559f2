//! Request core: bearer attach, one refresh-and-retry on 401, decoding.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use wlms_session::{CredentialPair, Session};

use crate::config::ClientConfig;
use crate::error::{ApiError, extract_message};

/// A request body that can be replayed for the post-refresh retry.
///
/// `reqwest` bodies are consumed on send, so the client keeps its own
/// owned representation and materializes a fresh body per attempt.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Serializes `body` into a replayable JSON payload.
    pub fn json<B: Serialize>(body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Self::Json(value))
    }
}

/// Owned multipart payload (text fields plus in-memory file parts).
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    texts: Vec<(String, String)>,
    files: Vec<FilePart>,
}

#[derive(Debug, Clone)]
struct FilePart {
    name: String,
    filename: String,
    bytes: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.texts.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.into(),
            filename: filename.into(),
            bytes,
        });
        self
    }

    fn to_form(&self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.texts {
            form = form.text(name.clone(), value.clone());
        }
        for part in &self.files {
            form = form.part(
                part.name.clone(),
                reqwest::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.filename.clone()),
            );
        }
        form
    }
}

#[derive(serde::Deserialize)]
struct RefreshReply {
    access_token: String,
    refresh_token: String,
}

/// Authenticated HTTP client over one [`Session`].
///
/// All endpoint wrappers in [`crate::api`] funnel through [`Self::request`],
/// which attaches the bearer token and, on a 401, performs at most one
/// token refresh followed by at most one retry. Concurrent 401s share a
/// single refresh call through `refresh_gate`.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Arc<Session>,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Issues one request, refreshing the token and retrying once if the
    /// first attempt comes back 401. A second 401 is reported as a plain
    /// server rejection; there is no retry loop.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        auth: bool,
    ) -> Result<R, ApiError> {
        let url = self.url_for(path);
        let token = if auth { self.session.access_token() } else { None };

        let response = self
            .send_once(&method, &url, body.as_ref(), token.as_deref())
            .await?;
        if auth && response.status() == StatusCode::UNAUTHORIZED {
            let stale = token.unwrap_or_default();
            let fresh = self.refresh_access_token(&stale).await?;
            debug!(%method, url, "retrying with refreshed token");
            let response = self
                .send_once(&method, &url, body.as_ref(), Some(&fresh))
                .await?;
            return Self::decode(response).await;
        }
        Self::decode(response).await
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::GET, path, None, true).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.request(Method::POST, path, Some(RequestBody::json(body)?), true)
            .await
    }

    /// POST without a body (start/complete style endpoints).
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::POST, path, None, true).await
    }

    /// POST without credentials (login, password recovery).
    pub async fn post_noauth<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.request(Method::POST, path, Some(RequestBody::json(body)?), false)
            .await
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.request(Method::PUT, path, Some(RequestBody::json(body)?), true)
            .await
    }

    pub async fn patch<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.request(Method::PATCH, path, Some(RequestBody::json(body)?), true)
            .await
    }

    /// POST a multipart form. The JSON serialization path and its
    /// `Content-Type` header are bypassed entirely.
    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<R, ApiError> {
        self.request(
            Method::POST,
            path,
            Some(RequestBody::Multipart(form)),
            true,
        )
        .await
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.config.base_url(), path)
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&RequestBody>,
        bearer: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut req = self.http.request(method.clone(), url);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        match body {
            Some(RequestBody::Json(value)) => req = req.json(value),
            Some(RequestBody::Multipart(form)) => req = req.multipart(form.to_form()),
            None => {}
        }
        Ok(req.send().await?)
    }

    /// Exchanges the refresh token for a new pair, single-flight.
    ///
    /// `stale_access` is the token the failing request went out with.
    /// Whoever holds the gate first does the network call; everyone queued
    /// behind it finds the rotated pair on re-read and reuses it, so N
    /// concurrent 401s cost exactly one refresh round-trip.
    async fn refresh_access_token(&self, stale_access: &str) -> Result<String, ApiError> {
        let _flight = self.refresh_gate.lock().await;

        let Some(pair) = self.session.get() else {
            self.session.clear()?;
            return Err(ApiError::Unauthorized);
        };
        if pair.access_token != stale_access {
            return Ok(pair.access_token);
        }

        match self.call_refresh(&pair.refresh_token).await {
            Ok(fresh) => {
                let access = fresh.access_token.clone();
                self.session.set(fresh)?;
                debug!("access token refreshed");
                Ok(access)
            }
            Err(err) => {
                warn!(error = %err, "token refresh rejected, signing out");
                self.session.clear()?;
                Err(ApiError::Unauthorized)
            }
        }
    }

    async fn call_refresh(&self, refresh_token: &str) -> Result<CredentialPair, ApiError> {
        let url = self.url_for("/api/v1/auth/refresh");
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        let reply: RefreshReply = Self::decode(response).await?;
        Ok(CredentialPair::new(reply.access_token, reply.refresh_token))
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let mut message = extract_message(&text);
            if message.is_empty() {
                message = status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string();
            }
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use axum::http::{HeaderMap, StatusCode as Code};
    use axum::routing::{MethodRouter, get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use wlms_session::CredentialPair;

    use super::*;
    use crate::testing::{client_for, session_with, spawn, stale_pair};

    const FRESH_ACCESS: &str = "fresh-access";

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::to_string)
    }

    /// 200 only when the caller presents the post-refresh token.
    async fn guarded_ping(headers: HeaderMap) -> (Code, Json<Value>) {
        if bearer(&headers).as_deref() == Some(FRESH_ACCESS) {
            (Code::OK, Json(json!({"pong": true})))
        } else {
            (Code::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"})))
        }
    }

    fn counting_ping(calls: Arc<AtomicU64>) -> MethodRouter {
        get(move |headers: HeaderMap| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                guarded_ping(headers).await
            }
        })
    }

    /// Refresh endpoint that rotates to a fixed fresh pair. Replies carry
    /// the extra `user` object the real backend includes.
    fn rotating_refresh(
        calls: Arc<AtomicU64>,
        seen: Arc<std::sync::Mutex<Vec<Value>>>,
        saw_bearer: Arc<AtomicBool>,
    ) -> MethodRouter {
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let calls = calls.clone();
            let seen = seen.clone();
            let saw_bearer = saw_bearer.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if bearer(&headers).is_some() {
                    saw_bearer.store(true, Ordering::SeqCst);
                }
                seen.lock().unwrap().push(body);
                // Small delay widens the race window for concurrent callers.
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Json(json!({
                    "access_token": FRESH_ACCESS,
                    "refresh_token": "fresh-refresh",
                    "user": {"id": "u-1", "email": "w@example.com", "role": "WORKER"}
                }))
            }
        })
    }

    fn rejecting_refresh(calls: Arc<AtomicU64>) -> MethodRouter {
        post(move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                (Code::UNAUTHORIZED, Json(json!({"detail": "Invalid refresh token"})))
            }
        })
    }

    #[test]
    fn url_join_and_absolute_passthrough() {
        let client = client_for("http://base:8000", session_with(None));
        assert_eq!(client.url_for("/api/v1/ping"), "http://base:8000/api/v1/ping");
        assert_eq!(client.url_for("https://other/x"), "https://other/x");
    }

    #[tokio::test]
    async fn bearer_token_is_attached() {
        let app = Router::new().route(
            "/api/v1/whoami",
            get(|headers: HeaderMap| async move { Json(json!({"token": bearer(&headers)})) }),
        );
        let base = spawn(app).await;
        let client = client_for(
            &base,
            session_with(Some(CredentialPair::new(FRESH_ACCESS, "r"))),
        );

        let reply: Value = client.get("/api/v1/whoami").await.unwrap();
        assert_eq!(reply["token"], FRESH_ACCESS);
    }

    #[tokio::test]
    async fn noauth_request_sends_no_bearer() {
        let app = Router::new().route(
            "/api/v1/whoami",
            post(|headers: HeaderMap| async move { Json(json!({"token": bearer(&headers)})) }),
        );
        let base = spawn(app).await;
        let client = client_for(
            &base,
            session_with(Some(CredentialPair::new(FRESH_ACCESS, "r"))),
        );

        let reply: Value = client
            .post_noauth("/api/v1/whoami", &json!({}))
            .await
            .unwrap();
        assert_eq!(reply["token"], Value::Null);
    }

    #[tokio::test]
    async fn refresh_then_retry_on_unauthorized() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let refresh_seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let saw_bearer = Arc::new(AtomicBool::new(false));
        let app = Router::new()
            .route("/api/v1/ping", get(guarded_ping))
            .route(
                "/api/v1/auth/refresh",
                rotating_refresh(refresh_calls.clone(), refresh_seen.clone(), saw_bearer.clone()),
            );
        let base = spawn(app).await;
        let session = session_with(Some(stale_pair()));
        let client = client_for(&base, session.clone());

        let reply: Value = client.get("/api/v1/ping").await.unwrap();

        assert_eq!(reply["pong"], true);
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
        // Refresh sends the stored refresh token, unauthenticated.
        assert_eq!(
            refresh_seen.lock().unwrap()[0],
            json!({"refresh_token": "good-refresh"})
        );
        assert!(!saw_bearer.load(Ordering::SeqCst));
        // Both slots rotated.
        assert_eq!(
            session.get(),
            Some(CredentialPair::new(FRESH_ACCESS, "fresh-refresh"))
        );
    }

    #[tokio::test]
    async fn refresh_failure_clears_session() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let app = Router::new()
            .route("/api/v1/ping", get(guarded_ping))
            .route("/api/v1/auth/refresh", rejecting_refresh(refresh_calls.clone()));
        let base = spawn(app).await;
        let session = session_with(Some(stale_pair()));
        let client = client_for(&base, session.clone());

        let err = client.get::<Value>("/api/v1/ping").await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
        assert!(session.get().is_none());
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_refresh_call() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let refresh_seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let saw_bearer = Arc::new(AtomicBool::new(false));
        let app = Router::new()
            .route("/api/v1/ping", get(guarded_ping))
            .route(
                "/api/v1/auth/refresh",
                rotating_refresh(refresh_calls.clone(), refresh_seen, saw_bearer),
            );
        let base = spawn(app).await;
        let client = client_for(&base, session_with(None));

        let err = client.get::<Value>("/api/v1/ping").await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_unauthorized_requests_share_one_refresh() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let refresh_seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let saw_bearer = Arc::new(AtomicBool::new(false));
        let ping_calls = Arc::new(AtomicU64::new(0));
        let app = Router::new()
            .route("/api/v1/ping", counting_ping(ping_calls.clone()))
            .route(
                "/api/v1/auth/refresh",
                rotating_refresh(refresh_calls.clone(), refresh_seen, saw_bearer),
            );
        let base = spawn(app).await;
        let client = client_for(&base, session_with(Some(stale_pair())));

        let (a, b, c, d, e) = tokio::join!(
            client.get::<Value>("/api/v1/ping"),
            client.get::<Value>("/api/v1/ping"),
            client.get::<Value>("/api/v1/ping"),
            client.get::<Value>("/api/v1/ping"),
            client.get::<Value>("/api/v1/ping"),
        );

        for reply in [a, b, c, d, e] {
            assert_eq!(reply.unwrap()["pong"], true);
        }
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
        // Five stale attempts plus five retries, no more.
        assert_eq!(ping_calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn retry_replays_method_and_body() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let refresh_seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let saw_bearer = Arc::new(AtomicBool::new(false));
        let bodies: Arc<std::sync::Mutex<Vec<Value>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = bodies.clone();
        let app = Router::new()
            .route(
                "/api/v1/echo",
                post(move |headers: HeaderMap, Json(body): Json<Value>| {
                    let recorded = recorded.clone();
                    async move {
                        recorded.lock().unwrap().push(body);
                        if bearer(&headers).as_deref() == Some(FRESH_ACCESS) {
                            (Code::OK, Json(json!({"status": "ok"})))
                        } else {
                            (Code::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"})))
                        }
                    }
                }),
            )
            .route(
                "/api/v1/auth/refresh",
                rotating_refresh(refresh_calls.clone(), refresh_seen, saw_bearer),
            );
        let base = spawn(app).await;
        let client = client_for(&base, session_with(Some(stale_pair())));

        let reply: Value = client
            .post("/api/v1/echo", &json!({"qty": 3}))
            .await
            .unwrap();

        assert_eq!(reply["status"], "ok");
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
        let bodies = bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], json!({"qty": 3}));
        assert_eq!(bodies[1], json!({"qty": 3}));
    }

    #[tokio::test]
    async fn second_unauthorized_is_final() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let refresh_seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let saw_bearer = Arc::new(AtomicBool::new(false));
        let ping_calls = Arc::new(AtomicU64::new(0));
        let hits = ping_calls.clone();
        let app = Router::new()
            .route(
                "/api/v1/ping",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        (Code::UNAUTHORIZED, Json(json!({"detail": "Token expired"})))
                    }
                }),
            )
            .route(
                "/api/v1/auth/refresh",
                rotating_refresh(refresh_calls.clone(), refresh_seen, saw_bearer),
            );
        let base = spawn(app).await;
        let client = client_for(&base, session_with(Some(stale_pair())));

        let err = client.get::<Value>("/api/v1/ping").await.unwrap_err();

        // The retried 401 surfaces as a server rejection, not another cycle.
        assert!(matches!(
            err,
            ApiError::RequestFailed { status: 401, .. }
        ));
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ping_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn server_rejection_carries_detail_message() {
        let app = Router::new().route(
            "/api/v1/picking/tasks/t1/scan",
            post(|| async {
                (Code::BAD_REQUEST, Json(json!({"detail": "Over-pick not allowed"})))
            }),
        );
        let base = spawn(app).await;
        let client = client_for(
            &base,
            session_with(Some(CredentialPair::new(FRESH_ACCESS, "r"))),
        );

        let err = client
            .post::<_, Value>("/api/v1/picking/tasks/t1/scan", &json!({"qty": 99}))
            .await
            .unwrap_err();

        match err {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Over-pick not allowed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn multipart_upload_bypasses_json_content_type() {
        let app = Router::new().route(
            "/api/v1/upload",
            post(
                |headers: HeaderMap, mut multipart: axum::extract::Multipart| async move {
                    let content_type = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let mut names = Vec::new();
                    let mut file_len = 0;
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        if name == "file" {
                            file_len = field.bytes().await.unwrap().len();
                        }
                        names.push(name);
                    }
                    Json(json!({
                        "token": bearer(&headers),
                        "content_type": content_type,
                        "names": names,
                        "file_len": file_len,
                    }))
                },
            ),
        );
        let base = spawn(app).await;
        let client = client_for(
            &base,
            session_with(Some(CredentialPair::new(FRESH_ACCESS, "r"))),
        );

        let form = MultipartForm::new()
            .text("kind", "products")
            .file("file", "products.csv", b"sku,name\n".to_vec());
        let reply: Value = client.post_multipart("/api/v1/upload", form).await.unwrap();

        assert_eq!(reply["token"], FRESH_ACCESS);
        assert!(
            reply["content_type"]
                .as_str()
                .unwrap()
                .starts_with("multipart/form-data")
        );
        assert_eq!(reply["names"], json!(["kind", "file"]));
        assert_eq!(reply["file_len"], 9);
    }

    #[tokio::test]
    async fn multipart_survives_refresh_retry() {
        let refresh_calls = Arc::new(AtomicU64::new(0));
        let refresh_seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let saw_bearer = Arc::new(AtomicBool::new(false));
        let app = Router::new()
            .route(
                "/api/v1/upload",
                post(
                    |headers: HeaderMap, mut multipart: axum::extract::Multipart| async move {
                        if bearer(&headers).as_deref() != Some(FRESH_ACCESS) {
                            return (
                                Code::UNAUTHORIZED,
                                Json(json!({"detail": "Not authenticated"})),
                            );
                        }
                        let mut file_len = 0;
                        while let Some(field) = multipart.next_field().await.unwrap() {
                            if field.name() == Some("file") {
                                file_len = field.bytes().await.unwrap().len();
                            }
                        }
                        (Code::OK, Json(json!({"file_len": file_len})))
                    },
                ),
            )
            .route(
                "/api/v1/auth/refresh",
                rotating_refresh(refresh_calls.clone(), refresh_seen, saw_bearer),
            );
        let base = spawn(app).await;
        let client = client_for(&base, session_with(Some(stale_pair())));

        let form = MultipartForm::new().file("file", "locations.csv", b"code,zone\nA1,BULK\n".to_vec());
        let reply: Value = client.post_multipart("/api/v1/upload", form).await.unwrap();

        // The rebuilt form carried the same bytes on the retry.
        assert_eq!(reply["file_len"], 18);
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absolute_url_skips_base_join() {
        let app = Router::new().route("/direct", get(|| async { Json(json!({"ok": true})) }));
        let live = spawn(app).await;
        // Base points nowhere; only the absolute URL can succeed.
        let client = client_for(
            "http://127.0.0.1:9",
            session_with(Some(CredentialPair::new(FRESH_ACCESS, "r"))),
        );

        let reply: Value = client.get(&format!("{live}/direct")).await.unwrap();
        assert_eq!(reply["ok"], true);
    }
}
