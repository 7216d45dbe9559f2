//! Helpers for tests that stand up an in-process backend double.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use wlms_session::{CredentialPair, MemoryTokenStore, Session};

use crate::config::ClientConfig;
use crate::http::ApiClient;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub(crate) fn session_with(pair: Option<CredentialPair>) -> Arc<Session> {
    let store = match pair {
        Some(pair) => MemoryTokenStore::with_pair(pair),
        None => MemoryTokenStore::new(),
    };
    Arc::new(Session::open(Arc::new(store)).unwrap())
}

pub(crate) fn client_for(base: &str, session: Arc<Session>) -> ApiClient {
    ApiClient::new(ClientConfig::new(base), session)
}

/// A pair the backend doubles treat as expired.
pub(crate) fn stale_pair() -> CredentialPair {
    CredentialPair::new("stale-access", "good-refresh")
}
