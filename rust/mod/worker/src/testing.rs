//! Helpers for tests that stand up an in-process backend double.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use wlms_client::{ApiClient, ClientConfig};
use wlms_session::{CredentialPair, MemoryTokenStore, Session};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An authenticated client talking to `router`.
pub(crate) async fn client(router: Router) -> ApiClient {
    let base = spawn(router).await;
    let store = MemoryTokenStore::with_pair(CredentialPair::new("worker-access", "worker-refresh"));
    let session = Arc::new(Session::open(Arc::new(store)).unwrap());
    ApiClient::new(ClientConfig::new(&base), session)
}
