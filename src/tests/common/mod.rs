// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde_json::Value;

use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;
use crate::transport::{ApiResponse, HttpTransport};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

type Handler = dyn Fn(&ApiRequest, usize) -> Result<ApiResponse, HarnessError> + Send + Sync;

/// In-memory transport: records every request and answers through `handler`,
/// which also receives the zero-based call index.
#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest, usize) -> Result<ApiResponse, HarnessError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Token endpoint issuing `tok-1`, `tok-2`, ... with `extra` merged into each body.
    pub fn issuing(field: &'static str, extra: Value) -> Self {
        Self::new(move |_, n| {
            let mut body = extra.clone();
            body[field] = json!(format!("tok-{}", n + 1));
            Ok(ApiResponse::from_json(StatusCode::OK, body))
        })
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len() - 1
        };
        (self.handler)(request, index)
    }
}
