//! HTTP seam between request composition and the network.

pub mod reqwest_transport;

use std::future::Future;
use std::time::Duration;

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;

pub use reqwest_transport::ReqwestTransport;

/// Executes composed requests. Token fetches and test traffic both go through it.
pub trait HttpTransport: Clone + Send + Sync + 'static {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, HarnessError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// raw response body
    pub text: String,
    /// parsed body, `Value::Null` when the body is not JSON
    pub body: Value,
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, text: String, elapsed: Duration) -> Self {
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
            elapsed,
        }
    }

    pub fn from_json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            text: body.to_string(),
            body,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HarnessError> {
        serde_json::from_str(&self.text).map_err(|e| HarnessError::Validation {
            message: format!("response body does not match the expected type: {}", e),
            violations: Vec::new(),
        })
    }
}
