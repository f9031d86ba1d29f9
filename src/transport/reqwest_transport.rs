use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client};
use tracing::{debug, warn};

use crate::config::settings::HarnessConfig;
use crate::errors::HarnessError;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::request::api_request::ApiRequest;
use crate::resilience::retry::RetrySettings;
use crate::transport::{ApiResponse, HttpTransport};

/// reqwest-backed transport honoring the configured timeout, retries and SSL root.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
    retry: RetrySettings,
}

impl ReqwestTransport {
    pub fn from_config(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let mut builder = Client::builder().timeout(timeout);

        if config.ssl.enabled && !config.ssl.cert_path.trim().is_empty() {
            let path = Path::new(&config.ssl.cert_path);
            if path.exists() {
                let pem = std::fs::read(path).map_err(|e| {
                    HarnessError::configuration(format!("cannot read {}: {}", path.display(), e))
                })?;
                let cert = Certificate::from_pem(&pem).map_err(|e| {
                    HarnessError::configuration(format!("invalid certificate {}: {}", path.display(), e))
                })?;
                builder = builder.add_root_certificate(cert);
                debug!("ssl root certificate loaded from {}", path.display());
            } else {
                warn!("ssl certificate not found at {}; using system roots", path.display());
            }
        }

        let client = builder
            .build()
            .map_err(|e| HarnessError::configuration(format!("cannot build http client: {}", e)))?;
        Ok(Self::with_client(client, timeout, RetrySettings::from_config(config)))
    }

    pub fn with_client(client: Client, timeout: Duration, retry: RetrySettings) -> Self {
        Self {
            client,
            timeout,
            retry,
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let started = get_instant();
        let mut builder = self
            .client
            .request(request.method.clone(), request.url())
            .headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(ApiResponse::new(status, headers, text, started.elapsed()))
    }

    fn map_error(&self, e: reqwest::Error) -> HarnessError {
        if e.is_timeout() {
            HarnessError::Timeout(self.timeout)
        } else if e.is_builder() {
            HarnessError::InvalidRequest(e.to_string())
        } else {
            HarnessError::Transport(e.to_string())
        }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let metrics = get_metrics().await;
        let method = request.method.as_str();
        let started = get_instant();
        debug!("{} {}", method, request.url());

        let result = self.retry.run_with_retry(|| self.send_once(request)).await;

        if let Some(metrics) = metrics {
            metrics
                .http_request_duration
                .with_label_values(&[method])
                .observe(started.elapsed().as_secs_f64());
            match &result {
                Ok(response) => metrics
                    .http_requests
                    .with_label_values(&[method, response.status.as_str()])
                    .inc(),
                Err(e) => {
                    let reason = match e {
                        HarnessError::Timeout(_) => "timeout",
                        HarnessError::InvalidRequest(_) => "invalid_request",
                        _ => "transport",
                    };
                    metrics
                        .http_request_failures
                        .with_label_values(&[method, reason])
                        .inc()
                }
            }
        }
        result
    }
}
