// Live HTTP through ReqwestTransport: request encoding, retry policy and timeouts.

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::routing::get;
    use http::{Method, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::config::auth::AuthConfig;
    use crate::config::settings::{HarnessConfig, RetryConfig};
    use crate::errors::HarnessError;
    use crate::request::api_request::ApiRequest;
    use crate::request::router::ResolvedEndpoint;
    use crate::tests::common::{spawn_axum, Router};
    use crate::transport::{HttpTransport, ReqwestTransport};

    fn config(base_url: &str, timeout_ms: u64, retry_attempts: u32) -> HarnessConfig {
        let mut config = HarnessConfig::single(base_url, AuthConfig::none());
        config.timeout_ms = timeout_ms;
        config.retry_attempts = retry_attempts;
        config.retry = RetryConfig { base_delay_ms: 10, max_delay_ms: 20 };
        config
    }

    #[tokio::test]
    async fn sends_method_headers_query_and_json_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/orders")
                .query_param("dry_run", "true")
                .header("authorization", "Bearer tok")
                .json_body(json!({"sku": "A-1", "qty": 2}));
            then.status(201)
                .header("x-request-id", "r-1")
                .json_body(json!({"id": 42}));
        });

        let transport = ReqwestTransport::from_config(&config(&server.base_url(), 2000, 0)).unwrap();
        let request = ApiRequest::new(Method::POST, ResolvedEndpoint::new(server.base_url(), None), "/orders")
            .with_auth("tok")
            .unwrap()
            .with_query_param("dry_run", true)
            .with_body(json!({"sku": "A-1", "qty": 2}));

        let response = transport.send(&request).await.unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body["id"], 42);
        assert_eq!(response.header("x-request-id"), Some("r-1"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn http_error_statuses_are_returned_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/flaky");
            then.status(503).body("unavailable");
        });

        let transport = ReqwestTransport::from_config(&config(&server.base_url(), 2000, 3)).unwrap();
        let request = ApiRequest::new(Method::GET, ResolvedEndpoint::new(server.base_url(), None), "/flaky");
        let response = transport.send(&request).await.unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.text, "unavailable");
        assert!(response.body.is_null());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn timeouts_are_retried_then_reported() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/slow",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "late"
                }
            }),
        );
        let (handle, addr) = spawn_axum(router).await;
        let base_url = format!("http://{}", addr);

        let transport = ReqwestTransport::from_config(&config(&base_url, 100, 1)).unwrap();
        let request = ApiRequest::new(Method::GET, ResolvedEndpoint::new(base_url.clone(), None), "/slow");
        let err = transport.send(&request).await.unwrap_err();

        assert!(matches!(err, HarnessError::Timeout(d) if d == Duration::from_millis(100)), "{}", err);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        handle.abort();
    }

    #[tokio::test]
    async fn connection_failures_are_transport_errors() {
        // bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let base_url = format!("http://{}", addr);

        let transport = ReqwestTransport::from_config(&config(&base_url, 500, 1)).unwrap();
        let request = ApiRequest::new(Method::GET, ResolvedEndpoint::new(base_url, None), "/");
        assert!(matches!(transport.send(&request).await, Err(HarnessError::Transport(_))));
    }

    #[test]
    fn missing_certificate_only_warns() {
        let mut config = config("https://api.dev.example.com", 1000, 0);
        config.ssl.enabled = true;
        config.ssl.cert_path = "/nonexistent/ca.pem".into();
        assert!(ReqwestTransport::from_config(&config).is_ok());
    }
}
