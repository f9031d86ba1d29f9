// Multiple auth pattern: independent per-type slots, key validation and
// the client-credentials exchange body.

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::Duration;
    use http::StatusCode;
    use serde_json::json;

    use crate::cache::token_manager::TokenManager;
    use crate::config::auth::{AuthConfig, TokenTypeCredential};
    use crate::config::settings::HarnessConfig;
    use crate::errors::HarnessError;
    use crate::helpers::time::ManualClock;
    use crate::tests::common::{t0, MockTransport};
    use crate::transport::ApiResponse;

    fn config() -> Arc<HarnessConfig> {
        let admin = TokenTypeCredential {
            client_id: Some("harness".into()),
            ..TokenTypeCredential::new("admin-secret").with_endpoint("/auth/token")
        };
        let client = TokenTypeCredential::new("client-secret")
            .with_endpoint("https://idp.example.com/token");
        Arc::new(
            HarnessConfig::single("https://api.dev.example.com", AuthConfig::none())
                .with_token_types([("admin".to_string(), admin), ("client".to_string(), client)]),
        )
    }

    fn manager(transport: MockTransport) -> (TokenManager<MockTransport>, ManualClock) {
        let clock = ManualClock::new(t0());
        (TokenManager::with_clock(config(), transport, Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn token_types_are_cached_independently() {
        let transport = MockTransport::issuing("access_token", json!({"expires_in": 3600}));
        let (tokens, _) = manager(transport.clone());

        assert_eq!(tokens.get_token(Some("admin")).await.unwrap(), "tok-1");
        assert_eq!(tokens.get_token(Some("client")).await.unwrap(), "tok-2");
        assert_eq!(tokens.get_token(Some("admin")).await.unwrap(), "tok-1");
        assert_eq!(transport.call_count(), 2);

        tokens.clear_token(Some("admin")).await;
        assert!(!tokens.has_valid_token(Some("admin")).await);
        assert!(tokens.has_valid_token(Some("client")).await);
        assert_eq!(tokens.get_token(Some("client")).await.unwrap(), "tok-2");

        tokens.clear_token(None).await;
        assert!(!tokens.has_valid_token(Some("client")).await);
    }

    #[tokio::test]
    async fn expiring_one_type_leaves_the_other_cached() {
        let transport = MockTransport::new(|request, n| {
            let expires_in = match request.body.as_ref().and_then(|b| b["token_type"].as_str()) {
                Some("admin") => 600,
                _ => 3600,
            };
            Ok(ApiResponse::from_json(
                StatusCode::OK,
                json!({"access_token": format!("tok-{}", n + 1), "expires_in": expires_in}),
            ))
        });
        let (tokens, clock) = manager(transport.clone());

        assert_eq!(tokens.get_token(Some("admin")).await.unwrap(), "tok-1");
        assert_eq!(tokens.get_token(Some("client")).await.unwrap(), "tok-2");

        // admin: 600 s minus the margin is 300 s; client: 3300 s
        clock.advance(Duration::seconds(400));
        assert!(!tokens.has_valid_token(Some("admin")).await);
        assert!(tokens.has_valid_token(Some("client")).await);

        assert_eq!(tokens.get_token(Some("admin")).await.unwrap(), "tok-3");
        assert_eq!(tokens.get_token(Some("client")).await.unwrap(), "tok-2");
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn exchange_request_names_token_type() {
        let transport = MockTransport::issuing("access_token", json!({}));
        let (tokens, clock) = manager(transport.clone());

        tokens.get_token(Some("admin")).await.unwrap();
        tokens.get_token(Some("client")).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].url(), "https://api.dev.example.com/auth/token");
        assert_eq!(
            calls[0].body,
            Some(json!({
                "grant_type": "client_credentials",
                "token_type": "admin",
                "client_secret": "admin-secret",
                "client_id": "harness"
            }))
        );
        assert_eq!(calls[1].url(), "https://idp.example.com/token");
        assert!(calls[1].body.as_ref().unwrap().get("client_id").is_none());

        // no expires_in: default 3600 s minus the 300 s margin
        clock.advance(Duration::seconds(3299));
        assert!(tokens.has_valid_token(Some("admin")).await);
        clock.advance(Duration::seconds(1));
        assert!(!tokens.has_valid_token(Some("admin")).await);
    }

    #[tokio::test]
    async fn missing_or_unknown_token_type_is_rejected() {
        let transport = MockTransport::issuing("access_token", json!({}));
        let (tokens, _) = manager(transport.clone());

        let err = tokens.get_token(None).await.unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(ref m) if m.contains("admin, client")), "{}", err);

        let err = tokens.get_token(Some("guest")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: unknown token type: guest. Available types: admin, client"
        );
        assert!(!tokens.has_valid_token(None).await);
        assert!(!tokens.has_valid_token(Some("guest")).await);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn slots_are_fixed_at_construction() {
        let (tokens, _) = manager(MockTransport::issuing("access_token", json!({})));
        assert_eq!(tokens.cache().keys().await, vec!["admin".to_string(), "client".to_string()]);
    }
}
