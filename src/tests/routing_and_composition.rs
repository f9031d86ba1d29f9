#[cfg(test)]
mod test {
    use std::sync::Arc;

    use serde_json::json;

    use crate::config::auth::AuthConfig;
    use crate::config::settings::HarnessConfig;
    use crate::errors::HarnessError;
    use crate::request::composer::RequestComposer;
    use crate::request::router::RequestRouter;

    fn bearer() -> AuthConfig {
        AuthConfig::bearer("/api/auth/login", "qa", "pw")
    }

    fn microservices() -> Arc<HarnessConfig> {
        Arc::new(HarnessConfig::microservices(
            [
                ("main", "https://api.dev.example.com"),
                ("payments", "https://payments-api.dev.example.com"),
            ],
            bearer(),
        ))
    }

    #[test]
    fn single_architecture_ignores_service() {
        let router = RequestRouter::new(Arc::new(HarnessConfig::single("https://api.dev.example.com", bearer())));
        let endpoint = router.resolve(Some("payments")).unwrap();
        assert_eq!(endpoint.base_url, "https://api.dev.example.com");
        assert_eq!(endpoint.service, None);
    }

    #[test]
    fn microservices_resolve_named_and_default_service() {
        let router = RequestRouter::new(microservices());

        let payments = router.resolve(Some("payments")).unwrap();
        assert_eq!(payments.base_url, "https://payments-api.dev.example.com");
        assert_eq!(payments.service.as_deref(), Some("payments"));

        let main = router.resolve(None).unwrap();
        assert_eq!(main.base_url, "https://api.dev.example.com");
    }

    #[test]
    fn unknown_service_lists_available_services() {
        let err = RequestRouter::new(microservices()).resolve(Some("orders")).unwrap_err();
        let HarnessError::Configuration(message) = err else {
            panic!("expected configuration error");
        };
        assert!(message.contains("\"orders\""), "{}", message);
        assert!(message.contains("Available services: main, payments"), "{}", message);
        assert!(message.contains("DEV_ORDERS_API_URL"), "{}", message);
    }

    #[test]
    fn missing_routing_data_is_a_configuration_error() {
        let mut config = HarnessConfig::single("https://api.dev.example.com", bearer());
        config.base_url = None;
        assert!(matches!(
            RequestRouter::new(Arc::new(config)).resolve(None),
            Err(HarnessError::Configuration(_))
        ));

        let mut config = (*microservices()).clone();
        config.services = None;
        assert!(matches!(
            RequestRouter::new(Arc::new(config)).resolve(Some("payments")),
            Err(HarnessError::Configuration(_))
        ));
    }

    #[test]
    fn post_request_carries_token_body_and_default_headers() {
        let composer = RequestComposer::new(Arc::new(HarnessConfig::single("https://api.dev.example.com", bearer())));

        let request = composer
            .build_post_request("/x", json!({"a": 1}), Some("tok123"), None)
            .unwrap();

        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.url(), "https://api.dev.example.com/x");
        assert_eq!(request.header("authorization"), Some("Bearer tok123"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.body, Some(json!({"a": 1})));
    }

    #[test]
    fn omitting_token_omits_authorization() {
        let composer = RequestComposer::new(microservices());

        let get = composer.build_get_request("/invoices", None, Some("payments")).unwrap();
        assert!(get.header("authorization").is_none());
        assert_eq!(get.url(), "https://payments-api.dev.example.com/invoices");
        assert!(get.body.is_none());

        let delete = composer.build_delete_request("/invoices/1", Some("t"), None).unwrap();
        assert_eq!(delete.method, http::Method::DELETE);
        assert_eq!(delete.url(), "https://api.dev.example.com/invoices/1");

        let patch = composer.build_patch_request("/invoices/1", json!({}), None, None).unwrap();
        let put = composer.build_put_request("/invoices/1", json!([]), None, None).unwrap();
        assert_eq!(patch.method, http::Method::PATCH);
        assert_eq!(put.body, Some(json!([])));
    }

    #[test]
    fn composer_propagates_routing_errors() {
        let composer = RequestComposer::new(microservices());
        assert!(matches!(
            composer.build_get_request("/", None, Some("orders")),
            Err(HarnessError::Configuration(_))
        ));
    }
}
