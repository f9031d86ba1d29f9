use std::collections::BTreeMap;

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;

use crate::errors::HarnessError;
use crate::request::router::ResolvedEndpoint;
use crate::utils::constants::DEFAULT_API_KEY_HEADER;

/// Fully specified outbound call, ready for a transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: ResolvedEndpoint,
    pub path: String,
    pub headers: HeaderMap,
    pub query: BTreeMap<String, String>,
    /// passed through to the transport untouched
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: ResolvedEndpoint, path: impl Into<String>) -> Self {
        Self {
            method,
            endpoint,
            path: path.into(),
            headers: HeaderMap::new(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn url(&self) -> String {
        self.endpoint.join(&self.path)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, HarnessError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HarnessError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HarnessError::InvalidRequest(format!("header '{}' value: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_headers<I, K, V>(self, headers: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        headers
            .into_iter()
            .try_fold(self, |req, (k, v)| req.with_header(k.as_ref(), v.as_ref()))
    }

    /// `Authorization: Bearer <token>`
    pub fn with_auth(self, token: &str) -> Result<Self, HarnessError> {
        self.with_header(AUTHORIZATION.as_str(), &format!("Bearer {}", token))
    }

    /// API key under `header_name`, `x-api-key` by default.
    pub fn with_api_key(self, api_key: &str, header_name: Option<&str>) -> Result<Self, HarnessError> {
        self.with_header(header_name.unwrap_or(DEFAULT_API_KEY_HEADER), api_key)
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    pub fn with_query_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        params
            .into_iter()
            .fold(self, |req, (k, v)| req.with_query_param(k, v))
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> ApiRequest {
        ApiRequest::new(
            Method::GET,
            ResolvedEndpoint::new("https://api.dev.example.com/", None),
            "/products",
        )
    }

    #[test]
    fn url_joins_base_and_path() {
        assert_eq!(request().url(), "https://api.dev.example.com/products");

        let mut relative = request();
        relative.path = "products/1".into();
        assert_eq!(relative.url(), "https://api.dev.example.com/products/1");
    }

    #[test]
    fn headers_and_query_last_write_wins() {
        let req = request()
            .with_header("X-Trace", "one")
            .unwrap()
            .with_headers([("x-trace", "two"), ("X-Tenant", "acme")])
            .unwrap()
            .with_query_params([("page", 1), ("limit", 10)])
            .with_query_param("page", 2);

        assert_eq!(req.header("X-Trace"), Some("two"));
        assert_eq!(req.headers.get_all("x-trace").iter().count(), 1);
        assert_eq!(req.header("x-tenant"), Some("acme"));
        assert_eq!(req.query.get("page").map(String::as_str), Some("2"));
        assert_eq!(req.query.get("limit").map(String::as_str), Some("10"));
    }

    #[test]
    fn auth_and_api_key_headers() {
        let req = request().with_auth("tok").unwrap().with_api_key("k1", None).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header("x-api-key"), Some("k1"));

        let req = request().with_api_key("k2", Some("X-Service-Key")).unwrap();
        assert_eq!(req.header("x-service-key"), Some("k2"));
    }

    #[test]
    fn invalid_header_is_rejected() {
        let err = request().with_header("bad header", "v").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidRequest(_)));
    }

    #[test]
    fn body_is_passed_through() {
        let body = json!({"nested": {"list": [1, 2, 3]}, "flag": null});
        let req = request().with_body(body.clone());
        assert_eq!(req.body, Some(body));
    }
}
