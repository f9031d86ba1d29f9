use std::sync::Arc;

use http::Method;
use serde_json::Value;

use crate::config::settings::HarnessConfig;
use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;
use crate::request::router::RequestRouter;

/// Builds requests against the resolved endpoint, with the configured default
/// headers and an optional bearer token.
#[derive(Debug, Clone)]
pub struct RequestComposer {
    config: Arc<HarnessConfig>,
    router: RequestRouter,
}

impl RequestComposer {
    pub fn new(config: Arc<HarnessConfig>) -> Self {
        Self {
            router: RequestRouter::new(config.clone()),
            config,
        }
    }

    pub fn router(&self) -> &RequestRouter {
        &self.router
    }

    /// Request for `path` on `service` carrying the default headers.
    pub fn create_request(
        &self,
        method: Method,
        path: &str,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        let endpoint = self.router.resolve(service)?;
        ApiRequest::new(method, endpoint, path).with_headers(&self.config.headers)
    }

    pub fn build_get_request(
        &self,
        path: &str,
        token: Option<&str>,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        self.build(Method::GET, path, None, token, service)
    }

    pub fn build_post_request(
        &self,
        path: &str,
        body: Value,
        token: Option<&str>,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        self.build(Method::POST, path, Some(body), token, service)
    }

    pub fn build_put_request(
        &self,
        path: &str,
        body: Value,
        token: Option<&str>,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        self.build(Method::PUT, path, Some(body), token, service)
    }

    pub fn build_patch_request(
        &self,
        path: &str,
        body: Value,
        token: Option<&str>,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        self.build(Method::PATCH, path, Some(body), token, service)
    }

    pub fn build_delete_request(
        &self,
        path: &str,
        token: Option<&str>,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        self.build(Method::DELETE, path, None, token, service)
    }

    fn build(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        service: Option<&str>,
    ) -> Result<ApiRequest, HarnessError> {
        let mut request = self.create_request(method, path, service)?;
        if let Some(token) = token {
            request = request.with_auth(token)?;
        }
        if let Some(body) = body {
            request = request.with_body(body);
        }
        Ok(request)
    }
}
