use http::Method;
use serde_json::json;

use crate::cache::token::TokenLifetime;
use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;
use crate::request::router::ResolvedEndpoint;
use crate::sources::fetch::{extract_token, request_token_body, FetchToken, IssuedToken};
use crate::transport::HttpTransport;

/// Username/password login returning `token` or `access_token`.
#[derive(Debug, Clone)]
pub struct BearerSource {
    pub endpoint: ResolvedEndpoint,
    pub path: String,
    pub username: String,
    pub password: String,
}

impl BearerSource {
    pub fn new(endpoint: ResolvedEndpoint, path: String, username: String, password: String) -> Self {
        Self {
            endpoint,
            path,
            username,
            password,
        }
    }

    fn request(&self) -> ApiRequest {
        ApiRequest::new(Method::POST, self.endpoint.clone(), self.path.clone()).with_body(json!({
            "username": self.username,
            "password": self.password,
        }))
    }
}

impl FetchToken for BearerSource {
    async fn fetch_token<T: HttpTransport>(&self, transport: &T) -> Result<IssuedToken, HarnessError> {
        let body = request_token_body(transport, &self.request()).await?;
        Ok(IssuedToken {
            value: extract_token(&body, &["token", "access_token"])?,
            lifetime: TokenLifetime::Nominal,
        })
    }
}
