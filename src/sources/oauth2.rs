use http::Method;
use serde_json::json;

use crate::cache::token::TokenLifetime;
use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;
use crate::request::router::ResolvedEndpoint;
use crate::sources::fetch::{
    extract_expires_in, extract_token, request_token_body, FetchToken, IssuedToken,
};
use crate::transport::HttpTransport;

/// OAuth2 client-credentials grant.
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    pub endpoint: ResolvedEndpoint,
    pub path: String,
    pub client_id: String,
    pub client_secret: String,
}

impl OAuth2Source {
    pub fn new(endpoint: ResolvedEndpoint, path: String, client_id: String, client_secret: String) -> Self {
        Self {
            endpoint,
            path,
            client_id,
            client_secret,
        }
    }

    fn request(&self) -> ApiRequest {
        ApiRequest::new(Method::POST, self.endpoint.clone(), self.path.clone()).with_body(json!({
            "grant_type": "client_credentials",
            "client_id": self.client_id,
            "client_secret": self.client_secret,
        }))
    }
}

impl FetchToken for OAuth2Source {
    async fn fetch_token<T: HttpTransport>(&self, transport: &T) -> Result<IssuedToken, HarnessError> {
        let body = request_token_body(transport, &self.request()).await?;
        Ok(IssuedToken {
            value: extract_token(&body, &["access_token"])?,
            lifetime: TokenLifetime::Reported(extract_expires_in(&body)),
        })
    }
}
