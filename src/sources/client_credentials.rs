use http::Method;
use serde_json::{json, Value};

use crate::cache::token::TokenLifetime;
use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;
use crate::request::router::ResolvedEndpoint;
use crate::sources::fetch::{
    extract_expires_in, extract_token, request_token_body, FetchToken, IssuedToken,
};
use crate::transport::HttpTransport;

/// Per-token-type credential exchange of the multiple auth pattern.
#[derive(Debug, Clone)]
pub struct ClientCredentialsSource {
    pub token_type: String,
    pub endpoint: ResolvedEndpoint,
    pub path: String,
    pub client_id: Option<String>,
    pub secret: String,
}

impl ClientCredentialsSource {
    fn request(&self) -> ApiRequest {
        let mut body = json!({
            "grant_type": "client_credentials",
            "token_type": self.token_type,
            "client_secret": self.secret,
        });
        if let (Some(client_id), Value::Object(map)) = (&self.client_id, &mut body) {
            map.insert("client_id".into(), Value::String(client_id.clone()));
        }
        ApiRequest::new(Method::POST, self.endpoint.clone(), self.path.clone()).with_body(body)
    }
}

impl FetchToken for ClientCredentialsSource {
    async fn fetch_token<T: HttpTransport>(&self, transport: &T) -> Result<IssuedToken, HarnessError> {
        let body = request_token_body(transport, &self.request()).await?;
        Ok(IssuedToken {
            value: extract_token(&body, &["access_token"])?,
            lifetime: TokenLifetime::Reported(extract_expires_in(&body)),
        })
    }
}
