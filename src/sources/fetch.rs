use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::cache::token::TokenLifetime;
use crate::errors::HarnessError;
use crate::request::api_request::ApiRequest;
use crate::transport::HttpTransport;

/// Credential returned by a token source, before the cache policy applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub lifetime: TokenLifetime,
}

pub trait FetchToken {
    fn fetch_token<T: HttpTransport>(
        &self,
        transport: &T,
    ) -> impl Future<Output = Result<IssuedToken, HarnessError>> + Send;
}

/// Send a token request and return the parsed body of a successful response.
pub async fn request_token_body<T: HttpTransport>(
    transport: &T,
    request: &ApiRequest,
) -> Result<Value, HarnessError> {
    let url = request.url();
    let response = transport
        .send(request)
        .await
        .map_err(|e| HarnessError::auth(format!("token endpoint {} unreachable: {}", url, e)))?;

    if !response.is_success() {
        return Err(HarnessError::auth(format!(
            "token request to {} failed: {}",
            url, response.status
        )));
    }
    debug!("token endpoint {} answered {}", url, response.status);
    Ok(response.body)
}

/// First non-empty string among `fields`.
pub fn extract_token(body: &Value, fields: &[&str]) -> Result<String, HarnessError> {
    fields
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            HarnessError::auth(format!(
                "token response has no '{}' field",
                fields.join("' or '")
            ))
        })
}

/// `expires_in` in seconds, when the endpoint reported one.
pub fn extract_expires_in(body: &Value) -> Option<u64> {
    match body.get("expires_in")? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
