//! Token sources
//!
//! One source per auth flow, built from the configuration snapshot on demand.

pub mod bearer;
pub mod client_credentials;
pub mod fetch;
pub mod oauth2;

use crate::cache::token::TokenLifetime;
use crate::config::auth::AuthKind;
use crate::config::settings::{AuthPattern, HarnessConfig};
use crate::errors::HarnessError;
use crate::request::router::RequestRouter;
use crate::transport::HttpTransport;

use bearer::BearerSource;
use client_credentials::ClientCredentialsSource;
use fetch::{FetchToken, IssuedToken};
use oauth2::OAuth2Source;

#[derive(Debug, Clone)]
pub enum SourceKind {
    Bearer(BearerSource),
    /// statically configured key, no network call
    ApiKey(String),
    OAuth2(OAuth2Source),
    ClientCredentials(ClientCredentialsSource),
}

impl SourceKind {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceKind::Bearer(_) => AuthKind::Bearer.as_str(),
            SourceKind::ApiKey(_) => AuthKind::ApiKey.as_str(),
            SourceKind::OAuth2(_) => AuthKind::OAuth2.as_str(),
            SourceKind::ClientCredentials(_) => "client_credentials",
        }
    }
}

impl FetchToken for SourceKind {
    async fn fetch_token<T: HttpTransport>(&self, transport: &T) -> Result<IssuedToken, HarnessError> {
        match self {
            SourceKind::Bearer(s) => s.fetch_token(transport).await,
            SourceKind::ApiKey(key) => Ok(IssuedToken {
                value: key.clone(),
                lifetime: TokenLifetime::Unbounded,
            }),
            SourceKind::OAuth2(s) => s.fetch_token(transport).await,
            SourceKind::ClientCredentials(s) => s.fetch_token(transport).await,
        }
    }
}

/// Source for the single auth pattern, or for `token_type` in the multiple one.
pub fn build_source(
    config: &HarnessConfig,
    router: &RequestRouter,
    token_type: Option<&str>,
) -> Result<SourceKind, HarnessError> {
    match (config.auth_pattern, token_type) {
        (AuthPattern::Multiple, Some(token_type)) => {
            build_token_type_source(config, router, token_type)
        }
        (AuthPattern::Multiple, None) => Err(HarnessError::configuration(
            "token type required for the multiple auth pattern",
        )),
        (AuthPattern::Single, _) => build_single_source(config, router),
    }
}

fn build_single_source(config: &HarnessConfig, router: &RequestRouter) -> Result<SourceKind, HarnessError> {
    let auth = &config.auth;
    let kind = auth.kind.as_str();
    let required = |value: &Option<String>, field: &str| {
        value
            .clone()
            .ok_or_else(|| HarnessError::configuration(format!("auth({}).{} is not configured", kind, field)))
    };

    match auth.kind {
        AuthKind::Bearer => {
            let (endpoint, path) = router.resolve_target(&required(&auth.token_endpoint, "token_endpoint")?)?;
            Ok(SourceKind::Bearer(BearerSource::new(
                endpoint,
                path,
                required(&auth.credentials.username, "credentials.username")?,
                required(&auth.credentials.password, "credentials.password")?,
            )))
        }
        AuthKind::OAuth2 => {
            let (endpoint, path) = router.resolve_target(&required(&auth.token_endpoint, "token_endpoint")?)?;
            Ok(SourceKind::OAuth2(OAuth2Source::new(
                endpoint,
                path,
                required(&auth.credentials.client_id, "credentials.client_id")?,
                required(&auth.credentials.client_secret, "credentials.client_secret")?,
            )))
        }
        AuthKind::ApiKey => Ok(SourceKind::ApiKey(required(&auth.api_key_value, "api_key_value")?)),
        AuthKind::Basic | AuthKind::None => Err(HarnessError::configuration(format!(
            "unsupported auth type: {}",
            kind
        ))),
    }
}

fn build_token_type_source(
    config: &HarnessConfig,
    router: &RequestRouter,
    token_type: &str,
) -> Result<SourceKind, HarnessError> {
    let not_found = || {
        HarnessError::configuration(format!("token configuration not found for type: {}", token_type))
    };
    let credential = config.token_credentials.get(token_type).ok_or_else(not_found)?;
    let target = credential
        .endpoint
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(not_found)?;
    if credential.secret.trim().is_empty() {
        return Err(not_found());
    }

    let (endpoint, path) = router.resolve_target(target)?;
    Ok(SourceKind::ClientCredentials(ClientCredentialsSource {
        token_type: token_type.to_owned(),
        endpoint,
        path,
        client_id: credential.client_id.clone(),
        secret: credential.secret.clone(),
    }))
}
