//! Entry point wiring configuration, tokens, composition and transport together.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cache::token_manager::TokenManager;
use crate::config::auth::AuthKind;
use crate::config::settings::{AuthPattern, HarnessConfig};
use crate::errors::HarnessError;
use crate::helpers::time::{Clock, SystemClock};
use crate::request::api_request::ApiRequest;
use crate::request::composer::RequestComposer;
use crate::transport::{ApiResponse, HttpTransport, ReqwestTransport};
use crate::utils::{config_loader, logging};

#[derive(Debug, Clone)]
pub struct Harness<T: HttpTransport = ReqwestTransport> {
    config: Arc<HarnessConfig>,
    tokens: TokenManager<T>,
    composer: RequestComposer,
    transport: T,
}

impl Harness<ReqwestTransport> {
    /// Load `HARNESS_CONFIG` (or `harness.yaml`) for `TEST_ENV` and build a live harness.
    pub async fn bootstrap() -> Result<Self> {
        Self::bootstrap_from(&config_loader::config_path()).await
    }

    pub async fn bootstrap_from(config_path: &str) -> Result<Self> {
        let config = config_loader::run(config_path).await?;
        logging::run(&config);
        let transport = ReqwestTransport::from_config(&config)?;
        info!(
            "harness ready: environment={} architecture={:?} auth_pattern={:?}",
            config.environment.as_str(),
            config.architecture,
            config.auth_pattern
        );
        Ok(Self::new(Arc::new(config), transport))
    }
}

impl<T: HttpTransport> Harness<T> {
    pub fn new(config: Arc<HarnessConfig>, transport: T) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Arc<HarnessConfig>, transport: T, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: TokenManager::with_clock(config.clone(), transport.clone(), clock),
            composer: RequestComposer::new(config.clone()),
            config,
            transport,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenManager<T> {
        &self.tokens
    }

    pub fn composer(&self) -> &RequestComposer {
        &self.composer
    }

    /// Attach the credential the configuration calls for: a bearer token, or the
    /// API key under its configured header. `none` leaves the request as is.
    pub async fn authorize(&self, request: ApiRequest, token_type: Option<&str>) -> Result<ApiRequest, HarnessError> {
        if self.config.auth_pattern == AuthPattern::Multiple {
            let token = self.tokens.get_token(token_type).await?;
            return request.with_auth(&token);
        }
        match self.config.auth.kind {
            AuthKind::None => Ok(request),
            AuthKind::ApiKey => {
                let key = self.tokens.get_token(None).await?;
                request.with_api_key(&key, self.config.auth.api_key_header.as_deref())
            }
            AuthKind::Bearer | AuthKind::OAuth2 | AuthKind::Basic => {
                let token = self.tokens.get_token(None).await?;
                request.with_auth(&token)
            }
        }
    }

    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        self.transport.send(request).await
    }
}
