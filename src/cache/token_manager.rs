use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::token::compute_expiry;
use crate::cache::token_cache::TokenCache;
use crate::config::auth::AuthKind;
use crate::config::settings::{AuthPattern, HarnessConfig};
use crate::errors::HarnessError;
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::request::router::RequestRouter;
use crate::sources::{build_source, SourceKind};
use crate::sources::fetch::FetchToken;
use crate::transport::HttpTransport;

/// Obtains, caches and invalidates credentials for the configured auth pattern.
///
/// Concurrent misses for the same key may each fetch; the last write wins and
/// every caller still receives a valid token.
#[derive(Debug, Clone)]
pub struct TokenManager<T: HttpTransport> {
    config: Arc<HarnessConfig>,
    router: RequestRouter,
    transport: T,
    cache: TokenCache,
    clock: Arc<dyn Clock>,
}

impl<T: HttpTransport> TokenManager<T> {
    pub fn new(config: Arc<HarnessConfig>, transport: T) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Arc<HarnessConfig>, transport: T, clock: Arc<dyn Clock>) -> Self {
        let cache = Self::cache_for(&config);
        Self {
            router: RequestRouter::new(config.clone()),
            config,
            transport,
            cache,
            clock,
        }
    }

    /// Empty cache whose slots match the declared auth pattern.
    pub fn cache_for(config: &HarnessConfig) -> TokenCache {
        match config.auth_pattern {
            AuthPattern::Single => TokenCache::single(),
            AuthPattern::Multiple => TokenCache::with_keys(config.token_types.iter().cloned()),
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// A valid credential for `token_type`, fetched only when the cache has none.
    /// `token_type` is ignored in the single pattern.
    pub async fn get_token(&self, token_type: Option<&str>) -> Result<String, HarnessError> {
        let key = self.cache_key(token_type)?;
        let label = key.unwrap_or("default");
        let metrics = get_metrics().await;

        if let Some(token) = self.cache.get_valid(key, self.clock.now()).await {
            debug!("token cache hit for {}", label);
            if let Some(metrics) = metrics {
                metrics.token_cache_hits.with_label_values(&[label]).inc();
            }
            return Ok(token.value);
        }

        let source = build_source(&self.config, &self.router, key)?;
        if let SourceKind::ApiKey(api_key) = source {
            return Ok(api_key);
        }
        if let Some(metrics) = metrics {
            metrics
                .token_fetch_requests
                .with_label_values(&[label, source.kind()])
                .inc();
        }

        let started = get_instant();
        let issued = source.fetch_token(&self.transport).await.inspect_err(|e| {
            warn!("token fetch for {} failed: {}", label, e);
            if let Some(metrics) = metrics {
                metrics
                    .token_fetch_failures
                    .with_label_values(&[label, failure_reason(e)])
                    .inc();
            }
        })?;
        if let Some(metrics) = metrics {
            metrics
                .token_fetch_duration
                .with_label_values(&[label])
                .observe(started.elapsed().as_secs_f64());
        }

        if let Some(expires_at) = compute_expiry(&self.config.tokens, self.clock.now(), issued.lifetime) {
            self.cache.set(key, issued.value.clone(), expires_at).await;
            info!("token for {} cached until {}", label, expires_at.to_rfc3339());
        }
        Ok(issued.value)
    }

    /// Drop the cached credential. In the multiple pattern `None` clears every type.
    pub async fn clear_token(&self, token_type: Option<&str>) {
        match self.config.auth_pattern {
            AuthPattern::Single => self.cache.clear(None).await,
            AuthPattern::Multiple => self.cache.clear(token_type).await,
        }
    }

    /// True when a cached credential exists and has not reached its expiry.
    pub async fn has_valid_token(&self, token_type: Option<&str>) -> bool {
        let key = match self.config.auth_pattern {
            AuthPattern::Single => None,
            AuthPattern::Multiple => match token_type {
                Some(token_type) => Some(token_type),
                None => return false,
            },
        };
        self.cache.get_valid(key, self.clock.now()).await.is_some()
    }

    /// Statically configured API key of the single pattern.
    pub fn get_api_key(&self) -> Result<&str, HarnessError> {
        let auth = &self.config.auth;
        if auth.kind != AuthKind::ApiKey {
            return Err(HarnessError::configuration(format!(
                "auth type is {}, not apikey",
                auth.kind.as_str()
            )));
        }
        auth.api_key_value
            .as_deref()
            .ok_or_else(|| HarnessError::configuration("auth(apikey).api_key_value is not configured"))
    }

    fn cache_key<'a>(&self, token_type: Option<&'a str>) -> Result<Option<&'a str>, HarnessError> {
        match self.config.auth_pattern {
            AuthPattern::Single => {
                if let Some(token_type) = token_type {
                    debug!("single auth pattern: token type '{}' ignored", token_type);
                }
                Ok(None)
            }
            AuthPattern::Multiple => {
                let available = || self.config.token_types.join(", ");
                match token_type {
                    None => Err(HarnessError::configuration(format!(
                        "token type required for the multiple auth pattern. Available types: {}",
                        available()
                    ))),
                    Some(t) if !self.config.token_types.iter().any(|declared| declared == t) => {
                        Err(HarnessError::configuration(format!(
                            "unknown token type: {}. Available types: {}",
                            t,
                            available()
                        )))
                    }
                    Some(t) => Ok(Some(t)),
                }
            }
        }
    }
}

fn failure_reason(e: &HarnessError) -> &'static str {
    match e {
        HarnessError::Configuration(_) => "configuration",
        HarnessError::Auth(_) => "auth",
        _ => "other",
    }
}
