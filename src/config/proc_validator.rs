//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates invariants of the snapshot:
//!   * architecture mode vs base url / service map exclusivity
//!   * auth descriptor completeness per auth kind
//!   * auth pattern vs declared token types
//!   * timeout / retry invariants

use tracing::{error, info, warn};

use crate::config::auth::{AuthConfig, AuthKind};
use crate::config::settings::{
    Architecture, AuthPattern, HarnessConfig, RetryConfig, TokenSettings,
};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_harness_config(cfg: &HarnessConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_routing(cfg, &mut errors);

    if cfg.auth_pattern == AuthPattern::Single {
        validate_auth(&cfg.auth, &mut errors);
    } else {
        validate_token_types(cfg, &mut errors);
    }

    if cfg.timeout_ms == 0 {
        errors.push("timeout must be greater than 0 ms".to_string());
    }
    validate_retry("retry", &cfg.retry, &mut errors);
    validate_token_settings(&cfg.tokens, &mut errors);

    if cfg.ssl.enabled && cfg.ssl.cert_path.trim().is_empty() {
        warn!("ssl is enabled but no certificate path is configured");
    }

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_routing(cfg: &HarnessConfig, errors: &mut Vec<String>) {
    match cfg.architecture {
        Architecture::Single => {
            match cfg.base_url.as_deref().map(str::trim) {
                None | Some("") => errors.push(
                    "base_url is required for the single architecture".to_string(),
                ),
                Some(url) => validate_url("base_url", url, errors),
            }
            if cfg.services.is_some() {
                errors.push(
                    "services must not be set for the single architecture; use base_url".to_string(),
                );
            }
        }
        Architecture::Microservices => {
            if cfg.base_url.is_some() {
                errors.push(
                    "base_url must not be set for the microservices architecture; use services"
                        .to_string(),
                );
            }
            match &cfg.services {
                None => errors.push(
                    "services are required for the microservices architecture".to_string(),
                ),
                Some(services) if services.is_empty() => errors.push(
                    "services is empty; at least one service required".to_string(),
                ),
                Some(services) => {
                    for (name, url) in services {
                        validate_url(&format!("services['{}']", name), url, errors);
                    }
                    if !services.contains_key(&cfg.default_service) {
                        errors.push(format!(
                            "default service '{}' is not configured in services",
                            cfg.default_service
                        ));
                    }
                }
            }
        }
    }
}

fn validate_url(path: &str, url: &str, errors: &mut Vec<String>) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} must start with http:// or https://, got '{}'", path, url));
    }
}

fn validate_auth(auth: &AuthConfig, errors: &mut Vec<String>) {
    let kind = auth.kind.as_str();
    match auth.kind {
        AuthKind::Bearer => {
            require(&auth.token_endpoint, kind, "token_endpoint", errors);
            require(&auth.credentials.username, kind, "credentials.username", errors);
            require(&auth.credentials.password, kind, "credentials.password", errors);
        }
        AuthKind::OAuth2 => {
            require(&auth.token_endpoint, kind, "token_endpoint", errors);
            require(&auth.credentials.client_id, kind, "credentials.client_id", errors);
            require(&auth.credentials.client_secret, kind, "credentials.client_secret", errors);
        }
        AuthKind::ApiKey => {
            match auth.api_key_header.as_deref().map(str::trim) {
                None | Some("") => {
                    errors.push("auth(apikey).api_key_header must not be empty".to_string())
                }
                Some(_) => {}
            }
            if auth.api_key_value.is_none() {
                errors.push("auth(apikey).api_key_value is required".to_string());
            }
        }
        AuthKind::Basic | AuthKind::None => {
            info!("auth type '{}' has no token flow", kind);
        }
    }
}

/// Missing fields are errors; empty values (unset variables) only warn.
fn require(value: &Option<String>, kind: &str, field: &str, errors: &mut Vec<String>) {
    match value.as_deref() {
        None => errors.push(format!("auth({}).{} is required", kind, field)),
        Some(v) if v.trim().is_empty() => warn!("auth({}).{} is empty", kind, field),
        Some(_) => {}
    }
}

fn validate_token_types(cfg: &HarnessConfig, errors: &mut Vec<String>) {
    if cfg.token_types.is_empty() {
        errors.push(
            "token_types is empty; the multiple auth pattern requires at least one".to_string(),
        );
    }
    for token_type in &cfg.token_types {
        match cfg.token_credentials.get(token_type) {
            None => errors.push(format!("token type '{}' has no credential entry", token_type)),
            Some(credential) => {
                if credential.endpoint.as_deref().map_or(true, |e| e.trim().is_empty()) {
                    errors.push(format!("token type '{}' has no endpoint", token_type));
                }
                if credential.secret.trim().is_empty() {
                    warn!("token type '{}' has an empty credential", token_type);
                }
            }
        }
    }
    for key in cfg.token_credentials.keys() {
        if !cfg.token_types.contains(key) {
            errors.push(format!("credential '{}' is not a declared token type", key));
        }
    }
}

fn validate_retry(path: &str, retry: &RetryConfig, errors: &mut Vec<String>) {
    if retry.base_delay_ms == 0 {
        errors.push(format!("{}.base_delay_ms must be > 0", path));
    }
    if retry.max_delay_ms < retry.base_delay_ms {
        errors.push(format!(
            "{}.max_delay_ms ({}) must be >= base_delay_ms ({})",
            path, retry.max_delay_ms, retry.base_delay_ms
        ));
    }
}

fn validate_token_settings(tokens: &TokenSettings, errors: &mut Vec<String>) {
    if tokens.min_lifetime_seconds == 0 {
        errors.push("tokens.min_lifetime_seconds must be > 0".to_string());
    }
    if tokens.bearer_lifetime_seconds <= tokens.safety_margin_seconds {
        warn!(
            "tokens.bearer_lifetime_seconds ({}) <= safety_margin_seconds ({}); min_lifetime_seconds applies",
            tokens.bearer_lifetime_seconds, tokens.safety_margin_seconds
        );
    }
}
