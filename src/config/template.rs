use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::auth::{AuthConfig, TokenTypeCredential};
use crate::config::settings::{
    Architecture, AuthPattern, LoggingConfig, RetryConfig, TokenSettings,
};
use crate::utils::constants::DEFAULT_SERVICE;

/// ================================
/// Harness file (YAML)
/// ================================
///
/// Environment-independent shape of the harness. URLs, credentials, timeouts and
/// SSL switches are filled per environment from the process environment.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateConfig {
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default)]
    pub auth_pattern: AuthPattern,
    #[serde(default)]
    pub ssl_enabled: bool,
    /// logical service names (microservices architecture)
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default = "default_service")]
    pub default_service: String,
    /// token type keys (multiple auth pattern)
    #[serde(default)]
    pub token_types: Vec<String>,
    /// endpoint / client id per token type, secrets come from the environment
    #[serde(default)]
    pub token_credentials: BTreeMap<String, TokenTypeCredential>,
    /// absent -> read from AUTH_* variables
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub tokens: TokenSettings,
    #[serde(default)]
    pub retry: RetryConfig,
    pub logging: Option<LoggingConfig>,
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_owned()
}
