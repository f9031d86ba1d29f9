use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::auth::{AuthConfig, TokenTypeCredential};
use crate::config::environments::Environment;
use crate::utils::constants::DEFAULT_SERVICE;

/// ================================
/// Mode switches
/// ================================
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// one base URL for every request
    #[default]
    Single,
    /// logical service name -> base URL
    Microservices,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthPattern {
    /// one shared credential
    #[default]
    Single,
    /// one credential per declared token type
    Multiple,
}

/// ================================
/// Snapshot handed to every component
/// ================================
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub environment: Environment,
    pub architecture: Architecture,
    pub auth_pattern: AuthPattern,
    /// authoritative in single architecture
    pub base_url: Option<String>,
    /// authoritative in microservices architecture
    pub services: Option<BTreeMap<String, String>>,
    pub default_service: String,
    pub ssl: SslConfig,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry: RetryConfig,
    pub headers: BTreeMap<String, String>,
    pub auth: AuthConfig,
    /// declared token types, fixed before any cache entry exists
    pub token_types: Vec<String>,
    pub token_credentials: BTreeMap<String, TokenTypeCredential>,
    pub tokens: TokenSettings,
    pub logging: Option<LoggingConfig>,
}

impl HarnessConfig {
    /// Single-backend snapshot with defaults everywhere else.
    pub fn single(base_url: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            environment: Environment::Dev,
            architecture: Architecture::Single,
            auth_pattern: AuthPattern::Single,
            base_url: Some(base_url.into()),
            services: None,
            default_service: DEFAULT_SERVICE.to_owned(),
            ssl: SslConfig::default(),
            timeout_ms: Environment::Dev.default_timeout_ms(),
            retry_attempts: Environment::Dev.default_retry_attempts(),
            retry: RetryConfig::default(),
            headers: default_headers(),
            auth,
            token_types: Vec::new(),
            token_credentials: BTreeMap::new(),
            tokens: TokenSettings::default(),
            logging: None,
        }
    }

    /// Multi-backend snapshot; `services` maps logical names to base URLs.
    pub fn microservices<I, K, V>(services: I, auth: AuthConfig) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let services: BTreeMap<String, String> = services
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            architecture: Architecture::Microservices,
            base_url: None,
            services: Some(services),
            ..Self::single(String::new(), auth)
        }
    }

    /// Switch to the multiple auth pattern with the given declared token types.
    pub fn with_token_types<I>(mut self, credentials: I) -> Self
    where
        I: IntoIterator<Item = (String, TokenTypeCredential)>,
    {
        self.auth_pattern = AuthPattern::Multiple;
        self.token_credentials = credentials.into_iter().collect();
        self.token_types = self.token_credentials.keys().cloned().collect();
        self
    }
}

pub fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_owned(), "application/json".to_owned()),
        ("Accept".to_owned(), "application/json".to_owned()),
    ])
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SslConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub cert_path: String,
}

/// ================================
/// Token lifetime policy
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    /// nominal lifetime assumed for bearer login tokens
    #[serde(default = "default_bearer_lifetime_seconds")]
    pub bearer_lifetime_seconds: u64,
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
    /// used when the token endpoint omits `expires_in`
    #[serde(default = "default_expires_in_seconds")]
    pub default_expires_in_seconds: u64,
    /// floor for the cached lifetime after the margin is subtracted
    #[serde(default = "default_min_lifetime_seconds")]
    pub min_lifetime_seconds: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            bearer_lifetime_seconds: default_bearer_lifetime_seconds(),
            safety_margin_seconds: default_safety_margin_seconds(),
            default_expires_in_seconds: default_expires_in_seconds(),
            min_lifetime_seconds: default_min_lifetime_seconds(),
        }
    }
}

fn default_bearer_lifetime_seconds() -> u64 {
    3600
}

fn default_safety_margin_seconds() -> u64 {
    300
}

fn default_expires_in_seconds() -> u64 {
    3600
}

fn default_min_lifetime_seconds() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// will be mutiply by 2 on every attempt until max_delay_ms
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// invariant: >= base_delay_ms
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    1000
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Option<Self> {
        std::env::var("LOG_FORMAT")
            .ok()
            .map(|value| match value.to_lowercase().as_str() {
                "compact" | "text" => LogFormat::Compact,
                _ => LogFormat::Json,
            })
    }
}
