use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::auth::{AuthConfig, AuthCredentials, AuthKind};
use crate::config::proc_initiator::apply_auth_defaults;
use crate::config::settings::{Architecture, HarnessConfig, SslConfig, default_headers};
use crate::config::template::TemplateConfig;
use crate::errors::HarnessError;
use crate::utils::constants::ENVIRONMENT_ENV;

/// Variable lookup, `std::env::var` in production and a map in tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl FromStr for Environment {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Prod),
            other => Err(HarnessError::configuration(format!(
                "unknown environment '{}', expected one of: dev, staging, prod",
                other
            ))),
        }
    }
}

impl Environment {
    /// `TEST_ENV`, falling back to dev for unset or unknown values.
    pub fn from_env() -> Self {
        process_env(ENVIRONMENT_ENV)
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Staging => "STAGING",
            Environment::Prod => "PROD",
        }
    }

    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Dev => ".env.development",
            Environment::Staging => ".env.staging",
            Environment::Prod => ".env.production",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Environment::Dev => "https://api.dev.example.com",
            Environment::Staging => "https://api.staging.example.com",
            Environment::Prod => "https://api.example.com",
        }
    }

    pub fn default_service_url(&self, service: &str, default_service: &str) -> String {
        if service == default_service {
            return self.default_base_url().to_owned();
        }
        match self {
            Environment::Prod => format!("https://{}-api.example.com", service),
            other => format!("https://{}-api.{}.example.com", service, other.as_str()),
        }
    }

    pub fn default_timeout_ms(&self) -> u64 {
        match self {
            Environment::Dev => 5000,
            Environment::Staging => 10000,
            Environment::Prod => 15000,
        }
    }

    pub fn default_retry_attempts(&self) -> u32 {
        match self {
            Environment::Dev => 3,
            Environment::Staging => 2,
            Environment::Prod => 1,
        }
    }

    /// Load `.env.<environment>` without overriding variables already set.
    pub fn load_env_file(&self) {
        match dotenvy::from_filename(self.env_file()) {
            Ok(path) => info!("loaded environment file {}", path.display()),
            Err(e) => debug!("environment file {} not loaded: {}", self.env_file(), e),
        }
    }

    fn var(&self, lookup: EnvLookup, name: &str) -> Option<String> {
        lookup(&format!("{}_{}", self.prefix(), name)).filter(|v| !v.is_empty())
    }
}

fn env_key(name: &str) -> String {
    name.to_uppercase().replace(['-', '.', ' '], "_")
}

fn parse_number<T: FromStr>(raw: Option<String>, name: &str, default: T) -> Result<T, HarnessError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|_| {
            HarnessError::configuration(format!("{} must be a number, got '{}'", name, value))
        }),
    }
}

/// Build the immutable snapshot for `environment` from the harness template.
pub fn resolve(
    template: &TemplateConfig,
    environment: Environment,
    lookup: EnvLookup,
) -> Result<HarnessConfig, HarnessError> {
    let prefix = environment.prefix();

    let (base_url, services) = match template.architecture {
        Architecture::Single => (
            Some(
                environment
                    .var(lookup, "BASE_URL")
                    .unwrap_or_else(|| environment.default_base_url().to_owned()),
            ),
            None,
        ),
        Architecture::Microservices => {
            let mut names: Vec<&String> = template.services.iter().collect();
            if !names.contains(&&template.default_service) {
                names.push(&template.default_service);
            }
            let services: BTreeMap<String, String> = names
                .into_iter()
                .map(|name| {
                    let url = environment
                        .var(lookup, &format!("{}_API_URL", env_key(name)))
                        .unwrap_or_else(|| {
                            environment.default_service_url(name, &template.default_service)
                        });
                    (name.to_owned(), url)
                })
                .collect();
            (None, Some(services))
        }
    };

    let token_credentials = template
        .token_types
        .iter()
        .map(|token_type| {
            let mut credential = template
                .token_credentials
                .get(token_type)
                .cloned()
                .unwrap_or_default();
            if let Some(secret) = environment.var(lookup, &format!("{}_TOKEN", env_key(token_type))) {
                credential.secret = secret;
            }
            (token_type.to_owned(), credential)
        })
        .collect();

    let mut auth = match &template.auth {
        Some(auth) => auth.clone(),
        None => auth_from_env(lookup)?,
    };
    apply_auth_defaults(&mut auth);
    if auth.kind == AuthKind::ApiKey && auth.api_key_value.is_none() {
        auth.api_key_value = Some(environment.var(lookup, "API_KEY").unwrap_or_default());
    }

    let ssl = SslConfig {
        enabled: template.ssl_enabled
            && environment.var(lookup, "SSL_ENABLED").as_deref() == Some("true"),
        cert_path: environment.var(lookup, "SSL_CERT_PATH").unwrap_or_default(),
    };

    let mut headers = default_headers();
    headers.extend(template.headers.clone());

    let config = HarnessConfig {
        environment,
        architecture: template.architecture,
        auth_pattern: template.auth_pattern,
        base_url,
        services,
        default_service: template.default_service.clone(),
        ssl,
        timeout_ms: parse_number(
            environment.var(lookup, "TIMEOUT"),
            &format!("{}_TIMEOUT", prefix),
            environment.default_timeout_ms(),
        )?,
        retry_attempts: parse_number(
            environment.var(lookup, "RETRY_ATTEMPTS"),
            &format!("{}_RETRY_ATTEMPTS", prefix),
            environment.default_retry_attempts(),
        )?,
        retry: template.retry.clone(),
        headers,
        auth,
        token_types: template.token_types.clone(),
        token_credentials,
        tokens: template.tokens.clone(),
        logging: template.logging.clone(),
    };
    debug!(environment = environment.as_str(), "resolved harness configuration");
    Ok(config)
}

/// Auth descriptor from `AUTH_*`, `OAUTH_*` and `API_KEY*` variables; bearer by default.
fn auth_from_env(lookup: EnvLookup) -> Result<AuthConfig, HarnessError> {
    let kind = match lookup("AUTH_TYPE").map(|v| v.to_lowercase()).as_deref() {
        None | Some("") | Some("bearer") => AuthKind::Bearer,
        Some("apikey") | Some("api_key") => AuthKind::ApiKey,
        Some("oauth2") => AuthKind::OAuth2,
        Some("basic") => AuthKind::Basic,
        Some("none") => AuthKind::None,
        Some(other) => {
            return Err(HarnessError::configuration(format!(
                "unknown AUTH_TYPE '{}'",
                other
            )))
        }
    };
    Ok(AuthConfig {
        kind,
        token_endpoint: lookup("AUTH_TOKEN_ENDPOINT"),
        credentials: AuthCredentials {
            username: Some(lookup("AUTH_USERNAME").unwrap_or_default()),
            password: Some(lookup("AUTH_PASSWORD").unwrap_or_default()),
            client_id: Some(lookup("OAUTH_CLIENT_ID").unwrap_or_default()),
            client_secret: Some(lookup("OAUTH_CLIENT_SECRET").unwrap_or_default()),
        },
        api_key_header: lookup("API_KEY_HEADER"),
        api_key_value: lookup("API_KEY"),
    })
}
