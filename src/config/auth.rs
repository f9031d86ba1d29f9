use serde::Deserialize;

/// Auth kinds the configuration can name. Only bearer, apikey and oauth2 have a token flow.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Bearer,
    ApiKey,
    OAuth2,
    Basic,
    None,
}

impl AuthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthKind::Bearer => "bearer",
            AuthKind::ApiKey => "apikey",
            AuthKind::OAuth2 => "oauth2",
            AuthKind::Basic => "basic",
            AuthKind::None => "none",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AuthCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Auth descriptor of the single auth pattern.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub kind: AuthKind,
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub credentials: AuthCredentials,
    pub api_key_header: Option<String>,
    pub api_key_value: Option<String>,
}

impl AuthConfig {
    pub fn bearer(
        token_endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            kind: AuthKind::Bearer,
            token_endpoint: Some(token_endpoint.into()),
            credentials: AuthCredentials {
                username: Some(username.into()),
                password: Some(password.into()),
                ..AuthCredentials::default()
            },
            api_key_header: None,
            api_key_value: None,
        }
    }

    pub fn api_key(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::ApiKey,
            token_endpoint: None,
            credentials: AuthCredentials::default(),
            api_key_header: Some(header.into()),
            api_key_value: Some(value.into()),
        }
    }

    pub fn oauth2(
        token_endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            kind: AuthKind::OAuth2,
            token_endpoint: Some(token_endpoint.into()),
            credentials: AuthCredentials {
                client_id: Some(client_id.into()),
                client_secret: Some(client_secret.into()),
                ..AuthCredentials::default()
            },
            api_key_header: None,
            api_key_value: None,
        }
    }

    pub fn none() -> Self {
        Self {
            kind: AuthKind::None,
            token_endpoint: None,
            credentials: AuthCredentials::default(),
            api_key_header: None,
            api_key_value: None,
        }
    }
}

/// Credential material of one token type in the multiple auth pattern.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TokenTypeCredential {
    /// relative to the default service or absolute
    pub endpoint: Option<String>,
    pub client_id: Option<String>,
    #[serde(default)]
    pub secret: String,
}

impl TokenTypeCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            endpoint: None,
            client_id: None,
            secret: secret.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
