use crate::config::auth::{AuthConfig, AuthKind};
use crate::config::template::TemplateConfig;
use crate::utils::constants::{
    DEFAULT_API_KEY_HEADER, DEFAULT_BEARER_ENDPOINT, DEFAULT_OAUTH2_ENDPOINT,
    DEFAULT_TOKEN_TYPE_ENDPOINT,
};

pub fn initiate_default_values(mut template: TemplateConfig) -> TemplateConfig {
    if let Some(auth) = &mut template.auth {
        apply_auth_defaults(auth);
    }

    // every declared token type gets a credential slot with an endpoint
    for token_type in &template.token_types {
        let credential = template
            .token_credentials
            .entry(token_type.to_owned())
            .or_default();
        if credential.endpoint.is_none() {
            credential.endpoint = Some(DEFAULT_TOKEN_TYPE_ENDPOINT.to_owned());
        }
    }

    template
}

pub fn apply_auth_defaults(auth: &mut AuthConfig) {
    // propogate token endpoint per auth kind
    if auth.token_endpoint.is_none() {
        auth.token_endpoint = match auth.kind {
            AuthKind::Bearer => Some(DEFAULT_BEARER_ENDPOINT.to_owned()),
            AuthKind::OAuth2 => Some(DEFAULT_OAUTH2_ENDPOINT.to_owned()),
            _ => None,
        };
    }
    if auth.kind == AuthKind::ApiKey && auth.api_key_header.is_none() {
        auth.api_key_header = Some(DEFAULT_API_KEY_HEADER.to_owned());
    }
}
