//! Shared constants and defaults

pub const DEFAULT_CONFIG_PATH: &str = "harness.yaml";
pub const CONFIG_PATH_ENV: &str = "HARNESS_CONFIG";
pub const ENVIRONMENT_ENV: &str = "TEST_ENV";

pub const DEFAULT_SERVICE: &str = "main";

// Token endpoints per auth kind
pub const DEFAULT_BEARER_ENDPOINT: &str = "/api/auth/login";
pub const DEFAULT_OAUTH2_ENDPOINT: &str = "/oauth/token";
pub const DEFAULT_TOKEN_TYPE_ENDPOINT: &str = "/auth/token";

pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";

/// cache key used by the single auth pattern
pub const SINGLE_TOKEN_KEY: &str = "__single__";
