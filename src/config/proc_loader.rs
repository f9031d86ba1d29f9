use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, error};

use crate::config::environments::{self, EnvLookup, Environment};
use crate::config::proc_initiator::initiate_default_values;
use crate::config::proc_validator;
use crate::config::settings::HarnessConfig;
use crate::config::template::TemplateConfig;
use crate::errors::HarnessError;
use crate::observability::metrics::get_metrics;

/// Load, resolve and validate the harness file for `environment`.
pub async fn file_to_config(path: &Path, environment: Environment) -> Result<HarnessConfig> {
    let content = tokio::fs::read_to_string(path).await?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded, environment, &environments::process_env).await
}

pub async fn parse_config(
    content: &str,
    environment: Environment,
    lookup: EnvLookup<'_>,
) -> Result<HarnessConfig> {
    let metrics = get_metrics().await;
    let template: TemplateConfig = serde_yaml::from_str(content).inspect_err(|e| {
        error!("parse config error: {}", e);
        if let Some(metrics) = metrics {
            metrics.config_validation_errors.inc();
        }
    })?;

    let template = initiate_default_values(template);
    let config = environments::resolve(&template, environment, lookup)?;

    debug!("validation config ...");
    proc_validator::validate_harness_config(&config).map_err(|errors| {
        if let Some(metrics) = metrics {
            metrics.config_validation_errors.inc_by(errors.len() as u64);
        }
        HarnessError::Configuration(errors.join("; "))
    })?;

    Ok(config)
}

/// Expand `${VAR}` and `${VAR:default}` from the process environment.
pub fn expand_env_vars(input: &str) -> String {
    static ENV_VAR: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = ENV_VAR
        .get_or_init(|| Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}").ok())
        .as_ref()
    else {
        return input.to_owned();
    };
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
