use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::environments::Environment;
use crate::config::proc_loader::file_to_config;
use crate::config::settings::HarnessConfig;
use crate::utils::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

/// `HARNESS_CONFIG` or `harness.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned())
}

/// Select the environment, load its `.env.<name>` file, then read and resolve `config_path`.
pub async fn run(config_path: &str) -> Result<HarnessConfig> {
    let environment = Environment::from_env();
    environment.load_env_file();
    info!("loading {} for environment {}", config_path, environment.as_str());

    let path = Path::new(config_path);
    file_to_config(path, environment)
        .await
        .with_context(|| format!("invalid harness config {}", path.display()))
}
