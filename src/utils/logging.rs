use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::{HarnessConfig, LogFormat, LoggingConfig};

/// Resolve the logging config (`LOG_LEVEL` / `LOG_FORMAT` win over the file) and install it.
pub fn run(config: &HarnessConfig) {
    let logging_config = resolve(
        config.logging.as_ref(),
        std::env::var("LOG_LEVEL").ok(),
        LogFormat::from_env(),
    );
    init_logging(&logging_config);
}

fn resolve(
    configured: Option<&LoggingConfig>,
    level: Option<String>,
    format: Option<LogFormat>,
) -> LoggingConfig {
    let base = configured.cloned().unwrap_or_default();
    LoggingConfig::new(level.unwrap_or(base.level), format.unwrap_or(base.format))
}

/// Initialize tracing with the desired config. A subscriber installed earlier is kept.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true)
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_test_writer();

            let _ = registry.with(layer).try_init();
        }
    };
}
