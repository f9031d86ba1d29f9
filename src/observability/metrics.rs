use std::sync::Arc;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Option<Arc<Metrics>>> = OnceCell::const_new();

/// Initializes the process-wide metrics on first use.
/// None when the registry could not be built; callers skip recording.
pub async fn get_metrics() -> Option<&'static Arc<Metrics>> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
                .inspect_err(|e| warn!("metrics disabled: {}", e))
                .ok()
        })
        .await
        .as_ref()
}

/// Metrics if already initialized, for synchronous call sites.
pub fn try_metrics() -> Option<&'static Arc<Metrics>> {
    METRICS_INSTANCE.get().and_then(Option::as_ref)
}

/// Prometheus text exposition of everything recorded so far.
pub async fn render_metrics() -> anyhow::Result<String> {
    let Some(metrics) = get_metrics().await else {
        return Ok(String::new());
    };
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_fetch_requests: IntCounterVec,
    pub token_fetch_failures: IntCounterVec,
    pub token_fetch_duration: HistogramVec,
    pub token_cache_hits: IntCounterVec,

    // Transport metrics
    pub http_requests: IntCounterVec,
    pub http_request_failures: IntCounterVec,
    pub http_request_duration: HistogramVec,

    // Validation
    pub schema_validation_failures: IntCounter,
    pub config_validation_errors: IntCounter,
}

impl Metrics {
    fn new() -> prometheus::Result<Arc<Self>> {
        let registry = Registry::new_custom(Some("apiharness".into()), None)?;

        let metrics = Arc::new(Self {
            token_fetch_requests: IntCounterVec::new(Opts::new("token_fetch_requests_total", "Token fetch attempts by token type"), &["token_type", "auth_kind"])?,
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Token fetch failures by reason"), &["token_type", "reason"])?,
            token_fetch_duration: HistogramVec::new(HistogramOpts::new("token_fetch_duration_seconds", "Token fetch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["token_type"])?,
            token_cache_hits: IntCounterVec::new(Opts::new("token_cache_hits_total", "Tokens served from cache"), &["token_type"])?,

            http_requests: IntCounterVec::new(Opts::new("http_requests_total", "Requests sent by method and status"), &["method", "status"])?,
            http_request_failures: IntCounterVec::new(Opts::new("http_request_failures_total", "Requests without a response"), &["method", "reason"])?,
            http_request_duration: HistogramVec::new(HistogramOpts::new("http_request_duration_seconds", "Request duration seconds including retries").buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]), &["method"])?,

            schema_validation_failures: IntCounter::new("schema_validation_failures_total", "Payloads rejected by schema validation")?,
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors while loading configuration")?,

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone()))?;
        reg.register(Box::new(metrics.token_fetch_failures.clone()))?;
        reg.register(Box::new(metrics.token_fetch_duration.clone()))?;
        reg.register(Box::new(metrics.token_cache_hits.clone()))?;
        reg.register(Box::new(metrics.http_requests.clone()))?;
        reg.register(Box::new(metrics.http_request_failures.clone()))?;
        reg.register(Box::new(metrics.http_request_duration.clone()))?;
        reg.register(Box::new(metrics.schema_validation_failures.clone()))?;
        reg.register(Box::new(metrics.config_validation_errors.clone()))?;

        Ok(metrics)
    }
}
