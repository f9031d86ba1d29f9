use std::future::Future;

use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::config::settings::{HarnessConfig, RetryConfig};
use crate::errors::HarnessError;

#[derive(Debug, Clone)]
pub struct RetrySettings {
    /// total attempts, first one included
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetrySettings {
    pub fn new(retries: u32, retry: &RetryConfig) -> Self {
        Self {
            attempts: retries.saturating_add(1),
            base_delay_ms: retry.base_delay_ms,
            max_delay_ms: retry.max_delay_ms,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.retry_attempts, &config.retry)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error
    /// or the attempts are used up. Delay doubles up to `max_delay_ms`.
    pub async fn run_with_retry<F, Fut, T>(&self, mut operation: F) -> Result<T, HarnessError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, HarnessError>>,
    {
        let mut delay = self.base_delay_ms;
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    warn!("Attempt {attempt}/{} failed: {e}", self.attempts);
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(self.max_delay_ms);
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        error!("all {attempt} attempts failed: {e}");
                    }
                    return Err(e);
                }
            }
        }
    }
}
