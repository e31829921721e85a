use backoff::backoff::Backoff;
use backoff::exponential::ExponentialBackoff;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::Result;

/// Transport-level retry with exponential backoff and jitter.
///
/// Only the HTTP exchange itself is retried; a response that arrives but
/// fails shape validation is surfaced immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn from_config(fetch: &FetchConfig) -> Self {
        Self::new(
            fetch.max_retries,
            Duration::from_millis(fetch.retry_base_delay_ms),
        )
    }

    fn backoff(&self) -> ExponentialBackoff<backoff::SystemClock> {
        ExponentialBackoff {
            current_interval: self.base_delay,
            initial_interval: self.base_delay,
            randomization_factor: 0.5,
            multiplier: 2.0,
            max_interval: Duration::from_secs(60),
            max_elapsed_time: Some(Duration::from_secs(self.max_attempts as u64 * 60)),
            ..ExponentialBackoff::default()
        }
    }

    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut backoff = self.backoff();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match operation().await {
                Ok(result) => {
                    if attempts > 1 {
                        debug!(
                            operation = operation_name,
                            attempts, "Operation succeeded after retries"
                        );
                    }
                    return Ok(result);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempts >= self.max_attempts {
                        warn!(
                            operation = operation_name,
                            attempts,
                            error = %e,
                            "Operation failed after max retries"
                        );
                        return Err(e);
                    }

                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                operation = operation_name,
                                attempt = attempts,
                                retry_after_ms = duration.as_millis() as u64,
                                error = %e,
                                "Operation failed, retrying"
                            );
                            tokio::time::sleep(duration).await;
                        }
                        None => {
                            warn!(
                                operation = operation_name,
                                attempts,
                                error = %e,
                                "Backoff exhausted"
                            );
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}
