use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::RetryConfig;
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct RetryStrategy {
    max_attempts: u32,
    initial_interval: Duration,
    max_interval: Duration,
    multiplier: f64,
    max_elapsed: Duration,
}

impl RetryStrategy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            max_elapsed: Duration::from_secs(300), // 5 minutes max
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries).with_intervals(
            Duration::from_millis(config.initial_interval_ms),
            Duration::from_millis(config.max_interval_ms),
        )
    }

    /// A strategy that makes exactly one attempt
    pub fn none() -> Self {
        Self::new(1)
    }

    pub fn with_intervals(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_interval = initial;
        self.max_interval = max.max(initial);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(Some(self.max_elapsed))
            .build()
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    pub async fn retry<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut backoff = self.create_backoff();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() || !self.should_retry(attempt) {
                return Err(error);
            }
            let Some(delay) = backoff.next_backoff() else {
                return Err(error);
            };

            warn!(
                operation = operation_name,
                attempt,
                max_attempts = self.max_attempts,
                error = %error,
                backoff_ms = delay.as_millis() as u64,
                "Retryable failure, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
