//! Bounded retry with exponential backoff.
//!
//! A [`RetryPolicy`] is a plain value: how many attempts, how long to wait
//! between them and which failures deserve another attempt. It owns no
//! state, so the same policy can drive any number of concurrent lookups.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

pub struct RetryPolicy<E> {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    /// Relative jitter applied to each delay, `0.0` disables it
    jitter: f64,
    is_retriable: RetryPredicate<E>,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            jitter: self.jitter,
            is_retriable: Arc::clone(&self.is_retriable),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

impl<E: fmt::Display> RetryPolicy<E> {
    /// `max_attempts` counts the first attempt; zero is treated as one.
    pub fn new<P>(max_attempts: u32, base_delay: Duration, is_retriable: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: crate::env::lookup::MAX_BACKOFF,
            jitter: 0.0,
            is_retriable: Arc::new(is_retriable),
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_retriable(&self, error: &E) -> bool {
        (self.is_retriable)(error)
    }

    /// Wait before the attempt following attempt number `attempt`
    /// (1-based): `base * 2^attempt`, capped at the maximum delay.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);

        if self.jitter == 0.0 {
            return delay;
        }

        let jitter = (rand::random::<f64>() - 0.5) * 2.0 * self.jitter;
        Duration::from_millis(((delay.as_millis() as f64) * (1.0 + jitter)) as u64)
            .min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails with a non-retriable
    /// error, or the attempts are exhausted. The last error is returned.
    pub async fn execute<T, F>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> BoxFuture<'static, Result<T, E>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !self.is_retriable(&error) {
                debug!("Attempt {} failed with a definitive error: {}", attempt, error);
                return Err(error);
            }

            if attempt >= self.max_attempts {
                warn!(
                    "Giving up after {} attempt(s), last error: {}",
                    attempt, error
                );
                return Err(error);
            }

            let delay = self.delay_for(attempt);
            warn!(
                "Attempt {}/{} failed: {}. Retrying in {:?}",
                attempt, self.max_attempts, error, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
