//! Bounded retry with linear backoff.
//!
//! [`RetryPolicy`] runs a caller-supplied operation that performs exactly one
//! attempt of some fallible call. It knows nothing about what the operation
//! does; providers wrap their HTTP requests in it.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Default number of attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default timeout for a single attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Retry configuration.
///
/// The delay before attempt `i` (1-indexed, `i > 1`) is `retry_delay * (i - 1)`,
/// so with the defaults attempt 2 waits 1s and attempt 3 waits 2s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_retries: u32,

    /// Base delay, multiplied by the number of failed attempts so far.
    pub retry_delay: Duration,

    /// Timeout for a single attempt. Enforced by the operation itself,
    /// typically through the HTTP client configuration.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit values.
    pub fn new(max_retries: u32, retry_delay: Duration, timeout: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
            timeout,
        }
    }

    /// Number of attempts actually made. Zero is treated as one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to wait before the given 1-indexed attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt.saturating_sub(1)
    }

    /// Run `op` until it succeeds or the attempts are exhausted.
    ///
    /// Every failure is retried. The error of the final attempt is returned
    /// unchanged.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_if(op, |_| true).await
    }

    /// Like [`run`](Self::run), but stops early when `retryable` rejects an error.
    pub async fn run_if<T, E, F, Fut, P>(&self, mut op: F, mut retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
    {
        let attempts = self.attempts();
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= attempts || !retryable(&err) => return Err(err),
                Err(_) => {
                    attempt += 1;
                    let delay = self.delay_before(attempt);
                    debug!(
                        "Attempt {} of {} failed, retrying in {:?}",
                        attempt - 1,
                        attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
