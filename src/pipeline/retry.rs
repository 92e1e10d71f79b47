use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Bounded retry with linearly increasing backoff: the wait before attempt
/// `n` (1-based) is `n * step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, step: Duration::from_secs(5) }
    }
}

impl RetryPolicy {
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.step * attempt
    }

    /// Run `op` up to `attempts` times, sleeping before each attempt.
    /// Returns the last error once the cap is reached.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            tokio::time::sleep(self.delay_before(attempt)).await;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.attempts => {
                    warn!("{label}: attempt {attempt}/{} failed, giving up: {e}", self.attempts);
                    return Err(e);
                }
                Err(e) => {
                    warn!("{label}: attempt {attempt}/{} failed: {e}", self.attempts);
                    attempt += 1;
                }
            }
        }
    }
}
