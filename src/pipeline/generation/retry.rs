use std::future::Future;
use std::time::Duration;

use crate::pipeline::summary::SummaryError;

/// Linear-backoff retry for quota rejections at the generation boundary.
///
/// After the n-th failed attempt (0-based) the policy waits
/// `(n + 1) × backoff_unit`. Errors other than quota rejections are
/// returned immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn with_unit(backoff_unit: Duration) -> Self {
        Self {
            backoff_unit,
            ..Self::default()
        }
    }

    /// Wait before the attempt following failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt.saturating_add(1))
    }

    /// Run `op` until it succeeds, fails with a non-quota error, or the
    /// attempts are exhausted. Exhaustion yields `QuotaExceeded`.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T, SummaryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SummaryError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_quota() => {
                    if attempt + 1 >= attempts {
                        tracing::error!(operation, attempts, "LLM quota exhausted");
                        return Err(SummaryError::QuotaExceeded(format!(
                            "{operation}: quota still exhausted after {attempts} attempts"
                        )));
                    }
                    let wait = self.backoff(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        wait_secs = wait.as_secs(),
                        "LLM quota hit, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
