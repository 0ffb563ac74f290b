//! Retry logic for provider calls
//!
//! A [`RetryPolicy`] re-runs an async operation while it fails with a
//! transient [`LLMError`], sleeping between attempts according to its
//! [`Backoff`].

use crate::{LLMError, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How long to wait before the next attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// `step × attempt`
    Linear { step: Duration },
    /// `initial × multiplier^(attempt - 1)`
    Exponential { initial: Duration, multiplier: f64 },
}

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay schedule between attempts
    pub backoff: Backoff,

    /// Maximum delay between attempts
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear {
                step: Duration::from_secs(5),
            },
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Linear policy: wait `step × attempt` between attempts
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Linear { step },
            ..Self::default()
        }
    }

    /// Exponential policy: wait `initial × multiplier^(attempt - 1)`
    pub fn exponential(
        max_attempts: u32,
        initial: Duration,
        multiplier: f64,
        max_backoff: Duration,
    ) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential {
                initial,
                multiplier,
            },
            max_backoff,
        }
    }

    /// Create a policy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Linear {
                step: Duration::ZERO,
            },
            max_backoff: Duration::ZERO,
        }
    }

    /// Create a policy with fast retries (for testing)
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear {
                step: Duration::from_millis(1),
            },
            max_backoff: Duration::from_millis(10),
        }
    }

    /// Calculate backoff duration before the given attempt
    fn backoff_duration(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let backoff = match self.backoff {
            Backoff::Linear { step } => step.saturating_mul(attempt),
            Backoff::Exponential {
                initial,
                multiplier,
            } => {
                let ms = initial.as_millis() as f64 * multiplier.powi((attempt - 1) as i32);
                Duration::from_millis(ms as u64)
            }
        };

        backoff.min(self.max_backoff)
    }

    /// Execute an async operation with retry logic
    ///
    /// Non-transient errors are returned immediately. When every attempt
    /// fails, the last error is returned.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            debug!(
                "Attempt {}/{} for operation: {}",
                attempt + 1,
                attempts,
                operation_name
            );

            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(
                            "Operation '{}' succeeded after {} retries",
                            operation_name, attempt
                        );
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !e.is_transient() {
                        debug!("Operation '{}' failed with non-retryable error", operation_name);
                        return Err(e);
                    }

                    if attempt + 1 < attempts {
                        let backoff = self.backoff_duration(attempt + 1);
                        warn!(
                            "Operation '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                            operation_name,
                            attempt + 1,
                            attempts,
                            e,
                            backoff
                        );
                        sleep(backoff).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| LLMError::ProviderError("Retry failed with no error".to_string()));

        warn!(
            "Operation '{}' failed after {} attempts: {}",
            operation_name, attempts, error
        );

        Err(error)
    }
}
