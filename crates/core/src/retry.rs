//! Exponential backoff retry utility
//!
//! Wraps a single async operation and retries it on transient failure with
//! exponentially growing delays and optional jitter. The caller decides which
//! errors are transient through a predicate, so the same mechanism serves
//! provider rate limiting (HTTP 429) and ordinary network flakiness alike.
//!
//! # Examples
//!
//! ```
//! use media_catalog_core::retry::{retry_with_backoff, RetryPolicy};
//!
//! async fn fetch_page() -> Result<String, std::io::Error> {
//!     Ok("payload".to_string())
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let result = retry_with_backoff(
//!     || async { fetch_page().await },
//!     RetryPolicy::rate_limit(),
//!     |err: &std::io::Error| err.kind() == std::io::ErrorKind::ConnectionRefused,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy configuration for exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 means no retries, only the initial attempt)
    pub max_retries: u32,

    /// Base delay in milliseconds for the first retry
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds to cap exponential growth
    pub max_delay_ms: u64,

    /// Whether to add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    /// Creates a general-purpose retry policy
    ///
    /// - max_retries: 3
    /// - base_delay_ms: 100
    /// - max_delay_ms: 5000
    /// - jitter: true
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with custom parameters
    ///
    /// # Examples
    ///
    /// ```
    /// use media_catalog_core::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(5, 200, 10000, true);
    /// assert_eq!(policy.max_retries, 5);
    /// assert_eq!(policy.base_delay_ms, 200);
    /// ```
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64, jitter: bool) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
            jitter,
        }
    }

    /// Creates the retry policy used for rate-limited provider calls
    ///
    /// - max_retries: 2
    /// - base_delay_ms: 2000
    /// - max_delay_ms: 15000
    /// - jitter: true
    ///
    /// Three attempts in total: the initial call, a retry after roughly two
    /// seconds, and a final retry after roughly four. Providers that answer
    /// 429 typically clear within that envelope; anything longer is treated
    /// as a hard failure by the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use media_catalog_core::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::rate_limit();
    /// assert_eq!(policy.max_retries, 2);
    /// assert_eq!(policy.base_delay_ms, 2000);
    /// ```
    pub fn rate_limit() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 2000,
            max_delay_ms: 15000,
            jitter: true,
        }
    }

    /// Calculates the delay for a given retry attempt
    ///
    /// Exponential backoff: delay = min(base * 2^attempt, max_delay), plus
    /// random jitter of up to 30% when enabled.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential_delay = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt));

        let capped_delay = exponential_delay.min(self.max_delay_ms);

        let final_delay = if self.jitter {
            let jitter_range = (capped_delay as f64 * 0.3) as u64;
            let jitter = if jitter_range > 0 {
                // Clock-derived pseudo-randomness is enough to de-synchronize
                // callers; this does not need cryptographic quality.
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .subsec_nanos() as u64;
                nanos % (jitter_range + 1)
            } else {
                0
            };
            capped_delay.saturating_add(jitter)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay)
    }
}

/// Retries an async operation with exponential backoff
///
/// Executes the operation and retries it while the predicate classifies the
/// error as retryable and the attempt bound has not been reached. The first
/// non-retryable error, or the last error once attempts are exhausted, is
/// returned to the caller unchanged.
///
/// # Arguments
///
/// * `operation` - Async closure producing the future to execute
/// * `policy` - Retry policy configuration
/// * `is_retryable` - Predicate deciding whether an error warrants a retry
///
/// # Examples
///
/// ```
/// use media_catalog_core::retry::{retry_with_backoff, RetryPolicy};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut attempt = 0;
/// let result = retry_with_backoff(
///     || {
///         attempt += 1;
///         let current = attempt;
///         async move {
///             if current < 3 {
///                 Err("too many requests")
///             } else {
///                 Ok("payload")
///             }
///         }
///     },
///     RetryPolicy::default(),
///     |_| true,
/// )
/// .await;
///
/// assert!(result.is_ok());
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    policy: RetryPolicy,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                tracing::debug!(
                    attempt = attempt,
                    total_attempts = attempt + 1,
                    "Operation succeeded"
                );
                return Ok(result);
            }
            Err(error) => {
                if attempt >= policy.max_retries {
                    tracing::warn!(
                        attempt = attempt,
                        max_retries = policy.max_retries,
                        "Retry attempts exhausted"
                    );
                    return Err(error);
                }

                if !is_retryable(&error) {
                    tracing::debug!(attempt = attempt, "Error is not retryable, failing");
                    return Err(error);
                }

                let delay = policy.calculate_delay(attempt);
                tracing::debug!(
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    max_retries = policy.max_retries,
                    "Retrying after delay"
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaCatalogError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay_ms, 100);
        assert_eq!(policy.max_delay_ms, 5000);
        assert!(policy.jitter);
    }

    #[test]
    fn test_retry_policy_rate_limit() {
        let policy = RetryPolicy::rate_limit();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.base_delay_ms, 2000);
        assert_eq!(policy.max_delay_ms, 15000);
        assert!(policy.jitter);
    }

    #[test]
    fn test_retry_policy_new() {
        let policy = RetryPolicy::new(10, 200, 8000, false);
        assert_eq!(policy.max_retries, 10);
        assert_eq!(policy.base_delay_ms, 200);
        assert_eq!(policy.max_delay_ms, 8000);
        assert!(!policy.jitter);
    }

    #[test]
    fn test_calculate_delay_exponential_progression() {
        let policy = RetryPolicy::new(2, 2000, 60000, false);

        // Rate-limit shape: 2000, 4000, 8000
        assert_eq!(policy.calculate_delay(0).as_millis(), 2000);
        assert_eq!(policy.calculate_delay(1).as_millis(), 4000);
        assert_eq!(policy.calculate_delay(2).as_millis(), 8000);
    }

    #[test]
    fn test_calculate_delay_max_cap() {
        let policy = RetryPolicy::new(10, 2000, 15000, false);

        // 2000 * 2^5 = 64000, capped at 15000
        assert_eq!(policy.calculate_delay(5).as_millis(), 15000);
        assert_eq!(policy.calculate_delay(10).as_millis(), 15000);
    }

    #[test]
    fn test_calculate_delay_jitter_bounds() {
        let policy = RetryPolicy::new(5, 1000, 10000, true);

        // With jitter, delay(0) lands in [1000, 1300]
        for _ in 0..10 {
            let delay = policy.calculate_delay(0).as_millis() as u64;
            assert!(
                (1000..=1300).contains(&delay),
                "delay {} out of bounds",
                delay
            );
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<&str, MediaCatalogError> = retry_with_backoff(
            || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok("done") }
            },
            RetryPolicy::new(2, 10, 100, false),
            |err: &MediaCatalogError| err.is_retryable(),
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_succeeds_on_third_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        // Two transient failures, then success: the rate-limit attempt shape.
        let result: Result<&str, MediaCatalogError> = retry_with_backoff(
            || {
                let n = calls_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(MediaCatalogError::NetworkError {
                            message: format!("too many requests on attempt {}", n + 1),
                            source: None,
                        })
                    } else {
                        Ok("payload")
                    }
                }
            },
            RetryPolicy::new(2, 10, 100, false),
            |err: &MediaCatalogError| err.is_retryable(),
        )
        .await;

        assert_eq!(result.unwrap(), "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), MediaCatalogError> = retry_with_backoff(
            || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(MediaCatalogError::NetworkError {
                        message: "persistent failure".to_string(),
                        source: None,
                    })
                }
            },
            RetryPolicy::new(2, 10, 100, false),
            |err: &MediaCatalogError| err.is_retryable(),
        )
        .await;

        assert!(result.is_err());
        // Initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), MediaCatalogError> = retry_with_backoff(
            || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(MediaCatalogError::ValidationError {
                        message: "malformed response body".to_string(),
                        field: None,
                    })
                }
            },
            RetryPolicy::new(5, 10, 100, false),
            |err: &MediaCatalogError| err.is_retryable(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), MediaCatalogError> = retry_with_backoff(
            || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(MediaCatalogError::NetworkError {
                        message: "down".to_string(),
                        source: None,
                    })
                }
            },
            RetryPolicy::new(0, 10, 100, false),
            |err: &MediaCatalogError| err.is_retryable(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
