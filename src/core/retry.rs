//! Exponential backoff for transient failures
//!
//! Only errors for which
//! [`NosqlError::is_retryable`](crate::domain::NosqlError::is_retryable) holds
//! are retried; everything else is returned after the first attempt.

use crate::adapters::database::Operation;
use crate::config::RetryConfig;
use crate::domain::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Run `attempt` until it succeeds, fails permanently or retries run out
///
/// # Arguments
///
/// * `config` - Retry limits and backoff shape
/// * `operation` - Operation name for log records
/// * `attempt` - Issues one request per call
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation: Operation,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retry_count = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && retry_count < config.max_retries => {
                tracing::warn!(
                    operation = %operation,
                    retry_count = retry_count + 1,
                    max_retries = config.max_retries,
                    delay_ms = delay_ms,
                    error = %e,
                    "Transient failure, retrying after delay"
                );

                sleep(Duration::from_millis(delay_ms)).await;

                retry_count += 1;
                delay_ms = next_delay(config, delay_ms);
            }
            Err(e) => {
                if retry_count > 0 {
                    tracing::error!(
                        operation = %operation,
                        retry_count = retry_count,
                        error = %e,
                        "Giving up after retries"
                    );
                }
                return Err(e);
            }
        }
    }
}

fn next_delay(config: &RetryConfig, current_ms: u64) -> u64 {
    let next = (current_ms as f64 * config.backoff_multiplier).round();
    if next >= config.max_delay_ms as f64 {
        config.max_delay_ms
    } else {
        next as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CosmosDbError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 10,
            max_delay_ms: 40,
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn test_next_delay_is_capped() {
        let cfg = config(3);
        assert_eq!(next_delay(&cfg, 10), 20);
        assert_eq!(next_delay(&cfg, 20), 40);
        assert_eq!(next_delay(&cfg, 40), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_then_success() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(&config(3), Operation::ReadItem, || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(CosmosDbError::from_status(429, "throttled").into())
            } else {
                Ok("ok")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = with_retry(&config(2), Operation::CreateItem, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CosmosDbError::from_status(503, "unavailable").into())
        })
        .await;

        assert_eq!(
            result.unwrap_err().code(),
            Some(crate::domain::ErrorCode::ServiceUnavailable)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = with_retry(&config(3), Operation::ReadItem, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CosmosDbError::from_status(500, "boom").into())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
