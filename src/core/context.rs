//! Per-call deadline and cancellation
//!
//! Every remote operation takes a [`RequestContext`]. The deadline covers the
//! whole call, retries included.

use crate::domain::{NosqlError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Deadline and cancellation signal for one logical call
///
/// # Example
///
/// ```
/// use cosmos_nosql::core::RequestContext;
/// use std::time::Duration;
///
/// let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
/// let ctx = RequestContext::with_timeout(Duration::from_secs(30)).with_cancellation(cancel_rx);
/// assert!(!ctx.is_cancelled());
///
/// cancel_tx.send(true).unwrap();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl RequestContext {
    /// No deadline, never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_at(Instant::now() + timeout)
    }

    /// Deadline at an absolute instant
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline_at(deadline)
    }

    /// Attach a cancellation signal; `true` on the channel cancels
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` without one
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether cancellation has been signalled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Drive `fut` to completion within this context
    ///
    /// Fails with [`NosqlError::Cancelled`] before polling `fut` if the
    /// context is already cancelled, with [`NosqlError::Timeout`] when the
    /// deadline passes first.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(NosqlError::Cancelled(format!(
                "{operation} cancelled before it was sent"
            )));
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        let mut cancel = self.cancel.clone();
        let cancelled = async move {
            match cancel.as_mut() {
                Some(rx) => {
                    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
                    // A dropped sender can no longer cancel
                    if closed {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = fut => result,
            _ = deadline => Err(NosqlError::Timeout(format!(
                "{operation} did not complete before the deadline"
            ))),
            _ = cancelled => Err(NosqlError::Cancelled(format!(
                "{operation} cancelled"
            ))),
        }
    }
}
