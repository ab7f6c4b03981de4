//! Cooperative cancellation for long multiplications.
//!
//! Tokens are polled only at coarse checkpoints (Strassen frame entry, tile
//! rows of the direct strategies), never per element.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::MatError;

/// Cancellation token with an optional absolute deadline.
///
/// # Example
/// ```
/// use matcalc_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(token.check_cancelled().is_ok());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

impl CancellationToken {
    /// Create a new cancellation token without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            timeout: None,
        }
    }

    /// Create a token that also expires `timeout` from now.
    ///
    /// A timeout too far in the future to be represented sets no deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
            timeout: Some(timeout),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested or the deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.is_expired()
    }

    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Check for cancellation, returning an error if cancelled or expired.
    pub fn check_cancelled(&self) -> Result<(), MatError> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(MatError::Cancelled);
        }
        if self.is_expired() {
            let limit = self.timeout.unwrap_or_default();
            return Err(MatError::Timeout(format!("{limit:?}")));
        }
        Ok(())
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_token_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check_cancelled().is_ok());
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.check_cancelled(), Err(MatError::Cancelled));
    }

    #[test]
    fn zero_timeout_expires_immediately() {
        let token = CancellationToken::with_timeout(Duration::ZERO);
        assert!(token.is_cancelled());
        assert!(matches!(token.check_cancelled(), Err(MatError::Timeout(_))));
    }

    #[test]
    fn long_timeout_is_not_expired() {
        let token = CancellationToken::with_timeout(Duration::from_secs(3600));
        assert!(token.check_cancelled().is_ok());
    }

    #[test]
    fn unrepresentable_timeout_sets_no_deadline() {
        let token = CancellationToken::with_timeout(Duration::MAX);
        assert!(!token.is_cancelled());
        assert!(token.check_cancelled().is_ok());
        token.cancel();
        assert_eq!(token.check_cancelled(), Err(MatError::Cancelled));
    }

    #[test]
    fn manual_cancel_wins_over_timeout() {
        let token = CancellationToken::with_timeout(Duration::ZERO);
        token.cancel();
        assert_eq!(token.check_cancelled(), Err(MatError::Cancelled));
    }
}
