/// Progress reporting and cancellation — the two channels the coordinator
/// shares with its host.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A single-shot cancellation signal. Cheap to clone; every clone observes
/// the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A snapshot of scan progress, emitted only through the coordinator.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Always in `[0, 100]`; non-decreasing across a successful scan except
    /// when reset to 0 on error or cancellation.
    pub percent: u8,
    pub files_processed: u64,
    pub elapsed: Duration,
    pub current_path: Option<String>,
    pub message: Option<&'static str>,
}

impl ScanProgress {
    pub fn new(percent: u8, files_processed: u64, elapsed: Duration) -> Self {
        Self {
            percent,
            files_processed,
            elapsed,
            current_path: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.current_path = Some(path.into());
        self
    }
}

/// The host supplies a callback matching this signature. It is invoked only
/// from the coordinator's own task context, up to 10 Hz, and must not
/// block — hosts that need to marshal to a UI thread do so themselves.
pub type ProgressCallback<'a> = dyn FnMut(&ScanProgress) + 'a;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_observed_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
