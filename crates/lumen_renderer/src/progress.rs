//! Progress reporting and cooperative cancellation.
//!
//! Both are touched once per finished row, never per pixel.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Row counter a caller can poll from another thread while a render runs.
#[derive(Debug, Default)]
pub struct Progress {
    rows_completed: AtomicU32,
    total_rows: AtomicU32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter for a render of `total_rows` rows.
    pub(crate) fn start(&self, total_rows: u32) {
        self.rows_completed.store(0, Ordering::Relaxed);
        self.total_rows.store(total_rows, Ordering::Relaxed);
    }

    pub(crate) fn row_done(&self) {
        self.rows_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rows_completed(&self) -> u32 {
        self.rows_completed.load(Ordering::Relaxed)
    }

    pub fn total_rows(&self) -> u32 {
        self.total_rows.load(Ordering::Relaxed)
    }

    /// Scanlines remaining.
    pub fn rows_remaining(&self) -> u32 {
        self.total_rows().saturating_sub(self.rows_completed())
    }

    /// Completed fraction in [0, 1]; 0 before a render starts.
    pub fn fraction(&self) -> f64 {
        match self.total_rows() {
            0 => 0.0,
            total => (self.rows_completed() as f64 / total as f64).min(1.0),
        }
    }

    pub fn is_finished(&self) -> bool {
        let total = self.total_rows();
        total > 0 && self.rows_completed() >= total
    }
}

/// Shared flag that stops a render from starting any further rows.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_rows() {
        let progress = Progress::new();
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_finished());

        progress.start(4);
        assert_eq!(progress.rows_remaining(), 4);
        progress.row_done();
        progress.row_done();
        assert_eq!(progress.rows_completed(), 2);
        assert_eq!(progress.rows_remaining(), 2);
        assert!((progress.fraction() - 0.5).abs() < 1e-12);

        progress.row_done();
        progress.row_done();
        assert!(progress.is_finished());

        progress.start(2);
        assert_eq!(progress.rows_completed(), 0);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
