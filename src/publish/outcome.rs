//! Batch-wide pass/fail accumulation

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Overall success of a publish batch
///
/// Starts successful and can only move to failed. Workers call
/// [`record_failure`](Self::record_failure) from any thread.
#[derive(Debug)]
pub struct OutcomeAggregator {
  success: AtomicBool,
  failures: AtomicUsize,
}

impl OutcomeAggregator {
  pub fn new() -> Self {
    Self {
      success: AtomicBool::new(true),
      failures: AtomicUsize::new(0),
    }
  }

  pub fn record_failure(&self) {
    self.failures.fetch_add(1, Ordering::Relaxed);
    self.success.store(false, Ordering::Release);
  }

  pub fn succeeded(&self) -> bool {
    self.success.load(Ordering::Acquire)
  }

  /// Number of failures recorded so far
  pub fn failures(&self) -> usize {
    self.failures.load(Ordering::Relaxed)
  }
}

impl Default for OutcomeAggregator {
  fn default() -> Self {
    Self::new()
  }
}
