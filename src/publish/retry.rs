//! Per-package push loop with a fixed retry budget
//!
//! Every failure is retried the same way, immediately, until the budget runs
//! out. The client's error type is not inspected: a rejected credential is
//! retried exactly like a dropped connection.

use super::artifact::{Artifact, FeedTarget, PushRequest};
use super::log::PushLog;
use super::pusher::{PackagePusher, PushError};
use std::time::Duration;
use tracing::{debug, trace};

/// One try at pushing a package
#[derive(Debug)]
pub struct PushAttempt {
  /// 1-based, contiguous per package
  pub ordinal: u32,
  pub result: Result<(), PushError>,
}

/// Terminal outcome for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
  pub success: bool,
  /// Push attempts made (0 when a precondition failed)
  pub attempts: u32,
  pub error: Option<PushError>,
}

impl PushResult {
  pub fn succeeded(attempts: u32) -> Self {
    Self {
      success: true,
      attempts,
      error: None,
    }
  }

  pub fn failed(attempts: u32, error: PushError) -> Self {
    Self {
      success: false,
      attempts,
      error: Some(error),
    }
  }
}

/// Drives push attempts for a single package
pub struct RetryExecutor<'a> {
  pusher: &'a dyn PackagePusher,
  retries: u32,
  timeout: Option<Duration>,
}

impl<'a> RetryExecutor<'a> {
  /// `retries` is the number of extra attempts after the first failure
  pub fn new(pusher: &'a dyn PackagePusher, retries: u32, timeout: Option<Duration>) -> Self {
    Self {
      pusher,
      retries,
      timeout,
    }
  }

  fn attempt(&self, ordinal: u32, request: &PushRequest<'_>, log: &mut dyn PushLog) -> PushAttempt {
    trace!(package = request.artifact.id(), ordinal, "push attempt");
    PushAttempt {
      ordinal,
      result: self.pusher.push(request, log),
    }
  }

  /// Push `artifact`, retrying until it succeeds or the budget is spent
  ///
  /// `started` counts attempts as they begin, so it stays accurate when the
  /// client unwinds out of an attempt.
  pub fn push(&self, artifact: &Artifact, feed: &FeedTarget, log: &mut dyn PushLog, started: &mut u32) -> PushResult {
    if !artifact.exists() {
      let message = format!("Package file not found: {}", artifact);
      log.error(&message);
      return PushResult::failed(0, PushError::new(message));
    }

    let request = PushRequest {
      artifact,
      feed,
      timeout: self.timeout,
    };

    let mut tries = 0;
    loop {
      *started = tries + 1;
      let attempt = self.attempt(*started, &request, log);
      match attempt.result {
        Ok(()) => {
          debug!(package = artifact.id(), attempts = attempt.ordinal, "pushed");
          return PushResult::succeeded(attempt.ordinal);
        }
        Err(err) if tries < self.retries => {
          tries += 1;
          log.minimal(&format!(
            "Failed to push {}. Retrying ({}/{} attempt). Error Details: {}",
            artifact, tries, self.retries, err
          ));
        }
        Err(err) => {
          log.error(&format!("Failed to push {} on final attempt: {}", artifact, err));
          return PushResult::failed(attempt.ordinal, err);
        }
      }
    }
  }
}
