//! Bounded-parallel batch publishing
//!
//! # Design
//!
//! - A rayon pool with exactly `parallelism` threads runs one job per package,
//!   so at most that many pushes are in flight
//! - Each job owns its [`TaskLog`]; nothing shared is locked while pushing
//! - When a package finishes, its log is replayed on a scoped thread; the
//!   join handle goes into a shared list. At most `parallelism` replay
//!   threads exist at once; past that the worker replays inline
//! - `run` returns only after the pool scope has drained *and* every replay
//!   handle has been joined
//!
//! A failing package never stops its siblings. The only batch-level signal
//! is the [`OutcomeAggregator`].

use super::artifact::{Artifact, FeedTarget};
use super::log::{LogSink, PushLog, ReplayCoordinator, TaskLog};
use super::outcome::OutcomeAggregator;
use super::pusher::{PackagePusher, PushError};
use super::retry::{PushResult, RetryExecutor};
use crate::core::error::{ConfigError, RailError, RailResult};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once, PoisonError, mpsc};
use std::thread::{self, ScopedJoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default retry budget per package
pub const DEFAULT_RETRIES: u32 = 10;

/// Twice the available hardware parallelism
pub fn default_parallelism() -> usize {
  thread::available_parallelism().map(|n| n.get()).unwrap_or(1) * 2
}

/// Engine knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
  /// Maximum pushes in flight
  pub parallelism: usize,
  /// Extra attempts after the first failure
  pub retries: u32,
  /// Forwarded to the client; `None` means the client's default
  pub timeout: Option<Duration>,
}

impl Default for PublishOptions {
  fn default() -> Self {
    Self {
      parallelism: default_parallelism(),
      retries: DEFAULT_RETRIES,
      timeout: None,
    }
  }
}

/// Result of a whole batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
  pub success: bool,
  pub total: usize,
  pub failed: usize,
}

/// Dispatches packages over a bounded worker pool
pub struct PublishScheduler<'a> {
  pusher: &'a dyn PackagePusher,
  sink: &'a dyn LogSink,
  options: PublishOptions,
}

impl<'a> PublishScheduler<'a> {
  pub fn new(pusher: &'a dyn PackagePusher, sink: &'a dyn LogSink, options: PublishOptions) -> Self {
    Self { pusher, sink, options }
  }

  /// Push every artifact and wait for all pushes and log replays
  ///
  /// Only pool construction can fail; per-package failures are reported
  /// through the sink and the summary.
  pub fn run(&self, artifacts: &[Artifact], feed: &FeedTarget) -> RailResult<PublishSummary> {
    if self.options.parallelism == 0 {
      return Err(RailError::Config(ConfigError::InvalidValue {
        field: "parallelism".to_string(),
        reason: "must be at least 1".to_string(),
      }));
    }

    if artifacts.is_empty() {
      return Ok(PublishSummary {
        success: true,
        total: 0,
        failed: 0,
      });
    }

    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(self.options.parallelism)
      .thread_name(|idx| format!("feedrail-push-{}", idx))
      .build()?;

    info!(
      packages = artifacts.len(),
      parallelism = self.options.parallelism,
      retries = self.options.retries,
      "publishing batch"
    );

    install_panic_hook();

    let outcome = OutcomeAggregator::new();
    let coordinator = ReplayCoordinator::new(self.sink);
    let executor = RetryExecutor::new(self.pusher, self.options.retries, self.options.timeout);
    let live_replays = AtomicUsize::new(0);
    let replay_limit = self.options.parallelism;

    thread::scope(|replays| {
      let handles = Mutex::new(Vec::with_capacity(artifacts.len()));

      pool.scope(|work| {
        for artifact in artifacts {
          let (executor, outcome, coordinator, handles, live_replays) =
            (&executor, &outcome, &coordinator, &handles, &live_replays);
          work.spawn(move |_| {
            let mut log = TaskLog::new();
            let result = push_isolated(executor, artifact, feed, &mut log);
            debug!(
              package = artifact.id(),
              success = result.success,
              attempts = result.attempts,
              "package finished"
            );
            if !result.success {
              outcome.record_failure();
            }

            if let Some(handle) = launch_replay(replays, coordinator, live_replays, replay_limit, log) {
              handles.lock().unwrap_or_else(PoisonError::into_inner).push(handle);
            }
          });
        }
      });

      let handles = handles.into_inner().unwrap_or_else(PoisonError::into_inner);
      for handle in handles {
        if handle.join().is_err() {
          warn!("log replay thread panicked; some output may be missing");
        }
      }
    });

    Ok(PublishSummary {
      success: outcome.succeeded(),
      total: artifacts.len(),
      failed: outcome.failures(),
    })
  }
}

/// Replay `log` on its own scoped thread, or inline on the calling worker
///
/// At most `limit` replay threads are alive at once. Past that, or when the
/// OS refuses a new thread, the worker replays the log itself, which holds
/// the worker until the sink catches up.
fn launch_replay<'scope>(
  replays: &'scope thread::Scope<'scope, '_>,
  coordinator: &'scope ReplayCoordinator<'_>,
  live: &'scope AtomicUsize,
  limit: usize,
  log: TaskLog,
) -> Option<ScopedJoinHandle<'scope, ()>> {
  if live.fetch_add(1, Ordering::AcqRel) >= limit {
    live.fetch_sub(1, Ordering::AcqRel);
    coordinator.replay(log);
    return None;
  }

  // The log travels over a channel so it is still ours if the spawn fails
  let (handoff, pending) = mpsc::channel::<TaskLog>();
  let spawned = thread::Builder::new()
    .name("feedrail-replay".to_string())
    .spawn_scoped(replays, move || {
      let _slot = ReplaySlot(live);
      if let Ok(log) = pending.recv() {
        coordinator.replay(log);
      }
    });

  match spawned {
    Ok(handle) => {
      if let Err(mpsc::SendError(log)) = handoff.send(log) {
        coordinator.replay(log);
      }
      Some(handle)
    }
    Err(err) => {
      live.fetch_sub(1, Ordering::AcqRel);
      warn!(error = %err, "could not start a log replay thread; replaying inline");
      coordinator.replay(log);
      None
    }
  }
}

/// Releases a replay thread's slot when the thread finishes, panicking or not
struct ReplaySlot<'a>(&'a AtomicUsize);

impl Drop for ReplaySlot<'_> {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::AcqRel);
  }
}

thread_local! {
  static INSIDE_CLIENT: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Keep client panics off raw stderr
///
/// A panic inside [`push_isolated`] is reported through the package's log;
/// the default hook would print it again, unsynchronized with the sink.
/// Every other panic still reaches the previous hook.
fn install_panic_hook() {
  PANIC_HOOK.call_once(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info: &panic::PanicHookInfo<'_>| {
      if INSIDE_CLIENT.with(Cell::get) {
        debug!(location = ?info.location(), "push client panicked");
        return;
      }
      previous(info);
    }));
  });
}

/// Run the retry loop, turning a client panic into a failed result
fn push_isolated(executor: &RetryExecutor<'_>, artifact: &Artifact, feed: &FeedTarget, log: &mut TaskLog) -> PushResult {
  let mut started = 0;
  INSIDE_CLIENT.with(|inside| inside.set(true));
  let outcome = panic::catch_unwind(AssertUnwindSafe(|| executor.push(artifact, feed, &mut *log, &mut started)));
  INSIDE_CLIENT.with(|inside| inside.set(false));

  match outcome {
    Ok(result) => result,
    Err(payload) => {
      let message = format!("Failed to push {}: client panicked: {}", artifact, panic_message(&*payload));
      log.error(&message);
      PushResult::failed(started, PushError::new(message))
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  payload
    .downcast_ref::<&str>()
    .copied()
    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
    .unwrap_or("unknown panic")
}
