//! Resilient parallel package publishing
//!
//! # Architecture
//!
//! - **artifact**: packages, feed target, per-attempt request
//! - **log**: per-package log buffers, serialized replay, console sink
//! - **retry**: per-package push loop with a fixed retry budget
//! - **outcome**: batch-wide monotonic success flag
//! - **scheduler**: bounded worker pool that joins pushes and replays
//! - **pusher**: push clients (directory feed, external command)
//!
//! # Core Invariants
//!
//! 1. Every package is pushed by exactly one worker, once
//! 2. At most `parallelism` pushes are in flight
//! 3. A package's log lines reach the sink as one contiguous, ordered block
//! 4. The batch fails iff at least one package fails

pub mod artifact;
pub mod log;
pub mod outcome;
pub mod pusher;
pub mod retry;
pub mod scheduler;

pub use artifact::{Artifact, FeedTarget};
pub use log::{ConsoleSink, Verbosity};
pub use pusher::pusher_for;
pub use scheduler::{PublishOptions, PublishScheduler, PublishSummary};
