//! Buffered per-package logging and serialized replay
//!
//! Pushes run concurrently, but their output must read as one block per
//! package. Each worker records into a private [`TaskLog`]; once the package
//! is done the buffer is handed to the [`ReplayCoordinator`], which writes it
//! to the shared [`LogSink`] while holding a single lock.
//!
//! ```text
//! worker A: TaskLog [a1 a2 a3] --\
//!                                 >-- ReplayCoordinator (one lock) --> LogSink
//! worker B: TaskLog [b1 b2]    --/
//! ```

use clap::ValueEnum;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Severity/importance of a log event
///
/// Mirrors the levels a package client reports with. How each maps to
/// console output is decided by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
  Debug,
  Verbose,
  Information,
  InformationSummary,
  Minimal,
  Warning,
  Error,
  ErrorSummary,
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      LogLevel::Debug => "debug",
      LogLevel::Verbose => "verbose",
      LogLevel::Information => "info",
      LogLevel::InformationSummary => "info-summary",
      LogLevel::Minimal => "minimal",
      LogLevel::Warning => "warning",
      LogLevel::Error => "error",
      LogLevel::ErrorSummary => "error-summary",
    };
    f.write_str(name)
  }
}

/// One leveled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
  pub level: LogLevel,
  pub message: String,
}

impl LogEvent {
  pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
    Self {
      level,
      message: message.into(),
    }
  }
}

/// Logger handed to the retry loop and to push clients
pub trait PushLog {
  /// Record one event
  fn log(&mut self, level: LogLevel, message: String);

  fn debug(&mut self, message: &str) {
    self.log(LogLevel::Debug, message.to_string());
  }

  fn information(&mut self, message: &str) {
    self.log(LogLevel::Information, message.to_string());
  }

  fn minimal(&mut self, message: &str) {
    self.log(LogLevel::Minimal, message.to_string());
  }

  fn warning(&mut self, message: &str) {
    self.log(LogLevel::Warning, message.to_string());
  }

  fn error(&mut self, message: &str) {
    self.log(LogLevel::Error, message.to_string());
  }
}

/// Ordered event buffer for a single package
///
/// Owned by exactly one worker while the package is pushed, then moved into
/// [`ReplayCoordinator::replay`] and dropped after the flush.
#[derive(Debug, Default)]
pub struct TaskLog {
  events: Vec<LogEvent>,
}

impl TaskLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Events recorded so far, in call order
  pub fn events(&self) -> &[LogEvent] {
    &self.events
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }
}

impl PushLog for TaskLog {
  fn log(&mut self, level: LogLevel, message: String) {
    self.events.push(LogEvent { level, message });
  }
}

/// Destination for replayed events
///
/// Implementations must be internally synchronized; the engine only holds a
/// shared reference.
pub trait LogSink: Send + Sync {
  fn write(&self, event: &LogEvent);
}

/// Serializes buffer flushes into the shared sink
pub struct ReplayCoordinator<'a> {
  sink: &'a dyn LogSink,
  padlock: Mutex<()>,
}

impl<'a> ReplayCoordinator<'a> {
  pub fn new(sink: &'a dyn LogSink) -> Self {
    Self {
      sink,
      padlock: Mutex::new(()),
    }
  }

  /// Write one package's buffer to the sink as a single uninterrupted block
  pub fn replay(&self, log: TaskLog) {
    if log.is_empty() {
      return;
    }

    // A panicking sink must not wedge every later replay
    let _guard = self.padlock.lock().unwrap_or_else(PoisonError::into_inner);
    for event in &log.events {
      self.sink.write(event);
    }
  }
}

/// How much of the event stream reaches the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum Verbosity {
  /// Warnings and errors only
  Quiet,
  /// Plus high-importance messages (retries)
  Minimal,
  /// Plus informational client output
  #[default]
  Normal,
  /// Everything, including debug/verbose client output
  Detailed,
}

impl Verbosity {
  /// Whether an event at `level` is shown; `None` means the level is never printed
  pub fn threshold(level: LogLevel) -> Option<Verbosity> {
    match level {
      LogLevel::Warning | LogLevel::Error => Some(Verbosity::Quiet),
      LogLevel::Minimal => Some(Verbosity::Minimal),
      LogLevel::Information => Some(Verbosity::Normal),
      LogLevel::Debug | LogLevel::Verbose => Some(Verbosity::Detailed),
      // The command prints its own summary
      LogLevel::InformationSummary | LogLevel::ErrorSummary => None,
    }
  }

  pub fn shows(self, level: LogLevel) -> bool {
    Self::threshold(level).is_some_and(|min| self >= min)
  }
}

/// Terminal sink: stdout for messages, stderr for warnings and errors
pub struct ConsoleSink {
  verbosity: Verbosity,
}

impl ConsoleSink {
  pub fn new(verbosity: Verbosity) -> Self {
    Self { verbosity }
  }
}

impl LogSink for ConsoleSink {
  fn write(&self, event: &LogEvent) {
    if !self.verbosity.shows(event.level) {
      return;
    }

    // Broken pipes are not worth aborting a publish over
    let _ = match event.level {
      LogLevel::Error => writeln!(io::stderr().lock(), "   ❌ {}", event.message),
      LogLevel::Warning => writeln!(io::stderr().lock(), "   ⚠️  {}", event.message),
      LogLevel::Minimal => writeln!(io::stdout().lock(), "   🔁 {}", event.message),
      _ => writeln!(io::stdout().lock(), "      {}", event.message),
    };
  }
}

/// Sink that keeps every event in memory, in write order
#[cfg(test)]
#[derive(Default)]
pub struct MemorySink {
  events: Mutex<Vec<LogEvent>>,
}

#[cfg(test)]
impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<LogEvent> {
    self.events.lock().unwrap().clone()
  }
}

#[cfg(test)]
impl LogSink for MemorySink {
  fn write(&self, event: &LogEvent) {
    self.events.lock().unwrap().push(event.clone());
  }
}
