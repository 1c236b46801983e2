//! Push clients
//!
//! The engine never speaks a feed protocol itself. It drives a
//! [`PackagePusher`], which performs exactly one upload attempt per call:
//!
//! - [`DirectoryFeed`]: the feed is a local/UNC folder or `file://` URL, packages are copied in
//! - [`CommandPusher`]: anything else is handed to an external client
//!   (`dotnet nuget push` by default)

use super::artifact::PushRequest;
use super::log::{LogLevel, PushLog};
use crate::utils::feed_directory;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

/// Why a single push attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushError {
  pub message: String,
  /// Client diagnostics (stderr, I/O error text)
  pub detail: Option<String>,
}

impl PushError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      detail: None,
    }
  }

  pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
    let detail = detail.into();
    Self {
      message: message.into(),
      detail: (!detail.trim().is_empty()).then(|| detail.trim().to_string()),
    }
  }
}

impl fmt::Display for PushError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)?;
    if let Some(detail) = &self.detail {
      write!(f, "\n{}", detail)?;
    }
    Ok(())
  }
}

impl std::error::Error for PushError {}

/// One upload attempt against a feed
///
/// Called concurrently from several workers; implementations must not rely
/// on call order between packages.
pub trait PackagePusher: Send + Sync {
  fn push(&self, request: &PushRequest<'_>, log: &mut dyn PushLog) -> Result<(), PushError>;
}

/// Pick the client for a feed address
pub fn pusher_for(source: &str, command: Option<Vec<String>>) -> Box<dyn PackagePusher> {
  match feed_directory(source) {
    Some(dir) => Box::new(DirectoryFeed::new(dir)),
    None => Box::new(CommandPusher::new(command.unwrap_or_else(CommandPusher::default_template))),
  }
}

/// Feed backed by a plain directory
pub struct DirectoryFeed {
  root: PathBuf,
}

impl DirectoryFeed {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl DirectoryFeed {
  /// Settle a push against a package already published under the same name
  fn compare_existing(&self, request: &PushRequest<'_>, content: &[u8], log: &mut dyn PushLog) -> Result<(), PushError> {
    let artifact = request.artifact;
    let destination = self.root.join(artifact.id());
    let existing = fs::read(&destination).map_err(|e| {
      PushError::with_detail(format!("Failed to read {}", destination.display()), e.to_string())
    })?;

    if existing != content {
      return Err(PushError::new(format!(
        "Conflict: {} already exists in {} with different content",
        artifact.id(),
        self.root.display()
      )));
    }

    log.information(&format!(
      "Package {} already exists in {} with identical content",
      artifact.id(),
      self.root.display()
    ));
    Ok(())
  }
}

impl PackagePusher for DirectoryFeed {
  fn push(&self, request: &PushRequest<'_>, log: &mut dyn PushLog) -> Result<(), PushError> {
    let artifact = request.artifact;
    let destination = self.root.join(artifact.id());

    fs::create_dir_all(&self.root).map_err(|e| {
      PushError::with_detail(
        format!("Failed to create feed directory {}", self.root.display()),
        e.to_string(),
      )
    })?;

    let content = fs::read(artifact.path())
      .map_err(|e| PushError::with_detail(format!("Failed to read {}", artifact), e.to_string()))?;

    if destination.exists() {
      return self.compare_existing(request, &content, log);
    }

    // Readers only ever see complete packages: the bytes are staged next to
    // the destination and linked into place without replacing anything.
    log.debug(&format!("Copying {} to {}", artifact, destination.display()));
    let write_failed = |e: io::Error| {
      PushError::with_detail(format!("Failed to write {}", destination.display()), e.to_string())
    };
    let mut staged = NamedTempFile::new_in(&self.root).map_err(write_failed)?;
    staged.write_all(&content).map_err(write_failed)?;
    staged.as_file().sync_all().map_err(write_failed)?;

    match staged.persist_noclobber(&destination) {
      Ok(_) => {
        log.information(&format!("Your package was pushed to {}", destination.display()));
        Ok(())
      }
      // Lost a race against another push of the same file name
      Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => self.compare_existing(request, &content, log),
      Err(e) => Err(write_failed(e.error)),
    }
  }
}

/// Feed reached through an external client process
///
/// The template is a program followed by arguments. Placeholders:
/// `{package}`, `{feed}`, `{api_key}`, `{timeout}` (seconds). An argument
/// whose placeholder has no value is dropped, together with the `-flag`
/// argument directly before it.
pub struct CommandPusher {
  template: Vec<String>,
}

impl CommandPusher {
  pub fn new(template: Vec<String>) -> Self {
    Self { template }
  }

  pub fn default_template() -> Vec<String> {
    [
      "dotnet",
      "nuget",
      "push",
      "{package}",
      "--source",
      "{feed}",
      "--api-key",
      "{api_key}",
      "--timeout",
      "{timeout}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
  }

  /// Expand the template for one request
  ///
  /// With `redact` set the credential is rendered as `***` (for logging).
  pub fn expand(&self, request: &PushRequest<'_>, redact: bool) -> Vec<String> {
    let package = request.artifact.path().display().to_string();
    let timeout = request.timeout.map(|t| t.as_secs().max(1).to_string());
    let api_key = request
      .feed
      .api_key
      .as_ref()
      .map(|key| if redact { "***".to_string() } else { key.clone() });

    let mut expanded: Vec<String> = Vec::with_capacity(self.template.len());
    for arg in &self.template {
      let mut value = arg.replace("{package}", &package).replace("{feed}", &request.feed.source);

      let mut missing = false;
      for (placeholder, replacement) in [("{api_key}", &api_key), ("{timeout}", &timeout)] {
        if value.contains(placeholder) {
          match replacement {
            Some(v) => value = value.replace(placeholder, v),
            None => missing = true,
          }
        }
      }

      if missing {
        if expanded.len() > 1 && expanded.last().is_some_and(|prev| prev.starts_with('-')) {
          expanded.pop();
        }
        continue;
      }
      expanded.push(value);
    }
    expanded
  }
}

impl PackagePusher for CommandPusher {
  fn push(&self, request: &PushRequest<'_>, log: &mut dyn PushLog) -> Result<(), PushError> {
    let args = self.expand(request, false);
    let (program, rest) = args
      .split_first()
      .ok_or_else(|| PushError::new("Push command is empty"))?;

    log.log(LogLevel::Verbose, format!("Running: {}", self.expand(request, true).join(" ")));

    let output = Command::new(program)
      .args(rest)
      .output()
      .map_err(|e| PushError::with_detail(format!("Failed to run {}", program), e.to_string()))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
      if !line.trim().is_empty() {
        log.information(line);
      }
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
      return Err(PushError::with_detail(
        format!("{} exited with {}", program, output.status),
        stderr.into_owned(),
      ));
    }

    for line in stderr.lines() {
      if !line.trim().is_empty() {
        log.warning(line);
      }
    }

    Ok(())
  }
}
