//! Packages to publish and where they go

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One package file submitted for publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  path: PathBuf,
  id: String,
}

impl Artifact {
  /// Create an artifact from a package path
  ///
  /// Relative paths are made absolute against the current directory so log
  /// lines and client invocations are unambiguous.
  pub fn new(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let id = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.display().to_string());
    Self { path, id }
  }

  /// Full path to the package file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Identity used in logs (the file name)
  pub fn id(&self) -> &str {
    &self.id
  }

  /// Whether the package file is present on disk
  pub fn exists(&self) -> bool {
    self.path.is_file()
  }
}

impl fmt::Display for Artifact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.path.display())
  }
}

/// Feed address plus optional credential
#[derive(Clone)]
pub struct FeedTarget {
  pub source: String,
  pub api_key: Option<String>,
}

impl FeedTarget {
  pub fn new(source: impl Into<String>, api_key: Option<String>) -> Self {
    Self {
      source: source.into(),
      api_key,
    }
  }
}

// Keep credentials out of debug output and tracing fields
impl fmt::Debug for FeedTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FeedTarget")
      .field("source", &self.source)
      .field("api_key", &self.api_key.as_ref().map(|_| "***"))
      .finish()
  }
}

/// Everything a push client needs for one attempt
#[derive(Debug, Clone, Copy)]
pub struct PushRequest<'a> {
  pub artifact: &'a Artifact,
  pub feed: &'a FeedTarget,
  /// `None` leaves the timeout to the client's own default
  pub timeout: Option<Duration>,
}
