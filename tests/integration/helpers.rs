//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch build directory with packages, descriptors and config
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create an empty workspace
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write a file relative to the workspace root, creating parent dirs
  pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full, content)?;
    Ok(full)
  }

  /// Create a fake package under `out/`
  pub fn add_package(&self, id: &str, version: &str) -> Result<PathBuf> {
    self.write_file(
      &format!("out/{}.{}.nupkg", id, version),
      &format!("package {} {}", id, version),
    )
  }

  /// Write `feedrail.toml` at the root
  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("feedrail.toml", content)?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run feedrail and return its output whatever the exit status
pub fn run_feedrail_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let feedrail_bin = env!("CARGO_BIN_EXE_feedrail");

  Command::new(feedrail_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run feedrail")
}

/// Run feedrail, failing unless it exits successfully
pub fn run_feedrail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_feedrail_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "feedrail command failed: feedrail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
