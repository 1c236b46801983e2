//! Tests for the `git-info` command

use crate::helpers::*;
use anyhow::Result;

const SHA: &str = "4f2c1d0e9b8a7f6e5d4c3b2a1f0e9d8c7b6a5f4e";

#[test]
fn test_git_info_reads_branch_and_commit() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(".git/HEAD", "ref: refs/heads/release/2.0\n")?;
  workspace.write_file(".git/refs/heads/release/2.0", &format!("{}\n", SHA))?;

  let output = run_feedrail(&workspace.path, &["git-info"])?;
  let stdout = stdout(&output);
  assert!(stdout.contains("Branch: release/2.0"));
  assert!(stdout.contains(&format!("Commit: {}", SHA)));

  Ok(())
}

#[test]
fn test_git_info_json_from_packed_refs() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(".git/HEAD", "ref: refs/heads/main\n")?;
  workspace.write_file(
    ".git/packed-refs",
    &format!("# pack-refs with: peeled fully-peeled sorted\n{} refs/heads/main\n", SHA),
  )?;

  let output = run_feedrail(&workspace.path, &["git-info", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(json["branch"], "main");
  assert_eq!(json["commit"], SHA);

  Ok(())
}

#[test]
fn test_detached_head_is_reported_not_fatal() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(".git/HEAD", &format!("{}\n", SHA))?;

  let output = run_feedrail(&workspace.path, &["git-info"])?;
  assert!(stdout(&output).contains("unexpected format"));

  let output = run_feedrail(&workspace.path, &["git-info", "--warn-on-error"])?;
  assert!(stderr(&output).contains("unexpected format"));
  assert!(!stdout(&output).contains("unexpected format"));

  Ok(())
}

#[test]
fn test_missing_git_directory_keeps_json_clean() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_feedrail(&workspace.path, &["git-info", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert!(json["branch"].is_null());
  assert!(stderr(&output).contains("Unable to determine active git branch"));

  Ok(())
}

#[test]
fn test_unknown_repo_path_is_an_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_feedrail_raw(&workspace.path, &["git-info", "--repo", "does/not/exist"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("Git repository not found"));

  Ok(())
}
