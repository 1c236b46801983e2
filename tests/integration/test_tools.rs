//! Tests for the `resolve-tool` command

use crate::helpers::*;
use anyhow::Result;

fn install(workspace: &TestWorkspace, id: &str, versions: &[&str]) -> Result<()> {
  for version in versions {
    workspace.write_file(&format!("packages/{}/{}/tools/runner.exe", id, version), "")?;
  }
  Ok(())
}

#[test]
fn test_resolve_tool_picks_highest_version() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  install(&workspace, "xunit.runner.console", &["2.1.0", "2.10.0", "2.9.1", "latest"])?;

  let output = run_feedrail(
    &workspace.path,
    &[
      "resolve-tool",
      "--package-id",
      "xunit.runner.console",
      "--packages-dir",
      "packages",
      "--relative-path",
      "tools/runner.exe",
      "--json",
    ],
  )?;

  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(json["ToolVersion"], "2.10.0");
  let path = json["ToolPath"].as_str().unwrap_or_default();
  assert!(path.contains("2.10.0"));
  assert!(path.ends_with("runner.exe"));

  Ok(())
}

#[test]
fn test_packages_dir_from_config() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  install(&workspace, "Tool.Runner", &["1.0.0", "1.1.0-beta.2"])?;
  workspace.write_config(
    r#"[tools]
packages_dir = "packages"
"#,
  )?;

  let output = run_feedrail(
    &workspace.path,
    &["resolve-tool", "--package-id", "Tool.Runner", "--relative-path", "tools/runner.exe"],
  )?;
  let stdout = stdout(&output);
  assert!(stdout.contains("Resolved tool:"));
  assert!(stdout.contains("Version: 1.1.0-beta.2"));

  Ok(())
}

#[test]
fn test_missing_packages_dir_is_a_config_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_feedrail_raw(
    &workspace.path,
    &["resolve-tool", "--package-id", "Tool.Runner", "--relative-path", "tools/runner.exe"],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--packages-dir"));

  Ok(())
}

#[test]
fn test_no_installed_versions() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("packages/Tool.Runner/notes.txt", "")?;

  let output = run_feedrail_raw(
    &workspace.path,
    &[
      "resolve-tool",
      "--package-id",
      "Tool.Runner",
      "--packages-dir",
      "packages",
      "--relative-path",
      "tools/runner.exe",
    ],
  )?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("No installed versions of 'Tool.Runner'"));

  Ok(())
}

#[test]
fn test_short_and_four_part_version_folders() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  install(&workspace, "Tool.Runner", &["1.9.0", "2.0.0.1", "3.0"])?;

  let output = run_feedrail(
    &workspace.path,
    &[
      "resolve-tool",
      "--package-id",
      "Tool.Runner",
      "--packages-dir",
      "packages",
      "--relative-path",
      "tools/runner.exe",
      "--json",
    ],
  )?;

  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(json["ToolVersion"], "3.0.0");

  Ok(())
}
