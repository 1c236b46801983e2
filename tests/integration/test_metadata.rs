//! Tests for `project-metadata` and `platform`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_project_metadata_dump() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(
    "src/Foo.Core/project.json",
    r#"{ "frameworks": { "net451": {}, "netstandard1.3": {} } }"#,
  )?;
  workspace.write_file("test/Foo.Tests/project.json", r#"{ "frameworks": { "net451": {} } }"#)?;

  let output = run_feedrail(
    &workspace.path,
    &["project-metadata", "src/Foo.Core/project.json", "test/Foo.Tests/project.json"],
  )?;
  let stdout = stdout(&output);

  assert!(stdout.contains("src/Foo.Core/project.json"));
  assert!(stdout.contains(" TargetFrameworks = net451;netstandard1.3"));
  assert!(stdout.contains(" TFM_netstandard1_3 = true"));
  assert!(stdout.contains(" ProjectGroup = test"));
  assert!(stdout.contains("Collected metadata for 2 projects"));

  Ok(())
}

#[test]
fn test_project_metadata_json() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("src/Foo.Web/project.json", r#"{ "frameworks": { "netcoreapp1.0": {} } }"#)?;

  let output = run_feedrail(&workspace.path, &["project-metadata", "src/Foo.Web/project.json", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(json[0]["spec"], "src/Foo.Web/project.json");
  assert_eq!(json[0]["metadata"]["ProjectName"], "Foo.Web");
  assert_eq!(json[0]["metadata"]["TFM_netcoreapp1_0"], "true");

  Ok(())
}

#[test]
fn test_unreadable_project_fails() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_feedrail_raw(&workspace.path, &["project-metadata", "src/Nope/project.json"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("Failed to read project file"));

  Ok(())
}

#[test]
fn test_platform_name() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = run_feedrail(&workspace.path, &["platform"])?;
  let name = stdout(&output).trim().to_string();

  let expected = if cfg!(windows) {
    "Windows"
  } else if cfg!(target_os = "macos") {
    "macOS"
  } else {
    "Linux"
  };
  assert_eq!(name, expected);

  Ok(())
}
