//! Tests for the `publish` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_publish_to_directory_feed() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;
  workspace.add_package("Foo.Data", "1.0.0")?;
  workspace.add_package("Foo.Web", "1.0.0")?;

  let output = run_feedrail(&workspace.path, &["publish", "out", "--feed", "feed", "--parallelism", "2"])?;

  assert!(workspace.file_exists("feed/Foo.Core.1.0.0.nupkg"));
  assert!(workspace.file_exists("feed/Foo.Data.1.0.0.nupkg"));
  assert!(workspace.file_exists("feed/Foo.Web.1.0.0.nupkg"));
  assert_eq!(
    workspace.read_file("feed/Foo.Web.1.0.0.nupkg")?,
    "package Foo.Web 1.0.0"
  );

  let stdout = stdout(&output);
  assert!(stdout.contains("Publishing 3 package(s)"));
  assert!(stdout.contains("Published 3 package(s)"));

  Ok(())
}

#[test]
fn test_publish_feed_from_config() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "2.1.0")?;
  workspace.write_config(
    r#"[publish]
feed = "local-feed"
parallelism = 1
retries = 0
"#,
  )?;

  run_feedrail(&workspace.path, &["push", "out/Foo.Core.2.1.0.nupkg"])?;
  assert!(workspace.file_exists("local-feed/Foo.Core.2.1.0.nupkg"));

  Ok(())
}

#[test]
fn test_republishing_identical_package_succeeds() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;

  run_feedrail(&workspace.path, &["publish", "out", "--feed", "feed"])?;
  let output = run_feedrail(&workspace.path, &["publish", "out", "--feed", "feed"])?;
  assert!(stdout(&output).contains("identical content"));

  Ok(())
}

#[test]
fn test_missing_package_fails_only_that_package() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;

  let output = run_feedrail_raw(
    &workspace.path,
    &[
      "publish",
      "out/Foo.Core.1.0.0.nupkg",
      "out/Missing.1.0.0.nupkg",
      "--feed",
      "feed",
      "--retries",
      "3",
    ],
  )?;

  assert_eq!(output.status.code(), Some(3));
  assert!(workspace.file_exists("feed/Foo.Core.1.0.0.nupkg"));

  let stderr = stderr(&output);
  assert!(stderr.contains("Package file not found"));
  assert!(stderr.contains("Publishing failed for 1 of 2 package(s)"));
  // Missing files are not retried
  assert!(!stdout(&output).contains("Retrying"));

  Ok(())
}

#[test]
fn test_missing_feed_is_a_config_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;

  let output = run_feedrail_raw(&workspace.path, &["publish", "out"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--feed"));

  Ok(())
}

#[test]
fn test_zero_parallelism_in_config_is_rejected() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_config(
    r#"[publish]
feed = "feed"
parallelism = 0
"#,
  )?;

  let output = run_feedrail_raw(&workspace.path, &["publish", "out"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("parallelism"));

  Ok(())
}

#[test]
fn test_empty_batch_is_a_no_op() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  std::fs::create_dir_all(workspace.path.join("out"))?;

  let output = run_feedrail(&workspace.path, &["publish", "out", "--feed", "feed"])?;
  assert!(stdout(&output).contains("No packages to publish"));
  assert!(!workspace.file_exists("feed"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_client_is_retried_then_reported() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;
  workspace.write_config(
    r#"[publish]
feed = "https://packages.example.invalid/v3/index.json"
command = ["sh", "-c", "echo feed unavailable >&2; exit 1"]
"#,
  )?;

  let output = run_feedrail_raw(&workspace.path, &["publish", "out", "--retries", "2"])?;
  assert_eq!(output.status.code(), Some(3));

  let stdout = stdout(&output);
  assert!(stdout.contains("Retrying (1/2 attempt)"));
  assert!(stdout.contains("Retrying (2/2 attempt)"));
  assert!(stdout.contains("feed unavailable"));

  let stderr = stderr(&output);
  assert_eq!(stderr.matches("on final attempt").count(), 1);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_quiet_verbosity_hides_retries() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;
  workspace.write_config(
    r#"[publish]
feed = "https://packages.example.invalid/v3/index.json"
command = ["sh", "-c", "exit 1"]
"#,
  )?;

  let output = run_feedrail_raw(
    &workspace.path,
    &["publish", "out", "--retries", "1", "--verbosity", "quiet"],
  )?;
  assert_eq!(output.status.code(), Some(3));
  assert!(!stdout(&output).contains("Retrying"));
  assert!(stderr(&output).contains("on final attempt"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_client_receives_package_and_feed() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;
  workspace.write_config(
    r#"[publish]
feed = "https://packages.example.invalid/v3/index.json"
command = ["sh", "-c", "echo pushed $1 to $2", "push", "{package}", "{feed}"]
"#,
  )?;

  let output = run_feedrail(&workspace.path, &["publish", "out"])?;
  let stdout = stdout(&output);
  assert!(stdout.contains("pushed "));
  assert!(stdout.contains("Foo.Core.1.0.0.nupkg to https://packages.example.invalid/v3/index.json"));

  Ok(())
}

#[test]
fn test_package_listed_twice_is_published_once() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_package("Foo.Core", "1.0.0")?;

  let output = run_feedrail(
    &workspace.path,
    &[
      "publish",
      "out",
      "out/Foo.Core.1.0.0.nupkg",
      "--feed",
      "feed",
      "--parallelism",
      "2",
      "--retries",
      "0",
    ],
  )?;

  assert!(stdout(&output).contains("Published 2 package(s)"));
  assert_eq!(workspace.read_file("feed/Foo.Core.1.0.0.nupkg")?, "package Foo.Core 1.0.0");
  assert_eq!(std::fs::read_dir(workspace.path.join("feed"))?.count(), 1);

  Ok(())
}
