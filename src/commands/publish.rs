//! `feedrail publish`: push a batch of packages to a feed

use crate::core::config::{PublishOverrides, RailConfig};
use crate::core::error::{RailError, RailResult, ResultExt, ValidationError};
use crate::publish::{Artifact, ConsoleSink, FeedTarget, PublishScheduler, Verbosity, pusher_for};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const PACKAGE_EXTENSION: &str = "nupkg";

/// Run the publish command
pub fn run_publish(packages: Vec<PathBuf>, overrides: PublishOverrides, verbosity: Verbosity) -> RailResult<()> {
  let workspace_root = env::current_dir()?;
  let config = RailConfig::load(&workspace_root)?;
  let settings = config.publish.resolve(overrides)?;

  let artifacts = collect_artifacts(&packages)?;
  let chatty = verbosity > Verbosity::Quiet;

  if artifacts.is_empty() {
    if chatty {
      println!("ℹ️  No packages to publish");
    }
    return Ok(());
  }

  if chatty {
    println!(
      "📦 Publishing {} package(s) to {} (parallelism {}, retries {})",
      artifacts.len(),
      settings.feed,
      settings.options.parallelism,
      settings.options.retries
    );
  }

  let feed = FeedTarget::new(settings.feed.clone(), settings.api_key.clone());
  let pusher = pusher_for(&settings.feed, settings.command.clone());
  let sink = ConsoleSink::new(verbosity);

  let summary = PublishScheduler::new(pusher.as_ref(), &sink, settings.options).run(&artifacts, &feed)?;

  if !summary.success {
    return Err(RailError::Validation(ValidationError::PublishFailed {
      failed: summary.failed,
      total: summary.total,
    }));
  }

  if chatty {
    println!("🎉 Published {} package(s)", summary.total);
  }
  Ok(())
}

/// Expand the command-line package list
///
/// Files are taken as given (missing ones fail at push time, per package).
/// Directories contribute their `*.nupkg` files, sorted by name.
fn collect_artifacts(packages: &[PathBuf]) -> RailResult<Vec<Artifact>> {
  let mut artifacts = Vec::with_capacity(packages.len());
  for path in packages {
    if path.is_dir() {
      artifacts.extend(packages_in(path)?.into_iter().map(Artifact::new));
    } else {
      artifacts.push(Artifact::new(path));
    }
  }
  Ok(artifacts)
}

fn packages_in(dir: &Path) -> RailResult<Vec<PathBuf>> {
  let mut found = Vec::new();
  for entry in fs::read_dir(dir).with_context(|| format!("Failed to list packages in {}", dir.display()))? {
    let path = entry?.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == PACKAGE_EXTENSION) {
      found.push(path);
    }
  }
  found.sort();
  Ok(found)
}
