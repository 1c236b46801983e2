//! Resolve the newest installed version of a packaged tool
//!
//! Packages are laid out as `<packages_dir>/<id>/<version>/...`. Folder
//! names are read the way package managers write them (`3.0`, `2.0.0.1`,
//! `1.2.0-beta.1`); anything else is ignored.

use crate::core::error::{RailError, RailResult, ResultExt};
use semver::{BuildMetadata, Prerelease, Version};
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location of a resolved tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTool {
  #[serde(rename = "ToolVersion")]
  pub version: String,
  #[serde(rename = "ToolPath")]
  pub path: PathBuf,
}

/// A package folder version: one to four numeric parts, then optional
/// `-prerelease` and `+metadata`
///
/// Missing parts count as zero (`3.0` is `3.0.0`). A fourth part orders after
/// the patch. Build metadata never affects ordering.
#[derive(Debug, Clone)]
struct PackageVersion {
  release: Version,
  revision: u64,
}

impl PackageVersion {
  fn parse(name: &str) -> Option<Self> {
    let (rest, build) = match name.split_once('+') {
      Some((rest, build)) => (rest, BuildMetadata::new(build).ok()?),
      None => (name, BuildMetadata::EMPTY),
    };
    let (numbers, pre) = match rest.split_once('-') {
      Some((_, "")) => return None,
      Some((numbers, pre)) => (numbers, Prerelease::new(pre).ok()?),
      None => (rest, Prerelease::EMPTY),
    };

    let mut parts = [0u64; 4];
    let mut count = 0;
    for part in numbers.split('.') {
      if count == parts.len() || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
      }
      parts[count] = part.parse().ok()?;
      count += 1;
    }

    Some(Self {
      release: Version {
        major: parts[0],
        minor: parts[1],
        patch: parts[2],
        pre,
        build,
      },
      revision: parts[3],
    })
  }

  /// Canonical form: three parts, the fourth only when non-zero, no metadata
  fn normalized(&self) -> String {
    let v = &self.release;
    let mut out = format!("{}.{}.{}", v.major, v.minor, v.patch);
    if self.revision > 0 {
      out.push_str(&format!(".{}", self.revision));
    }
    if !v.pre.is_empty() {
      out.push('-');
      out.push_str(v.pre.as_str());
    }
    out
  }
}

impl Ord for PackageVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    let (a, b) = (&self.release, &other.release);
    (a.major, a.minor, a.patch, self.revision)
      .cmp(&(b.major, b.minor, b.patch, other.revision))
      .then_with(|| a.pre.cmp(&b.pre))
  }
}

impl PartialEq for PackageVersion {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// Pick the highest version of `package_id` and join `relative_path` onto it
pub fn resolve(packages_dir: &Path, package_id: &str, relative_path: &Path) -> RailResult<ResolvedTool> {
  let package_dir = packages_dir.join(package_id);
  let entries = fs::read_dir(&package_dir)
    .with_context(|| format!("Failed to list versions of '{}' in {}", package_id, package_dir.display()))?;

  let mut best: Option<(PackageVersion, String)> = None;
  for entry in entries {
    let entry = entry?;
    if !entry.file_type()?.is_dir() {
      continue;
    }
    let name = entry.file_name().to_string_lossy().into_owned();
    let Some(version) = PackageVersion::parse(&name) else {
      debug!(dir = %name, "skipping non-version directory");
      continue;
    };
    if best.as_ref().is_none_or(|(current, _)| version > *current) {
      best = Some((version, name));
    }
  }

  let (version, dir_name) = best.ok_or_else(|| {
    RailError::with_help(
      format!("No installed versions of '{}' found in {}", package_id, package_dir.display()),
      "Restore packages first, or point --packages-dir at the right folder.",
    )
  })?;

  Ok(ResolvedTool {
    version: version.normalized(),
    path: package_dir.join(dir_name).join(relative_path),
  })
}
