//! Metadata derived from `project.json` descriptors
//!
//! Adds target frameworks and the conventional directory layout values that
//! later build steps read back (output dirs, generated sources, grouping).

use crate::core::error::{RailResult, ResultExt};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path};
use tracing::debug;

/// A project descriptor plus the metadata gathered for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectItem {
  /// Path as given on the command line
  pub spec: String,
  pub metadata: BTreeMap<String, String>,
}

impl ProjectItem {
  pub fn get(&self, name: &str) -> Option<&str> {
    self.metadata.get(name).map(String::as_str)
  }
}

/// Gather metadata for every descriptor, failing on the first unreadable one
pub fn gather_all(projects: &[impl AsRef<Path>]) -> RailResult<Vec<ProjectItem>> {
  projects.iter().map(|p| gather(p.as_ref())).collect()
}

/// Gather metadata for one descriptor
pub fn gather(project: &Path) -> RailResult<ProjectItem> {
  let full_path = std::path::absolute(project)
    .with_context(|| format!("Failed to resolve project path {}", project.display()))?;
  let content = fs::read_to_string(&full_path)
    .with_context(|| format!("Failed to read project file {}", full_path.display()))?;
  let json: Value = serde_json::from_str(&content)
    .with_context(|| format!("Failed to parse project file {}", full_path.display()))?;

  let mut metadata = BTreeMap::new();

  if let Some(Value::Object(frameworks)) = json.get("frameworks") {
    let names: Vec<&str> = frameworks.keys().map(String::as_str).collect();
    metadata.insert("TargetFrameworks".to_string(), names.join(";"));
    for name in names {
      metadata.insert(format!("TFM_{}", name.replace('.', "_")), "true".to_string());
    }
  }

  // Directories carry a trailing separator, matching build-system conventions
  let dir = full_path.parent().unwrap_or(Path::new(""));
  let file_name = |p: &Path| {
    p.file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  };

  metadata.insert("ProjectDir".to_string(), format!("{}{}", dir.display(), MAIN_SEPARATOR));
  metadata.insert("ProjectName".to_string(), file_name(dir));
  metadata.insert(
    "SharedSourcesDir".to_string(),
    format!("{}{}", dir.join("shared").display(), MAIN_SEPARATOR),
  );
  metadata.insert(
    "GeneratedBuildInfoFile".to_string(),
    dir.join("BuildInfo.generated.cs").display().to_string(),
  );
  metadata.insert("ProjectGroup".to_string(), dir.parent().map(file_name).unwrap_or_default());

  debug!(project = %full_path.display(), entries = metadata.len(), "gathered project metadata");

  Ok(ProjectItem {
    spec: project.display().to_string(),
    metadata,
  })
}
