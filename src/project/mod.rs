//! Project descriptor handling
//!
//! - **metadata**: enrich `project.json` descriptors with build metadata
//! - [`dump_lines`]: human-readable listing of items and their metadata

pub mod metadata;

pub use metadata::{ProjectItem, gather_all};

/// Render items as `spec` followed by ` name = value` lines
pub fn dump_lines(items: &[ProjectItem]) -> Vec<String> {
  let mut lines = Vec::new();
  for item in items {
    lines.push(item.spec.clone());
    for (name, value) in &item.metadata {
      lines.push(format!(" {} = {}", name, value));
    }
  }
  lines
}
