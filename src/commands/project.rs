//! `feedrail project-metadata`: enrich project descriptors

use crate::core::error::RailResult;
use crate::project::{dump_lines, gather_all};
use std::path::PathBuf;

/// Run the project-metadata command
pub fn run_project_metadata(projects: Vec<PathBuf>, json: bool) -> RailResult<()> {
  let items = gather_all(&projects)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&items)?);
    eprintln!("Collected metadata for {} projects", items.len());
  } else {
    for line in dump_lines(&items) {
      println!("{}", line);
    }
    println!("Collected metadata for {} projects", items.len());
  }

  Ok(())
}
