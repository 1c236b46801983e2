//! `feedrail platform` and `feedrail resolve-tool`

use crate::core::config::RailConfig;
use crate::core::error::{ConfigError, RailError, RailResult};
use crate::{platform, tools};
use std::env;
use std::path::PathBuf;

/// Print the host platform name
pub fn run_platform(json: bool) -> RailResult<()> {
  let platform = platform::detect()?;
  if json {
    println!("{}", serde_json::json!({ "PlatformName": platform }));
  } else {
    println!("{}", platform);
  }
  Ok(())
}

/// Resolve the newest installed version of a packaged tool
pub fn run_resolve_tool(
  package_id: String,
  packages_dir: Option<PathBuf>,
  relative_path: PathBuf,
  json: bool,
) -> RailResult<()> {
  let workspace_root = env::current_dir()?;

  let packages_dir = match packages_dir {
    Some(dir) => dir,
    None => RailConfig::load(&workspace_root)?
      .tools
      .packages_dir
      .map(|dir| workspace_root.join(dir))
      .ok_or_else(|| {
        RailError::Config(ConfigError::MissingField {
          field: "packages_dir".to_string(),
        })
      })?,
  };

  let tool = tools::resolve(&packages_dir, &package_id, &relative_path)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&tool)?);
  } else {
    println!("🔧 Resolved tool: {}", tool.path.display());
    println!("   Version: {}", tool.version);
  }
  Ok(())
}
