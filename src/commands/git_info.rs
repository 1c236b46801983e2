//! `feedrail git-info`: active branch and commit

use crate::core::error::{GitError, RailError, RailResult};
use crate::core::vcs::GitCommitInfo;
use std::env;
use std::path::PathBuf;

/// Run the git-info command
///
/// A missing or unusual `.git` layout is reported but never fails the build;
/// `warn_on_error` only raises the report from info to warning.
pub fn run_git_info(repo: Option<PathBuf>, warn_on_error: bool, json: bool) -> RailResult<()> {
  let repo_root = match repo {
    Some(path) if !path.is_dir() => return Err(RailError::Git(GitError::RepoNotFound { path })),
    Some(path) => path,
    None => env::current_dir()?,
  };

  let info = GitCommitInfo::read(&repo_root);

  if let Some(problem) = &info.problem {
    if warn_on_error {
      eprintln!("⚠️  {}", problem);
    } else if json {
      // stdout is reserved for the JSON document
      eprintln!("ℹ️  {}", problem);
    } else {
      println!("ℹ️  {}", problem);
    }
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&info)?);
  } else {
    println!("Branch: {}", info.branch.as_deref().unwrap_or(""));
    println!("Commit: {}", info.commit.as_deref().unwrap_or(""));
  }

  Ok(())
}
