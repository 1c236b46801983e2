//! Branch and commit lookup straight from `.git` metadata files
//!
//! No git process is spawned: build agents often have a checkout without a
//! usable git binary on PATH. Only the common layouts are understood:
//! a symbolic `HEAD` pointing at `refs/heads/<branch>`, resolved through a
//! loose ref file or `packed-refs`.

use crate::core::error::GitError;
use serde::Serialize;
use std::fs;
use std::path::Path;

const HEAD_PREFIX: &str = "ref: refs/heads/";

/// Active branch and its commit
///
/// Fields stay `None` when they could not be determined; `problem` says why.
#[derive(Debug, Default, Serialize)]
pub struct GitCommitInfo {
  pub branch: Option<String>,
  pub commit: Option<String>,
  #[serde(skip)]
  pub problem: Option<GitError>,
}

impl GitCommitInfo {
  /// Read branch and commit for the repository at `repo_root`
  pub fn read(repo_root: &Path) -> Self {
    let mut info = Self::default();
    let git_dir = repo_root.join(".git");

    let head = match fs::read_to_string(git_dir.join("HEAD")) {
      Ok(content) => content,
      Err(_) => {
        info.problem = Some(GitError::RefUnresolved {
          message: "Unable to determine active git branch.".to_string(),
        });
        return info;
      }
    };

    let Some(branch) = head.trim().strip_prefix(HEAD_PREFIX) else {
      info.problem = Some(GitError::RefUnresolved {
        message: "'.git/HEAD' file in unexpected format, unable to determine active git branch".to_string(),
      });
      return info;
    };

    if branch.is_empty() {
      info.problem = Some(GitError::RefUnresolved {
        message: "Current branch appears to be empty. Failed to retrieve current branch.".to_string(),
      });
      return info;
    }
    info.branch = Some(branch.to_string());

    match resolve_branch(&git_dir, branch) {
      Some(commit) => info.commit = Some(commit),
      None => {
        info.problem = Some(GitError::RefUnresolved {
          message: "Unable to determine current git commit hash".to_string(),
        });
      }
    }

    info
  }
}

/// Commit SHA for `refs/heads/<branch>`: loose ref first, then packed-refs
fn resolve_branch(git_dir: &Path, branch: &str) -> Option<String> {
  let mut loose = git_dir.join("refs").join("heads");
  for segment in branch.split('/') {
    loose.push(segment);
  }

  if let Ok(content) = fs::read_to_string(&loose) {
    let sha = content.trim();
    return (!sha.is_empty()).then(|| sha.to_string());
  }

  let packed = fs::read_to_string(git_dir.join("packed-refs")).ok()?;
  let wanted = format!("refs/heads/{}", branch);
  packed
    .lines()
    .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
    .filter_map(|line| line.split_once(' '))
    .find(|(_, name)| name.trim() == wanted)
    .map(|(sha, _)| sha.to_string())
}
