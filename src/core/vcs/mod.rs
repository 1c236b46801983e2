pub mod git_info;

pub use git_info::GitCommitInfo;
