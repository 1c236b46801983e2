//! CLI commands for feedrail
//!
//! ## Publishing
//! - **publish**: push packages to a feed with bounded parallelism and retries
//!
//! ## Build metadata
//! - **git_info**: active branch and commit from `.git`
//! - **project**: target frameworks and layout metadata for project descriptors
//! - **environment**: host platform name, packaged tool resolution

pub mod environment;
pub mod git_info;
pub mod project;
pub mod publish;

pub use environment::{run_platform, run_resolve_tool};
pub use git_info::run_git_info;
pub use project::run_project_metadata;
pub use publish::run_publish;
