//! Core building blocks shared by every command
//!
//! - **config**: feedrail.toml discovery, parsing and flag merging
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git branch/commit lookup from repository metadata

pub mod config;
pub mod error;
pub mod vcs;
