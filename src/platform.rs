//! Host platform naming used by build scripts

use crate::core::error::{RailError, RailResult, ValidationError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
  Windows,
  Linux,
  #[serde(rename = "macOS")]
  MacOs,
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Platform::Windows => "Windows",
      Platform::Linux => "Linux",
      Platform::MacOs => "macOS",
    };
    f.write_str(name)
  }
}

/// Platform for a `std::env::consts::OS` value
pub fn from_os(os: &str) -> RailResult<Platform> {
  match os {
    "windows" => Ok(Platform::Windows),
    "linux" => Ok(Platform::Linux),
    "macos" => Ok(Platform::MacOs),
    _ => Err(RailError::Validation(ValidationError::UnknownPlatform)),
  }
}

/// Platform the build is running on
pub fn detect() -> RailResult<Platform> {
  from_os(std::env::consts::OS)
}
