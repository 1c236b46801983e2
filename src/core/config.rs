use crate::core::error::{ConfigError, RailError, RailResult, ResultExt};
use crate::publish::scheduler::{DEFAULT_RETRIES, PublishOptions, default_parallelism};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for feedrail
/// Searched in order: feedrail.toml, .feedrail.toml, .cargo/feedrail.toml, .config/feedrail.toml
///
/// Every setting is optional; command-line flags win over the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RailConfig {
  #[serde(default)]
  pub publish: PublishConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
}

/// `[publish]` section
///
/// # Example
///
/// ```toml
/// [publish]
/// feed = "https://pkgs.example.com/v3/index.json"
/// api_key_env = "FEED_API_KEY"
/// parallelism = 8
/// timeout_secs = 300
/// retries = 10
/// command = ["dotnet", "nuget", "push", "{package}", "--source", "{feed}", "--api-key", "{api_key}"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
  /// Feed URL or local directory
  #[serde(default)]
  pub feed: Option<String>,

  /// Name of the environment variable holding the API key
  /// (keys themselves never live in the file)
  #[serde(default)]
  pub api_key_env: Option<String>,

  /// Maximum concurrent pushes (default: 2 x available cores)
  #[serde(default)]
  pub parallelism: Option<usize>,

  /// Per-push timeout forwarded to the client; 0 = client default
  #[serde(default)]
  pub timeout_secs: Option<u64>,

  /// Extra attempts per package after the first failure (default: 10)
  #[serde(default)]
  pub retries: Option<u32>,

  /// Push client command template (see `CommandPusher`)
  #[serde(default)]
  pub command: Option<Vec<String>>,
}

/// `[tools]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
  /// Root of the installed package folders (`<dir>/<id>/<version>/...`)
  #[serde(default)]
  pub packages_dir: Option<PathBuf>,
}

/// Values given on the command line for `publish`
#[derive(Debug, Clone, Default)]
pub struct PublishOverrides {
  pub feed: Option<String>,
  pub api_key: Option<String>,
  pub parallelism: Option<usize>,
  pub timeout_secs: Option<u64>,
  pub retries: Option<u32>,
}

/// Fully resolved publish settings
#[derive(Debug, Clone)]
pub struct PublishSettings {
  pub feed: String,
  pub api_key: Option<String>,
  pub options: PublishOptions,
  pub command: Option<Vec<String>>,
}

impl RailConfig {
  /// Find config file in search order: feedrail.toml, .feedrail.toml, .cargo/feedrail.toml, .config/feedrail.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("feedrail.toml"),
      path.join(".feedrail.toml"),
      path.join(".cargo").join("feedrail.toml"),
      path.join(".config").join("feedrail.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the first file found, or defaults when there is none
  pub fn load(path: &Path) -> RailResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: RailConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .publish
      .validate()
      .with_context(|| format!("Invalid [publish] configuration in {}", config_path.display()))?;

    Ok(config)
  }
}

impl PublishConfig {
  /// Validate values that can be checked without flags
  pub fn validate(&self) -> RailResult<()> {
    if self.parallelism == Some(0) {
      return Err(RailError::Config(ConfigError::InvalidValue {
        field: "parallelism".to_string(),
        reason: "must be at least 1".to_string(),
      }));
    }

    if let Some(command) = &self.command
      && command.first().is_none_or(|program| program.trim().is_empty())
    {
      return Err(RailError::Config(ConfigError::InvalidValue {
        field: "command".to_string(),
        reason: "must start with a program name".to_string(),
      }));
    }

    if let Some(var) = &self.api_key_env
      && var.trim().is_empty()
    {
      return Err(RailError::Config(ConfigError::InvalidValue {
        field: "api_key_env".to_string(),
        reason: "must name an environment variable".to_string(),
      }));
    }

    Ok(())
  }

  /// Merge flags over file values over defaults
  pub fn resolve(&self, overrides: PublishOverrides) -> RailResult<PublishSettings> {
    let feed = overrides
      .feed
      .or_else(|| self.feed.clone())
      .filter(|feed| !feed.trim().is_empty())
      .ok_or_else(|| {
        RailError::Config(ConfigError::MissingField {
          field: "feed".to_string(),
        })
      })?;

    let api_key = match overrides.api_key {
      Some(key) => Some(key),
      None => match &self.api_key_env {
        Some(var) => Some(env::var(var).with_context(|| {
          format!("[publish] api_key_env names '{}', which is not set", var)
        })?),
        None => None,
      },
    };

    let parallelism = overrides
      .parallelism
      .or(self.parallelism)
      .unwrap_or_else(default_parallelism);
    if parallelism == 0 {
      return Err(RailError::Config(ConfigError::InvalidValue {
        field: "parallelism".to_string(),
        reason: "must be at least 1".to_string(),
      }));
    }

    let timeout = match overrides.timeout_secs.or(self.timeout_secs).unwrap_or(0) {
      0 => None,
      secs => Some(Duration::from_secs(secs)),
    };

    Ok(PublishSettings {
      feed,
      api_key,
      options: PublishOptions {
        parallelism,
        retries: overrides.retries.or(self.retries).unwrap_or(DEFAULT_RETRIES),
        timeout,
      },
      command: self.command.clone(),
    })
  }
}
