use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "selfupgrade.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".selfupgrade.toml";

/// Represents the complete configuration for self-upgrade.
///
/// Contains where releases come from, the default resolution policy, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Returns the default GitHub API base URL.
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// Returns the default `User-Agent`, naming this build.
fn default_user_agent() -> String {
    format!("self-upgrade/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for the release source.
///
/// Identifies the repository whose releases are checked and how requests are made.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// Repository in `owner/name` form
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Freshness window used when the server sends no `max-age`
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            repository: None,
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default resolution policy; command-line flags override it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PolicyConfig {
    /// Consider pre-release versions
    #[serde(default)]
    pub preview: bool,

    /// Stay on the running major version
    #[serde(default)]
    pub compatible: bool,

    /// Range expression releases must satisfy, e.g. ">=1.2, <2.0"
    #[serde(default)]
    pub version_constraint: Option<String>,
}

/// Configuration for behavior customization.
///
/// Controls runtime behavior without affecting which release is resolved.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub skip_confirmation: bool,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `selfupgrade.toml` in current directory
/// 3. `.selfupgrade.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
