//! Configuration file support for medsched.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medsched/config.toml`.

use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub reasoning: ReasoningConfig,
}

/// Rule file location
#[derive(Clone, Debug, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_rules_dir")]
    pub dir: PathBuf,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dir: default_rules_dir(),
        }
    }
}

/// Schedule source; the demo schedule is used when no file is set
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ScheduleConfig {
    pub file: Option<PathBuf>,
}

/// Whether the delegated reasoning capability may be used
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ReasoningConfig {
    #[serde(default)]
    pub enabled: bool,

    pub api_key: Option<String>,
}

impl ReasoningConfig {
    /// Enabled and carrying a non-empty credential
    pub fn is_configured(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("medsched").join("config.toml")
    }
}
