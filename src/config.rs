use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Id, FREE_TIER_MAX_PROPERTIES};

pub const CONFIG_FILE_NAME: &str = "propfolio.toml";

fn default_user_id() -> String {
    "default".to_string()
}

/// Display/output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency symbol prefixed to money values.
    pub currency_symbol: Option<String>,

    /// Decimal places shown for money values. `None` shows full precision.
    ///
    /// Presentation only; calculations are never rounded.
    pub currency_decimals: Option<u32>,

    /// Render money with thousands separators.
    pub currency_grouping: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: Some("$".to_string()),
            currency_decimals: Some(0),
            currency_grouping: true,
        }
    }
}

/// Subscription limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of properties on the free tier.
    pub free_tier_max_properties: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            free_tier_max_properties: FREE_TIER_MAX_PROPERTIES,
        }
    }
}

/// Application configuration, as written in `propfolio.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    /// Profile whose portfolio commands operate on.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_id: default_user_id(),
            display: DisplayConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub user_id: Id,
    pub display: DisplayConfig,
    pub limits: LimitsConfig,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./propfolio.toml` if it exists in current directory
/// 2. `propfolio/propfolio.toml` under the platform data directory
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from(CONFIG_FILE_NAME);
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("propfolio").join(CONFIG_FILE_NAME);
    }

    local_config
}

impl ResolvedConfig {
    fn from_config(config: Config, config_dir: &Path) -> Result<Self> {
        let data_dir = config.resolve_data_dir(config_dir);
        let user_id = Id::from_string_checked(config.user_id)
            .context("Invalid user_id in config")?;
        Ok(Self {
            data_dir,
            user_id,
            display: config.display,
            limits: config.limits,
        })
    }

    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        Self::from_config(config, config_dir)
    }

    /// Load config, falling back to defaults when the file doesn't exist.
    ///
    /// Without a file, the directory the config would live in becomes the
    /// data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };

        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        Self::from_config(Config::default(), config_dir)
    }
}
