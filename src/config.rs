//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\playlist-porter\config.toml
//! - macOS: ~/Library/Application Support/playlist-porter/config.toml
//! - Linux: ~/.config/playlist-porter/config.toml
//!
//! The config file is human-readable and editable. Provider sections only
//! hold overrides; anything left out falls back to that provider's defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::convert::quota::{CostTable, QuotaSettings};
use crate::convert::{Catalog, ConversionSettings};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion behaviour shared by both directions
    pub conversion: ConversionConfig,

    /// YouTube Data API overrides
    pub youtube: ProviderConfig,

    /// Spotify Web API overrides
    pub spotify: ProviderConfig,
}

/// Conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Quoted queries and authoritative-upload ranking
    pub precise: bool,

    /// Only convert the first N items of a playlist
    pub batch_limit: Option<usize>,

    /// Words appended to broad queries
    pub broad_qualifier: String,

    /// Stop a run after this many seconds
    pub deadline_secs: Option<u64>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            precise: true,
            batch_limit: None,
            broad_qualifier: "official audio".to_string(),
            deadline_secs: None,
        }
    }
}

/// Per-provider overrides (unset = provider default)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API root, for proxies
    pub base_url: Option<String>,

    /// Pause between converted items when this provider is the destination
    pub item_delay_ms: Option<u64>,

    /// Minimum spacing between any two requests to this provider
    pub min_request_interval_ms: Option<u64>,

    pub max_results_precise: Option<u32>,
    pub max_results_broad: Option<u32>,

    pub quota: QuotaConfig,
}

/// Quota overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub daily_budget: Option<u64>,
    pub safety_margin: Option<u64>,
    pub costs: Option<CostTable>,
}

/// Fully resolved settings for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub item_delay: Duration,
    pub min_request_interval: Duration,
    pub max_results_precise: u32,
    pub max_results_broad: u32,
    pub quota: QuotaSettings,
}

impl ProviderSettings {
    /// Built-in defaults for a catalog
    pub fn defaults(catalog: Catalog) -> Self {
        match catalog {
            Catalog::YouTube => Self {
                base_url: crate::providers::youtube::DEFAULT_BASE_URL.to_string(),
                item_delay: Duration::from_millis(500),
                min_request_interval: Duration::from_millis(100),
                max_results_precise: 3,
                max_results_broad: 1,
                quota: QuotaSettings::youtube(),
            },
            Catalog::Spotify => Self {
                base_url: crate::providers::spotify::DEFAULT_BASE_URL.to_string(),
                item_delay: Duration::from_millis(100),
                min_request_interval: Duration::from_millis(100),
                max_results_precise: 3,
                max_results_broad: 1,
                quota: QuotaSettings::spotify(),
            },
        }
    }
}

impl ProviderConfig {
    /// Apply these overrides on top of the catalog defaults
    pub fn resolve(&self, catalog: Catalog) -> ProviderSettings {
        let defaults = ProviderSettings::defaults(catalog);
        ProviderSettings {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            item_delay: self
                .item_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.item_delay),
            min_request_interval: self
                .min_request_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_request_interval),
            max_results_precise: self
                .max_results_precise
                .unwrap_or(defaults.max_results_precise),
            max_results_broad: self.max_results_broad.unwrap_or(defaults.max_results_broad),
            quota: QuotaSettings {
                daily_budget: self
                    .quota
                    .daily_budget
                    .unwrap_or(defaults.quota.daily_budget),
                safety_margin: self.quota.safety_margin.or(defaults.quota.safety_margin),
                costs: self.quota.costs.unwrap_or(defaults.quota.costs),
            },
        }
    }
}

impl Config {
    /// Overrides for one catalog
    pub fn provider(&self, catalog: Catalog) -> &ProviderConfig {
        match catalog {
            Catalog::YouTube => &self.youtube,
            Catalog::Spotify => &self.spotify,
        }
    }

    /// Resolved settings for one catalog
    pub fn provider_settings(&self, catalog: Catalog) -> ProviderSettings {
        self.provider(catalog).resolve(catalog)
    }

    /// Pipeline settings for a run that writes to `destination`
    pub fn conversion_settings(&self, destination: Catalog) -> ConversionSettings {
        let provider = self.provider_settings(destination);
        ConversionSettings {
            precise: self.conversion.precise,
            batch_limit: self.conversion.batch_limit,
            item_delay: provider.item_delay,
            deadline: self.conversion.deadline_secs.map(Duration::from_secs),
            broad_qualifier: self.conversion.broad_qualifier.clone(),
            max_results_precise: provider.max_results_precise,
            max_results_broad: provider.max_results_broad,
            quota: provider.quota,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playlist-porter"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`]
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
