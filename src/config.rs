//! Configuration for the rate source and the curve store
//!
//! Settings can come from a TOML file (default `~/.rusty-curves/config.toml`),
//! while the API credential is always read from the environment.

use crate::error::{CurveError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the FRED API key
pub const API_KEY_ENV: &str = "FRED_API_KEY";

/// Environment variable overriding the FRED endpoint
pub const BASE_URL_ENV: &str = "FRED_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FILE_NAME: &str = "discount_factors.csv";

/// First date requested on a full rebuild
pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Connection settings for the remote rate source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl SourceConfig {
    /// Create with the default endpoint and timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override the endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Build from `FRED_API_KEY` / `FRED_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CurveError::ConfigError(format!("{} not set", API_KEY_ENV)))?;

        let mut config = SourceConfig::new(api_key);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        Ok(config)
    }
}

/// Location of the persisted discount factor history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Full path of the store file
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

/// File-backed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rusty-curves")
        .join("rates")
        .join("processed")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            epoch: default_epoch(),
        }
    }
}

impl Settings {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".rusty-curves").join("config.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| CurveError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Load from an explicit path, else the default location, else defaults
    ///
    /// An explicit path that cannot be read or parsed is an error; a missing
    /// default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            let contents = fs::read_to_string(config_path).map_err(|e| {
                CurveError::ConfigError(format!(
                    "Failed to read config {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            return Self::from_toml(&contents);
        }

        match Self::default_path() {
            Some(default_config) if default_config.exists() => {
                let contents = fs::read_to_string(&default_config)?;
                Self::from_toml(&contents)
            }
            _ => Ok(Settings::default()),
        }
    }

    /// Store location described by these settings
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.data_dir.clone())
    }

    /// Apply endpoint and timeout settings onto a source config
    pub fn apply_to(&self, mut source: SourceConfig) -> SourceConfig {
        if let Some(url) = &self.base_url {
            source.base_url = url.clone();
        }
        source.timeout_secs = self.timeout_secs;
        source
    }
}
