//! Startup settings read from TOML in the application directory.
//!
//! Config keys: `service.base_url`, `service.max_fetch_attempts`,
//! `service.retry_base_delay_ms`, `service.manual_entry_encoding`,
//! `grid.page_size`, `chart.graph_type`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, de::Error as SerdeDeError};
use thiserror::Error;

use crate::app_dirs::{self, AppPaths};
use crate::http_client::RetryConfig;
use crate::record_service::{HttpRecordService, ManualEntryEncoding};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Record store used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

const MAX_FETCH_ATTEMPTS: u32 = 10;
const MAX_PAGE_SIZE: usize = 500;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config directory unavailable: {0}")]
    Directory(#[from] app_dirs::AppDirError),
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config format in {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid service.base_url {url:?}: {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Chart rendering style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    #[default]
    Line,
    Bar,
}

impl GraphType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Line => "Line Chart",
            Self::Bar => "Bar Chart",
        }
    }
}

/// Aggregate application settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

/// Where and how to reach the record store.
///
/// Config keys: `base_url`, `max_fetch_attempts`, `retry_base_delay_ms`,
/// `manual_entry_encoding`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_fetch_attempts")]
    pub max_fetch_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default)]
    pub manual_entry_encoding: ManualEntryEncoding,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_fetch_attempts: default_fetch_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            manual_entry_encoding: ManualEntryEncoding::default(),
        }
    }
}

impl ServiceSettings {
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_fetch_attempts as usize,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: MAX_RETRY_DELAY,
        }
    }

    /// Build the HTTP client described by these settings.
    pub fn build_service(&self) -> Result<HttpRecordService, ConfigError> {
        HttpRecordService::new(&self.base_url)
            .map(|service| {
                service
                    .with_retry(self.retry_config())
                    .with_entry_encoding(self.manual_entry_encoding)
            })
            .map_err(|source| ConfigError::BaseUrl {
                url: self.base_url.clone(),
                source,
            })
    }
}

/// Data grid preferences. Config keys: `page_size`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GridSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Chart preferences. Config keys: `graph_type`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ChartSettings {
    #[serde(default)]
    pub graph_type: GraphType,
}

impl AppConfig {
    fn normalized(mut self) -> Self {
        self.service.max_fetch_attempts = self.service.max_fetch_attempts.clamp(1, MAX_FETCH_ATTEMPTS);
        self.grid.page_size = self.grid.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// Resolve the configuration file path. The file may not exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(AppPaths::resolve()?.root().join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load configuration from a specific file; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str::<AppConfig>(&text)
        .map(AppConfig::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_fetch_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    250
}

fn default_page_size() -> usize {
    10
}
