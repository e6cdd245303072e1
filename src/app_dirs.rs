//! Where the board keeps its config file and per-launch logs.
//!
//! Everything lives in one `.unicorn_board` folder under the OS config
//! directory. `UNICORN_BOARD_CONFIG_HOME` replaces that base, which tests and
//! portable installs use.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

pub const APP_DIR_NAME: &str = ".unicorn_board";
/// Environment variable replacing the OS config directory as the base.
pub const CONFIG_HOME_ENV: &str = "UNICORN_BOARD_CONFIG_HOME";
const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory available; set {CONFIG_HOME_ENV}")]
    NoBaseDir,
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolved application folder. Nothing is created until asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Resolve from the environment override, else the OS config directory.
    pub fn resolve() -> Result<Self, AppDirError> {
        let base = std::env::var_os(CONFIG_HOME_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
            .ok_or(AppDirError::NoBaseDir)?;
        Ok(Self::under(base))
    }

    pub fn under(base: impl Into<PathBuf>) -> Self {
        Self {
            root: base.into().join(APP_DIR_NAME),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR_NAME)
    }

    /// Create the logs folder (and the root with it).
    pub fn create_logs_dir(&self) -> Result<PathBuf, AppDirError> {
        let path = self.logs_dir();
        std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
