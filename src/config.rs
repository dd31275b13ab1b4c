//! Runtime configuration sourced from the environment.
//!
//! `.env` is loaded by the binary before [`AppConfig::from_env`] runs, so
//! either real environment variables or a dotenv file can supply values.

use anyhow::Result;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;

use crate::dataset::Dataset;

/// Path to a dataset JSON file used when `--dataset` is not given.
pub const DATASET_ENV: &str = "KIGALI_FARES_DATASET";
/// Path of the rolling JSON log file.
pub const LOG_FILE_ENV: &str = "LOG_FILE_PATH";

const DEFAULT_LOG_FILE: &str = "logs/kigali_fares.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: Option<String>,
    pub log_file_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            dataset_path: lookup(DATASET_ENV).filter(|p| !p.is_empty()),
            log_file_path: lookup(LOG_FILE_ENV)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }

    /// A path given on the command line wins over the environment.
    pub fn with_dataset(mut self, path: Option<String>) -> Self {
        if path.is_some() {
            self.dataset_path = path;
        }
        self
    }

    /// Directory and file name for the rolling log appender.
    pub fn log_location(&self) -> (&Path, &OsStr) {
        let path = Path::new(&self.log_file_path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("logs"));
        let file = path
            .file_name()
            .unwrap_or(OsStr::new("kigali_fares.log"));
        (dir, file)
    }

    /// Loads the configured dataset, or the bundled sample when none is set.
    pub fn load_dataset(&self) -> Result<Dataset> {
        match &self.dataset_path {
            Some(path) => {
                info!(path = %path, "Loading dataset from file");
                Dataset::load(path)
            }
            None => {
                info!("Using bundled sample dataset");
                Ok(Dataset::sample())
            }
        }
    }
}
