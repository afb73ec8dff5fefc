use crate::constants::{DEFAULT_COLLECTION, DEFAULT_DATASET_SOURCE, DEFAULT_EXPORT_TITLE, DEFAULT_PAGE_SIZE};
use crate::error::{PredictorError, Result};
use crate::model::Limit;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "predictor.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub dataset: DatasetConfig,
    pub results: ResultsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// File path or http(s) URL of the dataset document.
    pub source: String,
    /// Name of the record collection inside the document.
    pub collection: String,
    pub timeout_seconds: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_DATASET_SOURCE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl DatasetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub page_size: usize,
    pub default_limit: Limit,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_limit: Limit::All,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            title: DEFAULT_EXPORT_TITLE.to_string(),
        }
    }
}

impl PredictorConfig {
    /// Loads `path`, or the defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            PredictorError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PredictorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.results.page_size == 0 {
            return Err(PredictorError::Config("results.page_size must be at least 1".to_string()));
        }
        if self.dataset.source.trim().is_empty() {
            return Err(PredictorError::Config("dataset.source must not be empty".to_string()));
        }
        if self.dataset.collection.trim().is_empty() {
            return Err(PredictorError::Config("dataset.collection must not be empty".to_string()));
        }
        Ok(())
    }
}
