//! Source data configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the upstream JSON export is read from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Directory holding `documents.json`, `factTypes.json`,
    /// `documentTypes.json` and `tags.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl SourceConfig {
    /// Validate source configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("source.data_dir"));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
