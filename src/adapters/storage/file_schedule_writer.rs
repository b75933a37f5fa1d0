//! File-based Schedule Writer Adapter
//!
//! Writes the processed document set as a single JSON or YAML file in the
//! output directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::OutputFormat;
use crate::domain::document::Document;
use crate::ports::{ScheduleWriter, WriterError};

/// File-based writer for computed documents
#[derive(Debug, Clone)]
pub struct FileScheduleWriter {
    base_path: PathBuf,
    format: OutputFormat,
}

impl FileScheduleWriter {
    /// Create a writer into an output directory
    pub fn new<P: AsRef<Path>>(base_path: P, format: OutputFormat) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            format,
        }
    }

    /// Path of the file the writer produces
    pub fn output_file_path(&self) -> PathBuf {
        self.base_path
            .join(format!("documents.{}", self.format.extension()))
    }

    fn serialize(&self, documents: &[Document]) -> Result<String, WriterError> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(documents)
                .map_err(|e| WriterError::SerializationFailed(e.to_string())),
            OutputFormat::Yaml => serde_yaml::to_string(documents)
                .map_err(|e| WriterError::SerializationFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl ScheduleWriter for FileScheduleWriter {
    async fn write_documents(&self, documents: &[Document]) -> Result<(), WriterError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| WriterError::IoError(e.to_string()))?;

        let body = self.serialize(documents)?;
        let path = self.output_file_path();
        fs::write(&path, body)
            .await
            .map_err(|e| WriterError::IoError(e.to_string()))?;

        info!(path = %path.display(), documents = documents.len(), "Wrote documents");
        Ok(())
    }
}
