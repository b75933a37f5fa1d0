//! Schedule Writer Port - Interface for persisting computed documents.

use async_trait::async_trait;

use crate::domain::document::Document;

/// Errors that can occur while writing results
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("Failed to serialize documents: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for writing computed documents with their schedules and QC flags
#[async_trait]
pub trait ScheduleWriter: Send + Sync {
    /// Write the full processed document set.
    ///
    /// # Errors
    /// Returns `WriterError` if serialization or the write fails
    async fn write_documents(&self, documents: &[Document]) -> Result<(), WriterError>;
}
