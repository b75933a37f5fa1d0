//! In-Memory Schedule Writer Adapter
//!
//! Keeps every written batch in memory for inspection in tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::document::Document;
use crate::ports::{ScheduleWriter, WriterError};

/// In-memory writer recording each batch
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleWriter {
    batches: Arc<RwLock<Vec<Vec<Document>>>>,
}

impl InMemoryScheduleWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents from the most recent write
    pub async fn last_batch(&self) -> Option<Vec<Document>> {
        self.batches.read().await.last().cloned()
    }

    /// Number of writes performed
    pub async fn write_count(&self) -> usize {
        self.batches.read().await.len()
    }
}

#[async_trait]
impl ScheduleWriter for InMemoryScheduleWriter {
    async fn write_documents(&self, documents: &[Document]) -> Result<(), WriterError> {
        self.batches.write().await.push(documents.to_vec());
        Ok(())
    }
}
