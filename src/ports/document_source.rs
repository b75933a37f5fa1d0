//! Document Source Port - Interface for loading upstream documents and
//! their reference collections.
//!
//! The engine consumes plain data; how it was fetched (API export, files on
//! disk, fixtures) is the adapter's concern.

use async_trait::async_trait;

use crate::domain::facts::{DocumentTypeDef, FactType, RawDocument, ReferenceData, TagDef};

/// Errors that can occur while loading source data
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source collection not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {collection}: {reason}")]
    ParseFailed { collection: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for loading raw documents and reference collections
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load every raw document to process.
    async fn fetch_documents(&self) -> Result<Vec<RawDocument>, SourceError>;

    /// Load fact type definitions, including archived ones.
    async fn fetch_fact_types(&self) -> Result<Vec<FactType>, SourceError>;

    /// Load document type definitions.
    async fn fetch_document_types(&self) -> Result<Vec<DocumentTypeDef>, SourceError>;

    /// Load tag definitions.
    async fn fetch_tags(&self) -> Result<Vec<TagDef>, SourceError>;

    /// Load all three reference collections as one lookup table.
    async fn fetch_reference_data(&self) -> Result<ReferenceData, SourceError> {
        let (fact_types, document_types, tags) = futures::try_join!(
            self.fetch_fact_types(),
            self.fetch_document_types(),
            self.fetch_tags()
        )?;
        Ok(ReferenceData::new(fact_types, document_types, tags))
    }
}
