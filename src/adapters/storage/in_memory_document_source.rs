//! In-Memory Document Source Adapter
//!
//! Serves fixed collections from memory. Useful for testing and for
//! embedding the engine behind another loader.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::facts::{DocumentTypeDef, FactType, RawDocument, TagDef};
use crate::ports::{DocumentSource, SourceError};

#[derive(Debug, Default)]
struct Collections {
    documents: Vec<RawDocument>,
    fact_types: Vec<FactType>,
    document_types: Vec<DocumentTypeDef>,
    tags: Vec<TagDef>,
}

/// In-memory source for raw documents and reference collections
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source over the given collections
    pub fn with_data(
        documents: Vec<RawDocument>,
        fact_types: Vec<FactType>,
        document_types: Vec<DocumentTypeDef>,
        tags: Vec<TagDef>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collections {
                documents,
                fact_types,
                document_types,
                tags,
            })),
        }
    }

    /// Add a raw document
    pub async fn add_document(&self, document: RawDocument) {
        self.inner.write().await.documents.push(document);
    }

    /// Get the number of stored documents
    pub async fn document_count(&self) -> usize {
        self.inner.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn fetch_documents(&self) -> Result<Vec<RawDocument>, SourceError> {
        Ok(self.inner.read().await.documents.clone())
    }

    async fn fetch_fact_types(&self) -> Result<Vec<FactType>, SourceError> {
        Ok(self.inner.read().await.fact_types.clone())
    }

    async fn fetch_document_types(&self) -> Result<Vec<DocumentTypeDef>, SourceError> {
        Ok(self.inner.read().await.document_types.clone())
    }

    async fn fetch_tags(&self) -> Result<Vec<TagDef>, SourceError> {
        Ok(self.inner.read().await.tags.clone())
    }
}
