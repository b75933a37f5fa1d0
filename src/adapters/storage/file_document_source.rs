//! File-based Document Source Adapter
//!
//! Reads the upstream export from a directory of JSON files:
//!
//! ```text
//! data/
//!   documents.json       # search results
//!   factTypes.json
//!   documentTypes.json
//!   tags.json
//! ```
//!
//! Each file holds either a bare array or an object wrapping the array under
//! `items`, `data`, or `documents` (the shape of a search response). Records
//! that do not parse are logged and dropped; the rest of the file still loads.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::facts::{DocumentTypeDef, FactType, RawDocument, TagDef};
use crate::ports::{DocumentSource, SourceError};

pub const DOCUMENTS_FILE: &str = "documents.json";
pub const FACT_TYPES_FILE: &str = "factTypes.json";
pub const DOCUMENT_TYPES_FILE: &str = "documentTypes.json";
pub const TAGS_FILE: &str = "tags.json";

#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    List(Vec<T>),
    Wrapped {
        #[serde(alias = "data", alias = "documents")]
        items: Vec<T>,
    },
}

impl<T> Collection<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Collection::List(items) | Collection::Wrapped { items } => items,
        }
    }
}

/// Document source reading JSON exports from a directory
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    base_path: PathBuf,
}

impl FileDocumentSource {
    /// Create a source over an export directory
    ///
    /// # Example
    /// ```ignore
    /// let source = FileDocumentSource::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    async fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, SourceError> {
        let path = self.base_path.join(file);
        if !path.exists() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }

        let json = fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::IoError(e.to_string()))?;

        let raw = serde_json::from_str::<Collection<serde_json::Value>>(&json)
            .map_err(|e| SourceError::ParseFailed {
                collection: file.to_string(),
                reason: e.to_string(),
            })?
            .into_vec();
        let total = raw.len();

        let items: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(error) => {
                    warn!(file, index, %error, "Skipping unreadable record");
                    None
                }
            })
            .collect();

        debug!(file, count = items.len(), skipped = total - items.len(), "Loaded source collection");
        Ok(items)
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn fetch_documents(&self) -> Result<Vec<RawDocument>, SourceError> {
        self.read_collection(DOCUMENTS_FILE).await
    }

    async fn fetch_fact_types(&self) -> Result<Vec<FactType>, SourceError> {
        self.read_collection(FACT_TYPES_FILE).await
    }

    async fn fetch_document_types(&self) -> Result<Vec<DocumentTypeDef>, SourceError> {
        self.read_collection(DOCUMENT_TYPES_FILE).await
    }

    async fn fetch_tags(&self) -> Result<Vec<TagDef>, SourceError> {
        self.read_collection(TAGS_FILE).await
    }
}
