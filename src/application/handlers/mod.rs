//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod process_documents;

pub use process_documents::{
    process_documents, ProcessDocumentsCommand, ProcessDocumentsError, ProcessDocumentsHandler,
    ProcessDocumentsResult, ProcessingSummary,
};
