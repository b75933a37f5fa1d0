//! Storage Adapters
//!
//! Implementations of the DocumentSource and ScheduleWriter ports.
//!
//! ## Available Adapters
//!
//! - **FileDocumentSource** - Reads the upstream JSON export from a directory
//! - **InMemoryDocumentSource** - Serves collections from memory (testing)
//! - **FileScheduleWriter** - Writes computed documents as JSON or YAML
//! - **InMemoryScheduleWriter** - Records written batches (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileDocumentSource, FileScheduleWriter};
//!
//! let source = FileDocumentSource::new("./data");
//! let writer = FileScheduleWriter::new("./output", OutputFormat::Json);
//! ```

mod file_document_source;
mod file_schedule_writer;
mod in_memory_document_source;
mod in_memory_schedule_writer;

pub use file_document_source::{
    FileDocumentSource, DOCUMENTS_FILE, DOCUMENT_TYPES_FILE, FACT_TYPES_FILE, TAGS_FILE,
};
pub use file_schedule_writer::FileScheduleWriter;
pub use in_memory_document_source::InMemoryDocumentSource;
pub use in_memory_schedule_writer::InMemoryScheduleWriter;
