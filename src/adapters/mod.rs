//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - File and in-memory document sources and schedule writers

pub mod storage;

pub use storage::{
    FileDocumentSource, FileScheduleWriter, InMemoryDocumentSource, InMemoryScheduleWriter,
};
