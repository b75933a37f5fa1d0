//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentSource` - Loads raw documents and reference collections
//! - `ScheduleWriter` - Persists computed documents

mod document_source;
mod schedule_writer;

pub use document_source::{DocumentSource, SourceError};
pub use schedule_writer::{ScheduleWriter, WriterError};
