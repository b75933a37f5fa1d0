//! Fact extraction layer.
//!
//! Generic readers over the raw fact bag attached to each upstream document,
//! plus the reference lookups and the resolved accessor table used to pull
//! named facts out of it.
//!
//! # Components
//!
//! - `raw` - Upstream document, fact, and definition shapes
//! - `reference` - Name/id lookups over fact types, document types, and tags
//! - `record` - Typed values, per-instance records, field name normalization
//! - `extract` - Single-value, multi-instance, and sparse record readers
//! - `registry` - `FactKey`/`FactGroup` resolved once per run

mod extract;
mod raw;
mod record;
mod reference;
mod registry;

pub use extract::{extract_fact_multi_fields, extract_fact_value, extract_multi_fact_values};
pub use raw::{DataType, DocumentTypeDef, FactType, FieldType, RawDocument, RawFact, RawField, TagDef};
pub use record::{clean_field_names, FactRecord, FactSchema, FactValue, FieldSchema, ValueKind};
pub use reference::ReferenceData;
pub use registry::{FactGroup, FactKey, FactRegistry};
