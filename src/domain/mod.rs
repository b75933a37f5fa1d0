//! Domain layer containing the agreement document engine.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, calendar arithmetic, growth formulas, errors)
//! - `facts` - Upstream fact bag types, reference lookups and the typed fact registry
//! - `document` - Normalized document model, payment models and the document builder
//! - `schedule` - Term dates and payment schedule computation
//! - `merge` - Amendment overlay and deed resolution across agreement groups
//! - `qc` - Data completeness and consistency flags

pub mod document;
pub mod facts;
pub mod foundation;
pub mod merge;
pub mod qc;
pub mod schedule;
