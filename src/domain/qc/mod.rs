//! QC rule engine - data completeness and consistency flags.

mod rules;

pub use rules::{run_qc, QcSettings, DEFAULT_OUT_OF_SCOPE_TYPES};

use crate::domain::document::{Document, DocumentPhase};

impl Document {
    /// Replaces the document's QC flags with a fresh run.
    pub fn with_qc(mut self, settings: &QcSettings) -> Self {
        self.qc_flags = run_qc(&self, settings);
        self.phase = DocumentPhase::Checked;
        self
    }
}
