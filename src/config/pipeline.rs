//! Pipeline configuration

use serde::Deserialize;

use crate::domain::qc::{QcSettings, DEFAULT_OUT_OF_SCOPE_TYPES};

/// Settings for the processing phases
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Document types skipped by QC (comma-separated)
    #[serde(default = "default_qc_out_of_scope_types")]
    pub qc_out_of_scope_types: String,
}

impl PipelineConfig {
    /// Get out-of-scope document types as a vector
    pub fn qc_out_of_scope_types_list(&self) -> Vec<String> {
        self.qc_out_of_scope_types
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// QC settings derived from this configuration
    pub fn qc_settings(&self) -> QcSettings {
        QcSettings {
            out_of_scope_types: self.qc_out_of_scope_types_list(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            qc_out_of_scope_types: default_qc_out_of_scope_types(),
        }
    }
}

fn default_qc_out_of_scope_types() -> String {
    DEFAULT_OUT_OF_SCOPE_TYPES.join(",")
}
