//! ProcessDocumentsHandler - Batch handler running every phase over the
//! full document set.
//!
//! Phases run in order, each completing for all documents before the next
//! starts: build, schedules, amendment merge, deed merge, QC. The merge
//! phases search across the whole set by agreement group.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::domain::document::{Document, DocumentBuilder};
use crate::domain::facts::{FactRegistry, RawDocument, ReferenceData};
use crate::domain::merge::{apply_all_amendments, resolve_deeds};
use crate::domain::qc::QcSettings;
use crate::ports::{DocumentSource, ScheduleWriter, SourceError, WriterError};

/// Command to process every document the source provides.
#[derive(Debug, Clone)]
pub struct ProcessDocumentsCommand {
    /// Write results through the schedule writer.
    pub write_output: bool,
}

impl Default for ProcessDocumentsCommand {
    fn default() -> Self {
        Self { write_output: true }
    }
}

/// Counts describing one processing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingSummary {
    pub documents: usize,
    pub amendments: usize,
    pub deeds: usize,
    pub payments: usize,
    pub total_payment_amount: Decimal,
    pub qc_flags: usize,
    pub documents_with_flags: usize,
}

impl ProcessingSummary {
    pub fn from_documents(documents: &[Document]) -> Self {
        documents.iter().fold(Self::default(), |mut summary, doc| {
            summary.documents += 1;
            summary.amendments += usize::from(doc.is_amendment());
            summary.deeds += usize::from(doc.is_deed());
            summary.payments += doc.all_payments().count();
            summary.total_payment_amount = summary
                .total_payment_amount
                .saturating_add(doc.total_payments());
            summary.qc_flags += doc.qc_flags.len();
            summary.documents_with_flags += usize::from(!doc.qc_flags.is_empty());
            summary
        })
    }
}

/// Result of a processing run.
#[derive(Debug, Clone)]
pub struct ProcessDocumentsResult {
    /// Documents in source order, fully computed and checked.
    pub documents: Vec<Document>,
    pub summary: ProcessingSummary,
}

/// Error type for document processing.
#[derive(Debug)]
pub enum ProcessDocumentsError {
    /// Loading documents or reference data failed.
    Source(SourceError),
    /// Writing results failed.
    Writer(WriterError),
}

impl std::fmt::Display for ProcessDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessDocumentsError::Source(err) => write!(f, "Source error: {}", err),
            ProcessDocumentsError::Writer(err) => write!(f, "Writer error: {}", err),
        }
    }
}

impl std::error::Error for ProcessDocumentsError {}

impl From<SourceError> for ProcessDocumentsError {
    fn from(err: SourceError) -> Self {
        ProcessDocumentsError::Source(err)
    }
}

impl From<WriterError> for ProcessDocumentsError {
    fn from(err: WriterError) -> Self {
        ProcessDocumentsError::Writer(err)
    }
}

/// Runs every phase over already-loaded data.
///
/// Never fails: incomplete documents degrade to empty schedules and QC flags.
pub fn process_documents(
    raws: &[RawDocument],
    reference: &ReferenceData,
    qc: &QcSettings,
) -> Vec<Document> {
    let registry = FactRegistry::resolve(reference);

    let built = DocumentBuilder::new(&registry, reference).build_all(raws);
    info!(documents = built.len(), "Built documents");

    let priced: Vec<Document> = built.into_iter().map(Document::with_schedules).collect();
    let amended = apply_all_amendments(priced);
    let deeded = resolve_deeds(amended);
    info!(documents = deeded.len(), "Merged amendments and deeds");

    deeded.into_iter().map(|doc| doc.with_qc(qc)).collect()
}

/// Handler for batch document processing.
pub struct ProcessDocumentsHandler {
    source: Arc<dyn DocumentSource>,
    writer: Arc<dyn ScheduleWriter>,
    qc: QcSettings,
}

impl ProcessDocumentsHandler {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        writer: Arc<dyn ScheduleWriter>,
        qc: QcSettings,
    ) -> Self {
        Self { source, writer, qc }
    }

    pub async fn handle(
        &self,
        cmd: ProcessDocumentsCommand,
    ) -> Result<ProcessDocumentsResult, ProcessDocumentsError> {
        // 1. Load reference data and documents
        let (reference, raws) = futures::try_join!(
            self.source.fetch_reference_data(),
            self.source.fetch_documents()
        )?;
        info!(
            documents = raws.len(),
            fact_types = reference.fact_types.len(),
            "Loaded source data"
        );

        // 2. Run the phases
        let documents = process_documents(&raws, &reference, &self.qc);
        let summary = ProcessingSummary::from_documents(&documents);

        // 3. Persist
        if cmd.write_output {
            self.writer.write_documents(&documents).await?;
        }

        info!(
            documents = summary.documents,
            payments = summary.payments,
            qc_flags = summary.qc_flags,
            "Processed documents"
        );
        Ok(ProcessDocumentsResult { documents, summary })
    }
}
