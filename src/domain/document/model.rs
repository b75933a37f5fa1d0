//! The normalized document value and its owned collections.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::nickname::nickname_grantor;
use super::payment_model::{DatePaymentModel, TermPaymentModel};
use crate::domain::facts::FactRecord;
use crate::domain::foundation::{DocumentId, FactId};

/// Document type name marking deeds.
pub const DEED_DOCUMENT_TYPE: &str = "Deed";

/// Tag set on root documents once a deed records the purchase.
pub const PURCHASED_TAG: &str = "Purchased";

/// Tag marking a terminated agreement.
pub const TERMINATED_TAG: &str = "Terminated";

/// Short codes for document types, used in reference codes.
const DOC_TYPE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Assignment", "ASGMT"),
    ("Easement", "ESMNT"),
    ("Farm and Ranch Contract", "FRC"),
    ("Interconnection Agreement", "INTCON"),
    ("Lease", "LEASE"),
    ("Lease Option", "LOPT"),
    ("Purchase and Sale Agreement", "AOS"),
    ("Purchase Option", "POPT"),
];

/// Returns the abbreviation for a document type name, if it has one.
pub fn document_type_abbreviation(document_type: &str) -> Option<&'static str> {
    DOC_TYPE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(document_type.trim()))
        .map(|(_, abbr)| *abbr)
}

// ════════════════════════════════════════════════════════════════════════════════
// DocumentPhase
// ════════════════════════════════════════════════════════════════════════════════

/// How far through the pipeline a document snapshot has been carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DocumentPhase {
    #[default]
    Built,
    Dated,
    Priced,
    Amended,
    Checked,
}

// ════════════════════════════════════════════════════════════════════════════════
// TermType
// ════════════════════════════════════════════════════════════════════════════════

/// The kind of agreement term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TermType {
    Construction,
    Operations,
    Option,
    Development,
    Extension,
    Other(String),
}

impl TermType {
    pub fn as_str(&self) -> &str {
        match self {
            TermType::Construction => "Construction",
            TermType::Operations => "Operations",
            TermType::Option => "Option",
            TermType::Development => "Development",
            TermType::Extension => "Extension",
            TermType::Other(s) => s.as_str(),
        }
    }

    /// Construction and Operations terms start from commencement dates
    /// rather than truncating on them.
    pub fn is_operational(&self) -> bool {
        matches!(self, TermType::Construction | TermType::Operations)
    }
}

impl From<String> for TermType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "construction" => TermType::Construction,
            "operations" | "operation" | "operating" => TermType::Operations,
            "option" => TermType::Option,
            "development" => TermType::Development,
            "extension" => TermType::Extension,
            _ => TermType::Other(value.trim().to_string()),
        }
    }
}

impl From<TermType> for String {
    fn from(value: TermType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment
// ════════════════════════════════════════════════════════════════════════════════

/// What produced a payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentSource {
    Term { term_ordinal: u32, model: Option<String> },
    Date { description: String },
    PurchasePrice,
}

/// One computed payment to one payee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub source: PaymentSource,
    pub payment_index: u32,
    pub payment_date: NaiveDate,
    /// Informational due date after lag; does not move the period.
    pub late_payment_date: Option<NaiveDate>,
    pub payment_period_start: NaiveDate,
    pub payment_period_end: NaiveDate,
    pub payment_amount: Decimal,
    pub payee: String,
    pub applicable_to_purchase: bool,
    pub refundable: bool,
    pub prorata_factor: Decimal,
}

// ════════════════════════════════════════════════════════════════════════════════
// Owned fact collections
// ════════════════════════════════════════════════════════════════════════════════

/// A landowner party to the agreement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grantor {
    pub fact_id: Option<FactId>,
    pub name: Option<String>,
    /// Percent of each payment owed to this grantor.
    pub payment_split: Option<Decimal>,
    pub mailing_address: Option<String>,
}

impl Grantor {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            fact_id: Some(record.id),
            name: record.text("grantor_name"),
            payment_split: record.number("payment_split"),
            mailing_address: record.text("mailing_address"),
        }
    }

    /// Display name for payments.
    pub fn nickname(&self) -> String {
        self.name
            .as_deref()
            .map(nickname_grantor)
            .unwrap_or_else(|| "Unknown Grantor".to_string())
    }
}

/// A parcel covered by the agreement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub fact_id: Option<FactId>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub agreement_acres: Option<Decimal>,
    pub legal_description: Option<String>,
    pub parcel_number: Option<String>,
}

impl PropertyDescription {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            fact_id: Some(record.id),
            county: record.text("county"),
            state: record.text("state"),
            agreement_acres: record.number("agreement_acres"),
            legal_description: record.text("legal_description"),
            parcel_number: record.text("parcel_number"),
        }
    }
}

/// Commencement dates recorded once the project is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalDetails {
    pub construction_commencement_date: Option<NaiveDate>,
    pub operations_commencement_date: Option<NaiveDate>,
    pub mw: Option<Decimal>,
}

impl OperationalDetails {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            construction_commencement_date: record.date("construction_commencement_date"),
            operations_commencement_date: record.date("operations_commencement_date"),
            mw: record.number("mw"),
        }
    }

    /// Earlier of construction and operations commencement.
    pub fn earliest_commencement(&self) -> Option<NaiveDate> {
        crate::domain::foundation::earliest_date([
            self.construction_commencement_date,
            self.operations_commencement_date,
        ])
    }
}

/// Termination details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Termination {
    pub termination_date: Option<NaiveDate>,
    pub notice_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl Termination {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            termination_date: record.date("termination_date"),
            notice_date: record.date("termination_notice_date"),
            reason: record.text("termination_reason"),
        }
    }
}

/// One segment of the agreement's duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgreementTerm {
    pub fact_id: Option<FactId>,
    pub term_ordinal: Option<u32>,
    pub term_type: Option<TermType>,
    pub term_length_years: Option<Decimal>,
    pub extension: bool,
    pub payment_model: Option<String>,
    /// Flat amount added to the base payment from this term on.
    pub increase_amount: Option<Decimal>,
    /// Percent escalation applied from this term on.
    pub escalation_rate: Option<Decimal>,

    // computed
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cancelled_by_ops: bool,
    pub cumulative_increase_amount: Decimal,
    /// Compounded term-level escalation as a rate (`0.1025` after two 5% terms).
    pub cumulative_escalation_rate: Decimal,
    pub payments: Vec<Payment>,
    pub cumulative_payment_amount: Decimal,
}

impl AgreementTerm {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            fact_id: Some(record.id),
            term_ordinal: record.number("term_ordinal").and_then(|n| n.to_u32()),
            term_type: record.text("term_type").map(TermType::from),
            term_length_years: record.number("term_length_years"),
            extension: record.flag("extension").unwrap_or(false),
            payment_model: record.text("payment_model"),
            increase_amount: record.number("increase_amount"),
            escalation_rate: record.number("escalation_rate"),
            ..Self::default()
        }
    }

    /// Ordinal used for ordering; unnumbered terms sort first.
    pub fn ordinal(&self) -> u32 {
        self.term_ordinal.unwrap_or(0)
    }

    /// Name of the payment model this term draws from: its explicit model,
    /// else its term type.
    pub fn model_name(&self) -> Option<&str> {
        self.payment_model
            .as_deref()
            .or_else(|| self.term_type.as_ref().map(TermType::as_str))
    }

    /// Clears everything the term-date and payment passes compute.
    pub fn reset_computed(&mut self) {
        self.start_date = None;
        self.end_date = None;
        self.cancelled_by_ops = false;
        self.cumulative_increase_amount = Decimal::ZERO;
        self.cumulative_escalation_rate = Decimal::ZERO;
        self.payments.clear();
        self.cumulative_payment_amount = Decimal::ZERO;
    }
}

/// An amendment applied to a root document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentRef {
    pub document_id: DocumentId,
    pub name: String,
    pub amendment_date: NaiveDate,
    pub ordinal: u32,
}

// ════════════════════════════════════════════════════════════════════════════════
// Document
// ════════════════════════════════════════════════════════════════════════════════

/// The normalized agreement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub document_type: Option<String>,
    pub agreement_group: Option<String>,
    pub tags: BTreeSet<String>,

    pub effective_date: Option<NaiveDate>,
    pub amendment_date: Option<NaiveDate>,
    pub outside_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub full_purchase_price: Option<Decimal>,
    pub jupiter_entity: Option<String>,
    pub grantee: Option<String>,

    pub grantor: Vec<Grantor>,
    pub property_description: Vec<PropertyDescription>,
    pub agreement_terms: Vec<AgreementTerm>,
    pub term_payment_models: Vec<TermPaymentModel>,
    pub date_payment_models: Vec<DatePaymentModel>,
    pub operational_details: Option<OperationalDetails>,
    pub termination: Option<Termination>,

    /// The document's own date payment models, captured before the first
    /// amendment merge appends amendment models to `date_payment_models`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_date_payment_models: Option<Vec<DatePaymentModel>>,

    // derived
    pub final_term_end_date: Option<NaiveDate>,
    pub date_payments: Vec<Payment>,
    pub qc_flags: Vec<String>,
    pub amendments: Vec<AmendmentRef>,
    pub deed_count: usize,
    pub phase: DocumentPhase,
}

impl Document {
    /// An empty document with only identity set.
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            document_type: None,
            agreement_group: None,
            tags: BTreeSet::new(),
            effective_date: None,
            amendment_date: None,
            outside_date: None,
            closing_date: None,
            full_purchase_price: None,
            jupiter_entity: None,
            grantee: None,
            grantor: Vec::new(),
            property_description: Vec::new(),
            agreement_terms: Vec::new(),
            term_payment_models: Vec::new(),
            date_payment_models: Vec::new(),
            operational_details: None,
            termination: None,
            original_date_payment_models: None,
            final_term_end_date: None,
            date_payments: Vec::new(),
            qc_flags: Vec::new(),
            amendments: Vec::new(),
            deed_count: 0,
            phase: DocumentPhase::Built,
        }
    }

    /// A document with an amendment date is itself an amendment.
    pub fn is_amendment(&self) -> bool {
        self.amendment_date.is_some()
    }

    pub fn is_deed(&self) -> bool {
        self.is_document_type(DEED_DOCUMENT_TYPE)
    }

    pub fn is_document_type(&self, name: &str) -> bool {
        self.document_type
            .as_deref()
            .map(|t| t.trim().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(false)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn termination_date(&self) -> Option<NaiveDate> {
        self.termination.as_ref().and_then(|t| t.termination_date)
    }

    /// Terminated by tag or by a recorded termination date.
    pub fn is_terminated(&self) -> bool {
        self.has_tag(TERMINATED_TAG) || self.termination_date().is_some()
    }

    pub fn construction_commencement_date(&self) -> Option<NaiveDate> {
        self.operational_details
            .as_ref()
            .and_then(|o| o.construction_commencement_date)
    }

    pub fn operations_commencement_date(&self) -> Option<NaiveDate> {
        self.operational_details
            .as_ref()
            .and_then(|o| o.operations_commencement_date)
    }

    /// Sum of acreage over all property descriptions.
    pub fn total_acres(&self) -> Decimal {
        self.property_description
            .iter()
            .filter_map(|p| p.agreement_acres)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// `"<ABBR>-<agreement group>"`, e.g. `LEASE-TX-0042`.
    pub fn reference_code(&self) -> Option<String> {
        let abbr = self.document_type.as_deref().and_then(document_type_abbreviation)?;
        let group = self.agreement_group.as_deref()?;
        Some(format!("{}-{}", abbr, group))
    }

    /// Term-based payments across all terms, in ordinal order.
    pub fn term_payments(&self) -> impl Iterator<Item = &Payment> {
        self.agreement_terms.iter().flat_map(|t| t.payments.iter())
    }

    /// Every computed payment: term-based then date-based.
    pub fn all_payments(&self) -> impl Iterator<Item = &Payment> {
        self.term_payments().chain(self.date_payments.iter())
    }

    /// Clears every field the schedule passes derive.
    pub fn reset_schedules(&mut self) {
        self.agreement_terms
            .iter_mut()
            .for_each(AgreementTerm::reset_computed);
        self.final_term_end_date = None;
        self.date_payments.clear();
    }
}
