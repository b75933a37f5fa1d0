//! Builds normalized documents from raw upstream documents.

use tracing::debug;

use super::model::{
    AgreementTerm, Document, Grantor, OperationalDetails, PropertyDescription, Termination,
};
use super::payment_model::{DatePaymentModel, TermPaymentModel};
use crate::domain::facts::{FactGroup, FactKey, FactRegistry, FactValue, RawDocument, ReferenceData};

/// Turns raw documents into [`Document`] values using the resolved registry
/// and the run's reference lookups.
pub struct DocumentBuilder<'a> {
    registry: &'a FactRegistry,
    reference: &'a ReferenceData,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(registry: &'a FactRegistry, reference: &'a ReferenceData) -> Self {
        Self {
            registry,
            reference,
        }
    }

    /// Builds one document. Never fails: absent facts leave fields empty.
    pub fn build(&self, raw: &RawDocument) -> Document {
        let registry = self.registry;
        let mut doc = Document::new(raw.id, raw.name.clone());

        doc.document_type = raw
            .document_type_id
            .and_then(|id| self.reference.get_document_type_name(id))
            .map(str::to_string);
        doc.tags = raw
            .tag_ids
            .iter()
            .filter_map(|id| self.reference.get_tag_name(*id))
            .map(str::to_string)
            .collect();

        let text = |key| {
            registry
                .value(raw, key)
                .and_then(|v| v.as_text().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty())
        };
        let date = |key| registry.value(raw, key).and_then(|v: FactValue| v.as_date());

        doc.agreement_group = text(FactKey::AgreementGroup);
        doc.jupiter_entity = text(FactKey::JupiterEntity);
        doc.grantee = text(FactKey::Grantee);
        doc.effective_date = date(FactKey::EffectiveDate);
        doc.amendment_date = date(FactKey::AmendmentDate);
        doc.outside_date = date(FactKey::OutsideDate);
        doc.closing_date = date(FactKey::ClosingDate);
        doc.full_purchase_price = registry
            .value(raw, FactKey::FullPurchasePrice)
            .and_then(|v| v.as_number());

        doc.grantor = registry
            .records(raw, FactGroup::Grantor)
            .iter()
            .map(Grantor::from_record)
            .collect();
        doc.property_description = registry
            .records(raw, FactGroup::PropertyDescription)
            .iter()
            .map(PropertyDescription::from_record)
            .collect();
        doc.agreement_terms = registry
            .records(raw, FactGroup::AgreementTerm)
            .iter()
            .map(AgreementTerm::from_record)
            .collect();
        doc.agreement_terms.sort_by_key(AgreementTerm::ordinal);
        doc.term_payment_models = registry
            .records(raw, FactGroup::TermPaymentModel)
            .iter()
            .map(TermPaymentModel::from_record)
            .collect();
        doc.date_payment_models = registry
            .records(raw, FactGroup::DatePaymentModel)
            .iter()
            .map(DatePaymentModel::from_record)
            .collect();
        doc.operational_details = registry
            .record(raw, FactGroup::OperationalDetails)
            .map(|r| OperationalDetails::from_record(&r));
        doc.termination = registry
            .record(raw, FactGroup::Termination)
            .map(|r| Termination::from_record(&r));

        debug!(
            document_id = %doc.id,
            terms = doc.agreement_terms.len(),
            grantors = doc.grantor.len(),
            "Built document"
        );
        doc
    }

    /// Builds every document in input order.
    pub fn build_all(&self, raws: &[RawDocument]) -> Vec<Document> {
        raws.iter().map(|raw| self.build(raw)).collect()
    }
}
