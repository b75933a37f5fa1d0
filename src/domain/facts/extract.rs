//! Readers over a document's raw fact collection.
//!
//! None of these fail: a missing fact, field, or value reads as `None` (or an
//! empty list) and callers fall back to defaults.

use super::raw::{RawDocument, RawField};
use super::record::{FactRecord, FactSchema, FactValue, ValueKind};
use crate::domain::foundation::{FactTypeId, FieldTypeId};

/// Reads one value: the first fact of `fact_type_id`, then its field of
/// `field_type_id`, converted by `kind`.
pub fn extract_fact_value(
    doc: &RawDocument,
    fact_type_id: FactTypeId,
    field_type_id: FieldTypeId,
    kind: ValueKind,
) -> Option<FactValue> {
    let fact = doc.facts.iter().find(|f| f.fact_type_id == fact_type_id)?;
    let field = fact
        .fields
        .iter()
        .find(|f| f.fact_field_type_id == field_type_id)?;
    FactValue::from_raw(field, kind)
}

/// The field's own data type wins; an unknown or missing one falls back to
/// the schema's, and a field neither can read is skipped.
fn record_field(schema: &FactSchema, field: &RawField) -> Option<(String, FactValue)> {
    let field_schema = schema.fields.get(&field.fact_field_type_id)?;
    let kind = field
        .data_type
        .and_then(ValueKind::of)
        .or_else(|| ValueKind::of(field_schema.data_type))?;
    let value = FactValue::from_raw(field, kind)?;
    Some((field_schema.key.clone(), value))
}

/// Reads every instance of a multi-instance fact type, one record per instance.
///
/// Fields the schema does not know, and fields with no value, are left out
/// of the record.
pub fn extract_multi_fact_values(doc: &RawDocument, schema: &FactSchema) -> Vec<FactRecord> {
    doc.facts
        .iter()
        .filter(|f| f.fact_type_id == schema.fact_type_id)
        .map(|fact| {
            let mut record = FactRecord::new(fact.id);
            for (key, value) in fact.fields.iter().filter_map(|f| record_field(schema, f)) {
                record.insert(key, value);
            }
            record
        })
        .collect()
}

/// Reads a single-instance fact type as one sparse record: only truthy
/// values are kept. Returns `None` when the document has no such fact.
pub fn extract_fact_multi_fields(doc: &RawDocument, schema: &FactSchema) -> Option<FactRecord> {
    let fact = doc
        .facts
        .iter()
        .find(|f| f.fact_type_id == schema.fact_type_id)?;

    let mut record = FactRecord::new(fact.id);
    for (key, value) in fact.fields.iter().filter_map(|f| record_field(schema, f)) {
        if value.is_truthy() {
            record.insert(key, value);
        }
    }
    Some(record)
}
