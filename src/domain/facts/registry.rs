//! Typed accessor table from stable internal keys to upstream fact ids.
//!
//! Upstream fact and field types are identified by UUIDs that differ between
//! tenants, so the engine names the facts it needs by [`FactKey`] and
//! [`FactGroup`] and resolves those names against the reference data once per
//! run. Per-document reads then go straight to ids.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::extract::{extract_fact_multi_fields, extract_fact_value, extract_multi_fact_values};
use super::raw::RawDocument;
use super::record::{FactRecord, FactSchema, FactValue, ValueKind};
use super::reference::ReferenceData;
use crate::domain::foundation::{FactTypeId, FieldTypeId};

/// Single-valued document facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKey {
    AgreementGroup,
    EffectiveDate,
    AmendmentDate,
    OutsideDate,
    ClosingDate,
    FullPurchasePrice,
    JupiterEntity,
    Grantee,
}

impl FactKey {
    pub const ALL: [FactKey; 8] = [
        FactKey::AgreementGroup,
        FactKey::EffectiveDate,
        FactKey::AmendmentDate,
        FactKey::OutsideDate,
        FactKey::ClosingDate,
        FactKey::FullPurchasePrice,
        FactKey::JupiterEntity,
        FactKey::Grantee,
    ];

    /// Upstream fact type name and field name.
    pub fn upstream_names(&self) -> (&'static str, &'static str) {
        match self {
            FactKey::AgreementGroup => ("Agreement Group", "Agreement Group"),
            FactKey::EffectiveDate => ("Effective Date", "Effective Date"),
            FactKey::AmendmentDate => ("Amendment Date", "Amendment Date"),
            FactKey::OutsideDate => ("Outside Date", "Outside Date"),
            FactKey::ClosingDate => ("Closing Date", "Closing Date"),
            FactKey::FullPurchasePrice => ("Purchase Price", "Full Purchase Price"),
            FactKey::JupiterEntity => ("Jupiter Entity", "Entity Name"),
            FactKey::Grantee => ("Grantee", "Grantee Name"),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FactKey::AgreementGroup | FactKey::JupiterEntity | FactKey::Grantee => ValueKind::String,
            FactKey::FullPurchasePrice => ValueKind::Number,
            FactKey::EffectiveDate
            | FactKey::AmendmentDate
            | FactKey::OutsideDate
            | FactKey::ClosingDate => ValueKind::Date,
        }
    }
}

/// Structured facts read as whole records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactGroup {
    Grantor,
    PropertyDescription,
    AgreementTerm,
    TermPaymentModel,
    DatePaymentModel,
    OperationalDetails,
    Termination,
}

impl FactGroup {
    pub const ALL: [FactGroup; 7] = [
        FactGroup::Grantor,
        FactGroup::PropertyDescription,
        FactGroup::AgreementTerm,
        FactGroup::TermPaymentModel,
        FactGroup::DatePaymentModel,
        FactGroup::OperationalDetails,
        FactGroup::Termination,
    ];

    pub fn upstream_name(&self) -> &'static str {
        match self {
            FactGroup::Grantor => "Grantor",
            FactGroup::PropertyDescription => "Property Description",
            FactGroup::AgreementTerm => "Agreement Term",
            FactGroup::TermPaymentModel => "Term Payment Model",
            FactGroup::DatePaymentModel => "Date Payment Model",
            FactGroup::OperationalDetails => "Operational Details",
            FactGroup::Termination => "Termination",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScalarAccessor {
    fact_type_id: FactTypeId,
    field_type_id: FieldTypeId,
    kind: ValueKind,
}

/// Resolved accessor table. Keys that failed to resolve are simply absent
/// and read as `None` / empty.
#[derive(Debug, Clone, Default)]
pub struct FactRegistry {
    scalars: HashMap<FactKey, ScalarAccessor>,
    groups: HashMap<FactGroup, FactSchema>,
}

impl FactRegistry {
    /// Resolves every [`FactKey`] and [`FactGroup`] against the reference data.
    pub fn resolve(reference: &ReferenceData) -> Self {
        let mut registry = FactRegistry::default();

        for key in FactKey::ALL {
            let (fact_name, field_name) = key.upstream_names();
            let accessor = reference.get_fact_type_id(fact_name).and_then(|fact_type_id| {
                reference
                    .get_fact_field_id(fact_type_id, field_name)
                    .map(|field_type_id| ScalarAccessor {
                        fact_type_id,
                        field_type_id,
                        kind: key.kind(),
                    })
            });
            match accessor {
                Some(accessor) => {
                    registry.scalars.insert(key, accessor);
                }
                None => warn!(fact = fact_name, field = field_name, "Fact not found in reference data"),
            }
        }

        for group in FactGroup::ALL {
            let schema = reference
                .get_fact_type_id(group.upstream_name())
                .and_then(|id| reference.fact_type(id))
                .map(FactSchema::from_fact_type);
            match schema {
                Some(schema) => {
                    registry.groups.insert(group, schema);
                }
                None => warn!(fact = group.upstream_name(), "Fact group not found in reference data"),
            }
        }

        debug!(
            scalars = registry.scalars.len(),
            groups = registry.groups.len(),
            "Resolved fact registry"
        );
        registry
    }

    /// Whether a scalar key resolved.
    pub fn has(&self, key: FactKey) -> bool {
        self.scalars.contains_key(&key)
    }

    pub fn value(&self, doc: &RawDocument, key: FactKey) -> Option<FactValue> {
        let accessor = self.scalars.get(&key)?;
        extract_fact_value(doc, accessor.fact_type_id, accessor.field_type_id, accessor.kind)
    }

    /// All instances of a group; empty when the group did not resolve.
    pub fn records(&self, doc: &RawDocument, group: FactGroup) -> Vec<FactRecord> {
        self.groups
            .get(&group)
            .map(|schema| extract_multi_fact_values(doc, schema))
            .unwrap_or_default()
    }

    /// The single sparse record of a group.
    pub fn record(&self, doc: &RawDocument, group: FactGroup) -> Option<FactRecord> {
        self.groups
            .get(&group)
            .and_then(|schema| extract_fact_multi_fields(doc, schema))
    }
}
