//! Deed resolution.
//!
//! The earliest deed of an agreement group is canonical. Deed amendments
//! overwrite only its effective date and property description, and the
//! result is propagated to the group's root agreements.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::document::{AmendmentRef, Document, PURCHASED_TAG};

fn in_group(doc: &Document, group: &str) -> bool {
    doc.agreement_group.as_deref() == Some(group)
}

/// Resolves deeds for every agreement group that has one.
pub fn resolve_deeds(mut documents: Vec<Document>) -> Vec<Document> {
    let groups: BTreeSet<String> = documents
        .iter()
        .filter(|d| d.is_deed())
        .filter_map(|d| d.agreement_group.clone())
        .collect();

    for group in &groups {
        resolve_group(&mut documents, group);
    }
    documents
}

fn resolve_group(documents: &mut [Document], group: &str) {
    let Some(canonical) = documents
        .iter()
        .enumerate()
        .filter(|(_, d)| in_group(d, group) && d.is_deed() && !d.is_amendment())
        .min_by_key(|(_, d)| (d.effective_date.is_none(), d.effective_date, d.id))
        .map(|(index, _)| index)
    else {
        debug!(agreement_group = group, "Deed amendments without an original deed");
        return;
    };

    let mut deed_amendments: Vec<&Document> = documents
        .iter()
        .filter(|d| in_group(d, group) && d.is_deed() && d.is_amendment())
        .collect();
    deed_amendments.sort_by_key(|d| (d.amendment_date, d.id));

    let mut effective_date = documents[canonical].effective_date;
    let mut description = documents[canonical].property_description.clone();
    let mut refs = Vec::new();
    for (index, amendment) in deed_amendments.iter().enumerate() {
        if amendment.effective_date.is_some() {
            effective_date = amendment.effective_date;
        }
        if !amendment.property_description.is_empty() {
            description = amendment.property_description.clone();
        }
        if let Some(amendment_date) = amendment.amendment_date {
            refs.push(AmendmentRef {
                document_id: amendment.id,
                name: amendment.name.clone(),
                amendment_date,
                ordinal: index as u32 + 1,
            });
        }
    }

    let deed_count = documents
        .iter()
        .filter(|d| in_group(d, group) && d.is_deed())
        .count();

    let deed = &mut documents[canonical];
    deed.effective_date = effective_date;
    deed.property_description = description.clone();
    deed.amendments = refs;

    for root in documents
        .iter_mut()
        .filter(|d| in_group(d, group) && !d.is_deed() && !d.is_amendment())
    {
        if !description.is_empty() {
            root.property_description = description.clone();
        }
        root.deed_count = deed_count;
        if !root.has_tag(PURCHASED_TAG) {
            root.tags.insert(PURCHASED_TAG.to_string());
        }
        debug!(document_id = %root.id, deed_count, "Recorded deed on agreement");
    }
}
