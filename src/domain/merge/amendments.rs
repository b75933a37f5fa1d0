//! Amendment overlay onto root documents.

use tracing::debug;

use crate::domain::document::{AmendmentRef, Document, DocumentPhase};

/// Amendments to `root`, oldest first: same agreement group, dated, not the
/// root itself and not deeds. Ties on date are broken by id.
pub fn find_amendments<'a>(root: &Document, documents: &'a [Document]) -> Vec<&'a Document> {
    let Some(group) = root.agreement_group.as_deref() else {
        return Vec::new();
    };
    let mut amendments: Vec<&Document> = documents
        .iter()
        .filter(|d| {
            d.id != root.id
                && d.is_amendment()
                && !d.is_deed()
                && d.agreement_group.as_deref() == Some(group)
        })
        .collect();
    amendments.sort_by_key(|d| (d.amendment_date, d.id));
    amendments
}

/// Overlays one amendment. Present scalars and non-empty collections
/// replace the root's; date payment models accumulate.
fn overlay(root: &mut Document, amendment: &Document) {
    fn replace<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
        if value.is_some() {
            target.clone_from(value);
        }
    }
    fn replace_all<T: Clone>(target: &mut Vec<T>, value: &[T]) {
        if !value.is_empty() {
            *target = value.to_vec();
        }
    }

    replace(&mut root.effective_date, &amendment.effective_date);
    replace(&mut root.outside_date, &amendment.outside_date);
    replace(&mut root.closing_date, &amendment.closing_date);
    replace(&mut root.full_purchase_price, &amendment.full_purchase_price);
    replace(&mut root.jupiter_entity, &amendment.jupiter_entity);
    replace(&mut root.grantee, &amendment.grantee);

    replace_all(&mut root.property_description, &amendment.property_description);
    replace_all(&mut root.grantor, &amendment.grantor);
    replace_all(&mut root.agreement_terms, &amendment.agreement_terms);
    replace_all(&mut root.term_payment_models, &amendment.term_payment_models);

    root.date_payment_models
        .extend(amendment.date_payment_models.iter().cloned());
}

/// Applies every amendment of `root` found in `documents` and recomputes its
/// schedules from the merged state. Date payment models are rebuilt from the
/// root's own models each time, so re-applying gives the same document.
///
/// Amendments and deeds pass through untouched; deeds are resolved by the
/// deed pass.
pub fn apply_amendments(root: Document, documents: &[Document]) -> Document {
    if root.is_amendment() || root.is_deed() {
        return Document {
            phase: DocumentPhase::Amended,
            ..root
        };
    }

    let amendments = find_amendments(&root, documents);
    if amendments.is_empty() {
        return Document {
            amendments: Vec::new(),
            phase: DocumentPhase::Amended,
            ..root
        };
    }

    let mut merged = root;
    merged.amendments.clear();
    merged.date_payment_models = merged
        .original_date_payment_models
        .get_or_insert_with(|| merged.date_payment_models.clone())
        .clone();
    for (index, amendment) in amendments.iter().enumerate() {
        overlay(&mut merged, amendment);
        if let Some(amendment_date) = amendment.amendment_date {
            merged.amendments.push(AmendmentRef {
                document_id: amendment.id,
                name: amendment.name.clone(),
                amendment_date,
                ordinal: index as u32 + 1,
            });
        }
    }
    debug!(
        document_id = %merged.id,
        amendments = merged.amendments.len(),
        "Applied amendments"
    );

    let mut merged = merged.with_schedules();
    merged.phase = DocumentPhase::Amended;
    merged
}

/// Runs [`apply_amendments`] for every document against the full set.
pub fn apply_all_amendments(documents: Vec<Document>) -> Vec<Document> {
    let snapshot = documents.clone();
    documents
        .into_iter()
        .map(|doc| apply_amendments(doc, &snapshot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{
        AgreementTerm, DatePaymentModel, Grantor, TermPaymentModel, TermType,
    };
    use crate::domain::foundation::DocumentId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn date_model(description: &str) -> DatePaymentModel {
        DatePaymentModel {
            description: Some(description.into()),
            payment_amount: Some(dec!(100)),
            payment_date: Some(date(2024, 6, 1)),
            ..DatePaymentModel::default()
        }
    }

    fn root() -> Document {
        let mut doc = Document::new(DocumentId::new(), "Lease");
        doc.agreement_group = Some("TX-0001".into());
        doc.effective_date = Some(date(2024, 1, 1));
        doc.closing_date = Some(date(2025, 1, 1));
        doc.grantor = vec![Grantor {
            name: Some("Original Owner".into()),
            ..Grantor::default()
        }];
        doc.agreement_terms = vec![AgreementTerm {
            term_ordinal: Some(1),
            term_type: Some(TermType::Option),
            term_length_years: Some(dec!(1)),
            ..AgreementTerm::default()
        }];
        doc.term_payment_models = vec![TermPaymentModel {
            name: Some("Option".into()),
            payment_frequency: Some("Annually".into()),
            flat_payment_amount: Some(dec!(1000)),
            ..TermPaymentModel::default()
        }];
        doc.date_payment_models = vec![date_model("Signing")];
        doc
    }

    fn amendment(name: &str, dated: NaiveDate) -> Document {
        let mut doc = Document::new(DocumentId::new(), name);
        doc.agreement_group = Some("TX-0001".into());
        doc.amendment_date = Some(dated);
        doc
    }

    #[test]
    fn latest_amendment_wins_and_date_models_accumulate() {
        let mut first = amendment("First Amendment", date(2025, 3, 1));
        first.closing_date = Some(date(2025, 6, 1));
        first.date_payment_models = vec![date_model("Extension Fee")];
        let mut second = amendment("Second Amendment", date(2025, 9, 1));
        second.closing_date = Some(date(2026, 1, 1));
        second.date_payment_models = vec![date_model("Bonus"), date_model("Road Damage")];

        let base = root();
        // listed out of chronological order on purpose
        let all = vec![base.clone(), second.clone(), first.clone()];
        let merged = apply_amendments(base, &all);

        assert_eq!(merged.closing_date, Some(date(2026, 1, 1)));
        assert_eq!(merged.date_payment_models.len(), 4);
        assert_eq!(merged.amendments.len(), 2);
        assert_eq!(merged.amendments[0].document_id, first.id);
        assert_eq!(merged.amendments[0].ordinal, 1);
        assert_eq!(merged.amendments[1].ordinal, 2);
        assert_eq!(merged.phase, DocumentPhase::Amended);
    }

    #[test]
    fn reapplying_amendments_changes_nothing() {
        let mut amend = amendment("Amendment", date(2025, 3, 1));
        amend.closing_date = Some(date(2026, 1, 1));
        amend.date_payment_models = vec![date_model("Extension Fee")];
        let base = root();
        let all = vec![base.clone(), amend];

        let once = apply_amendments(base, &all);
        let twice = apply_amendments(once.clone(), &all);

        assert_eq!(once.date_payment_models.len(), 2);
        assert_eq!(twice, once);
        assert_eq!(
            twice.original_date_payment_models,
            Some(vec![date_model("Signing")])
        );
    }

    #[test]
    fn reapplying_over_the_whole_set_is_stable() {
        let mut amend = amendment("Amendment", date(2025, 3, 1));
        amend.date_payment_models = vec![date_model("Bonus")];
        let all = vec![root(), amend];

        let once = apply_all_amendments(all);
        let twice = apply_all_amendments(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn empty_collections_do_not_replace() {
        let mut amend = amendment("Amendment", date(2025, 3, 1));
        amend.grantee = Some("Jupiter Solar LLC".into());
        let base = root();
        let all = vec![base.clone(), amend];
        let merged = apply_amendments(base, &all);

        assert_eq!(merged.grantor.len(), 1);
        assert_eq!(merged.grantee.as_deref(), Some("Jupiter Solar LLC"));
        assert_eq!(merged.agreement_terms.len(), 1);
    }

    #[test]
    fn merged_schedules_are_recomputed() {
        let mut amend = amendment("Amendment", date(2025, 3, 1));
        amend.term_payment_models = vec![TermPaymentModel {
            name: Some("Option".into()),
            payment_frequency: Some("Annually".into()),
            flat_payment_amount: Some(dec!(3000)),
            ..TermPaymentModel::default()
        }];
        let base = root().with_schedules();
        assert_eq!(base.agreement_terms[0].payments[0].payment_amount, dec!(1000));

        let all = vec![base.clone(), amend];
        let merged = apply_amendments(base, &all);
        assert_eq!(merged.agreement_terms[0].payments.len(), 1);
        assert_eq!(merged.agreement_terms[0].payments[0].payment_amount, dec!(3000));
    }

    #[test]
    fn other_groups_and_deeds_are_ignored() {
        let mut other = amendment("Other", date(2025, 3, 1));
        other.agreement_group = Some("TX-0002".into());
        let mut deed = amendment("Deed Amendment", date(2025, 3, 1));
        deed.document_type = Some("Deed".into());

        let base = root();
        let all = vec![base.clone(), other, deed];
        assert!(find_amendments(&base, &all).is_empty());
    }

    #[test]
    fn amendments_are_never_amended() {
        let first = amendment("First", date(2025, 3, 1));
        let second = amendment("Second", date(2025, 9, 1));
        let all = vec![root(), first.clone(), second];
        let out = apply_amendments(first.clone(), &all);
        assert!(out.amendments.is_empty());
        assert_eq!(out.phase, DocumentPhase::Amended);
    }
}
