//! Term date calculation.
//!
//! Terms are walked in ordinal order. Each term starts the day after its
//! predecessor ends unless a Construction or Operations term picks up a
//! recorded commencement date. Ends are capped by termination and cut back
//! by commencement for pre-operational terms.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::document::{AgreementTerm, Document, TermType};
use crate::domain::foundation::{add_term_length, earliest_date, percent_to_rate};

fn day_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Computes start/end dates, cancellation and cumulative escalation for every
/// term, and the document's final term end date.
///
/// Does nothing when the document has neither an effective date nor any
/// commencement date to anchor the first term.
pub fn calc_term_dates(doc: &mut Document) {
    doc.agreement_terms
        .iter_mut()
        .for_each(AgreementTerm::reset_computed);
    doc.final_term_end_date = None;

    let construction = doc.construction_commencement_date();
    let operations = doc.operations_commencement_date();
    let commencement = earliest_date([construction, operations]);

    let Some(anchor) = doc.effective_date.or(commencement) else {
        debug!(document_id = %doc.id, "No effective or commencement date; term dates skipped");
        return;
    };
    let termination = doc.termination_date();

    doc.agreement_terms.sort_by_key(AgreementTerm::ordinal);

    let mut previous_end: Option<NaiveDate> = None;
    for term in doc.agreement_terms.iter_mut() {
        let commenced = match (&term.term_type, term.extension) {
            (Some(TermType::Construction), false) => construction,
            (Some(TermType::Operations), false) => operations,
            _ => None,
        };
        let start = commenced
            .or_else(|| previous_end.and_then(|end| end.succ_opt()))
            .unwrap_or(anchor);

        let mut end = add_term_length(start, term.term_length_years).unwrap_or(start);
        if let Some(terminated) = termination {
            end = end.min(terminated);
        }

        match &term.term_type {
            Some(TermType::Construction) => {
                if let Some(ops) = operations {
                    if ops <= end {
                        end = day_before(ops);
                    }
                }
            }
            Some(TermType::Operations) => {}
            _ => {
                if let Some(ops) = commencement {
                    if ops <= start {
                        term.cancelled_by_ops = true;
                    } else if ops <= end {
                        end = day_before(ops);
                    }
                }
            }
        }

        term.start_date = Some(start);
        term.end_date = Some(end);
        previous_end = Some(end);
    }

    apply_cumulative_escalation(&mut doc.agreement_terms);
    doc.final_term_end_date = doc.agreement_terms.iter().rev().find_map(|t| t.end_date);

    debug!(
        document_id = %doc.id,
        terms = doc.agreement_terms.len(),
        final_term_end_date = ?doc.final_term_end_date,
        "Computed term dates"
    );
}

/// Folds increases (additive) and escalation rates (compounded) over every
/// earlier-or-equal term drawing from the same payment model.
fn apply_cumulative_escalation(terms: &mut [AgreementTerm]) {
    let totals: Vec<(Decimal, Decimal)> = terms
        .iter()
        .map(|term| {
            let (increase, factor) = terms
                .iter()
                .filter(|other| {
                    other.ordinal() <= term.ordinal() && other.model_name() == term.model_name()
                })
                .fold((Decimal::ZERO, Decimal::ONE), |(inc, factor), other| {
                    (
                        inc.saturating_add(other.increase_amount.unwrap_or(Decimal::ZERO)),
                        factor.saturating_mul(
                            Decimal::ONE.saturating_add(percent_to_rate(other.escalation_rate)),
                        ),
                    )
                });
            (increase, factor.saturating_sub(Decimal::ONE))
        })
        .collect();

    for (term, (increase, rate)) in terms.iter_mut().zip(totals) {
        term.cumulative_increase_amount = increase;
        term.cumulative_escalation_rate = rate;
    }
}
