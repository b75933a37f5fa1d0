//! Schedule engine - term dates and payment schedules.
//!
//! Each transition takes a document by value, recomputes its derived fields
//! from scratch and returns the next phase snapshot. Running a transition
//! twice yields the same document.

mod date_payments;
mod periodic;
mod purchase_price;
mod split;
mod term_dates;

pub use date_payments::calc_date_payments;
pub use periodic::{calc_periodic_payments_for_term, resolve_term_model, term_periods, SchedulePeriod};
pub use purchase_price::calc_estimated_purchase_price;
pub use split::{grantor_shares, split_to_grantors, PeriodPayment};
pub use term_dates::calc_term_dates;

use rust_decimal::Decimal;

use crate::domain::document::{Document, DocumentPhase};
use crate::domain::foundation::saturating_sum;

/// Term-based payments, then date-based payments, then the purchase price
/// settlement. Assumes term dates are current.
pub fn calc_payments(doc: &mut Document) {
    let fallback_acres = doc.total_acres();
    let Document {
        agreement_terms,
        term_payment_models,
        grantor,
        ..
    } = doc;
    for term in agreement_terms.iter_mut() {
        term.payments =
            calc_periodic_payments_for_term(term, term_payment_models, grantor, fallback_acres);
        term.cumulative_payment_amount = saturating_sum(term.payments.iter().map(|p| p.payment_amount));
    }

    doc.date_payments = calc_date_payments(doc);
    let settlement = calc_estimated_purchase_price(doc);
    doc.date_payments.extend(settlement);
}

impl Document {
    /// Recomputes term dates; payments are cleared.
    pub fn with_term_dates(mut self) -> Self {
        self.reset_schedules();
        calc_term_dates(&mut self);
        self.phase = DocumentPhase::Dated;
        self
    }

    /// Recomputes term dates and every payment stream.
    pub fn with_schedules(self) -> Self {
        let mut doc = self.with_term_dates();
        calc_payments(&mut doc);
        doc.phase = DocumentPhase::Priced;
        doc
    }

    /// Sum of every computed payment.
    pub fn total_payments(&self) -> Decimal {
        saturating_sum(self.all_payments().map(|p| p.payment_amount))
    }
}
