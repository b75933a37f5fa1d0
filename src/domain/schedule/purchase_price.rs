//! Purchase price settlement at closing.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::split::{split_to_grantors, PeriodPayment};
use crate::domain::document::{
    Document, Escalation, LagPolicy, Payment, PaymentFrequency, PaymentSource, ScheduledModel,
};
use crate::domain::foundation::{round_money, saturating_sum};

/// Settlement payments carry no model settings of their own.
struct Settlement;

impl ScheduledModel for Settlement {
    fn escalation(&self) -> Escalation {
        Escalation {
            rate: Decimal::ZERO,
            frequency: PaymentFrequency::Annually,
            kind: Default::default(),
        }
    }

    fn lag(&self) -> LagPolicy {
        LagPolicy::default()
    }

    fn payee_override(&self) -> Option<&str> {
        None
    }

    fn applicable_to_purchase(&self) -> bool {
        false
    }

    fn refundable(&self) -> bool {
        false
    }
}

/// Remaining purchase price due at closing, one payment per grantor.
///
/// Credits every payment already scheduled as applicable to the purchase.
/// Requires a price, a closing date and grantors, and a document that is not
/// terminated. A fully credited price yields nothing.
pub fn calc_estimated_purchase_price(doc: &Document) -> Vec<Payment> {
    let (Some(price), Some(closing)) = (doc.full_purchase_price, doc.closing_date) else {
        return Vec::new();
    };
    if doc.is_terminated() || doc.grantor.is_empty() {
        return Vec::new();
    }

    let credited = saturating_sum(
        doc.all_payments()
            .filter(|p| p.applicable_to_purchase)
            .map(|p| p.payment_amount),
    );
    let remainder = round_money(price.saturating_sub(credited));
    if remainder <= Decimal::ZERO {
        if remainder < Decimal::ZERO {
            warn!(document_id = %doc.id, %price, %credited, "Credited payments exceed purchase price");
        }
        return Vec::new();
    }

    debug!(document_id = %doc.id, %remainder, %closing, "Estimated purchase price settlement");
    let settlement = PeriodPayment {
        source: PaymentSource::PurchasePrice,
        payment_index: 0,
        payment_date: closing,
        lag_days: 0,
        period_start: closing,
        period_end: closing,
        amount: remainder,
        prorata_factor: Decimal::ONE,
    };
    split_to_grantors(&settlement, &doc.grantor, &Settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{AgreementTerm, Grantor, TermType};
    use crate::domain::foundation::DocumentId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(amount: Decimal, applicable: bool) -> Payment {
        Payment {
            source: PaymentSource::Date {
                description: "Option".into(),
            },
            payment_index: 0,
            payment_date: date(2024, 1, 1),
            late_payment_date: None,
            payment_period_start: date(2024, 1, 1),
            payment_period_end: date(2024, 1, 1),
            payment_amount: amount,
            payee: "A".into(),
            applicable_to_purchase: applicable,
            refundable: false,
            prorata_factor: Decimal::ONE,
        }
    }

    fn purchase_doc() -> Document {
        let mut doc = Document::new(DocumentId::new(), "Purchase Option");
        doc.full_purchase_price = Some(dec!(100000));
        doc.closing_date = Some(date(2025, 6, 1));
        doc.grantor = vec![
            Grantor {
                name: Some("Ann".into()),
                payment_split: Some(dec!(75)),
                ..Grantor::default()
            },
            Grantor {
                name: Some("Bob".into()),
                payment_split: Some(dec!(25)),
                ..Grantor::default()
            },
        ];
        doc
    }

    #[test]
    fn credits_applicable_payments_from_both_streams() {
        let mut doc = purchase_doc();
        doc.agreement_terms = vec![AgreementTerm {
            term_type: Some(TermType::Option),
            payments: vec![payment(dec!(5000), true), payment(dec!(999), false)],
            ..AgreementTerm::default()
        }];
        doc.date_payments = vec![payment(dec!(15000), true)];

        let settlement = calc_estimated_purchase_price(&doc);
        assert_eq!(settlement.len(), 2);
        assert_eq!(settlement[0].payment_amount, dec!(60000));
        assert_eq!(settlement[1].payment_amount, dec!(20000));
        assert_eq!(settlement[0].payment_date, date(2025, 6, 1));
        assert_eq!(settlement[0].source, PaymentSource::PurchasePrice);
    }

    #[test]
    fn requires_price_and_closing() {
        let mut doc = purchase_doc();
        doc.closing_date = None;
        assert!(calc_estimated_purchase_price(&doc).is_empty());
    }

    #[test]
    fn terminated_documents_settle_nothing() {
        let mut doc = purchase_doc();
        doc.tags.insert("Terminated".into());
        assert!(calc_estimated_purchase_price(&doc).is_empty());
    }

    #[test]
    fn fully_credited_price_settles_nothing() {
        let mut doc = purchase_doc();
        doc.date_payments = vec![payment(dec!(100000), true)];
        assert!(calc_estimated_purchase_price(&doc).is_empty());
    }
}
