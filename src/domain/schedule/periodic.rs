//! Term-based periodic payments.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::split::{split_to_grantors, PeriodPayment};
use crate::domain::document::{
    AgreementTerm, Grantor, Payment, PaymentFrequency, PaymentSource, ScheduledModel,
    TermPaymentModel,
};
use crate::domain::foundation::{days_inclusive, round_money};

/// One payment period within a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Actual days over nominal days; one for full periods.
    pub prorata: Decimal,
    /// Periods elapsed for escalation; stub periods do not count.
    pub escalation_index: u32,
}

fn ratio(actual: i64, nominal: i64) -> Decimal {
    if nominal <= 0 || actual >= nominal {
        return Decimal::ONE;
    }
    Decimal::from(actual) / Decimal::from(nominal)
}

fn nominal_end(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
}

/// Splits `[term_start, term_end]` into payment periods beginning at
/// `first_payment`. Every period lies inside the term: a first payment
/// before the term start is moved up to it, and each period is capped at
/// the term end.
pub fn term_periods(
    term_start: NaiveDate,
    term_end: NaiveDate,
    first_payment: NaiveDate,
    frequency: PaymentFrequency,
    prorate_first_period: bool,
) -> Vec<SchedulePeriod> {
    let first_payment = first_payment.max(term_start);
    let Some(months) = frequency.months() else {
        if first_payment > term_end {
            return Vec::new();
        }
        return vec![SchedulePeriod {
            start: first_payment,
            end: term_end,
            prorata: Decimal::ONE,
            escalation_index: 0,
        }];
    };

    let mut periods = Vec::new();

    if prorate_first_period && first_payment > term_start {
        if let (Some(stub_end), Some(full_end)) =
            (first_payment.pred_opt(), nominal_end(term_start, months))
        {
            let stub_end = stub_end.min(term_end);
            periods.push(SchedulePeriod {
                start: term_start,
                end: stub_end,
                prorata: ratio(
                    days_inclusive(term_start, stub_end),
                    days_inclusive(term_start, full_end),
                ),
                escalation_index: 0,
            });
        }
    }

    for k in 0u32.. {
        let Some(start) = first_payment.checked_add_months(Months::new(months * k)) else {
            break;
        };
        if start > term_end {
            break;
        }
        let Some(full_end) = nominal_end(first_payment, months * (k + 1)) else {
            break;
        };
        let end = full_end.min(term_end);
        periods.push(SchedulePeriod {
            start,
            end,
            prorata: ratio(days_inclusive(start, end), days_inclusive(start, full_end)),
            escalation_index: k,
        });
    }

    periods
}

/// The model a term draws from: the one named by the term's payment model
/// (or term type), or the first model when the term names none.
pub fn resolve_term_model<'a>(
    term: &AgreementTerm,
    models: &'a [TermPaymentModel],
) -> Option<&'a TermPaymentModel> {
    match term.model_name() {
        Some(name) => models.iter().find(|m| m.matches_name(name)),
        None => models.first(),
    }
}

/// Payments for one term, one record per grantor per period.
///
/// Returns nothing for cancelled or undated terms, when there are no
/// grantors, when no model applies, when the model's frequency is not
/// recognized, or when escalation overflows the decimal range.
pub fn calc_periodic_payments_for_term(
    term: &AgreementTerm,
    models: &[TermPaymentModel],
    grantors: &[Grantor],
    fallback_acres: Decimal,
) -> Vec<Payment> {
    if term.cancelled_by_ops || grantors.is_empty() {
        return Vec::new();
    }
    let (Some(term_start), Some(term_end)) = (term.start_date, term.end_date) else {
        return Vec::new();
    };
    if term_end < term_start {
        return Vec::new();
    }
    let Some(model) = resolve_term_model(term, models) else {
        debug!(term = term.ordinal(), "No payment model for term");
        return Vec::new();
    };
    let frequency = match model.frequency() {
        Ok(frequency) => frequency,
        Err(error) => {
            warn!(term = term.ordinal(), %error, "Skipping term payments");
            return Vec::new();
        }
    };

    let Some(term_amount) = model
        .base_payment(fallback_acres)
        .checked_add(term.cumulative_increase_amount)
        .zip(Decimal::ONE.checked_add(term.cumulative_escalation_rate))
        .and_then(|(base, factor)| base.checked_mul(factor))
    else {
        warn!(term = term.ordinal(), "Term payment amount overflows; skipping term payments");
        return Vec::new();
    };
    let escalation = model.escalation();
    let lag = model.lag();
    let source = PaymentSource::Term {
        term_ordinal: term.ordinal(),
        model: model.name.clone(),
    };
    let first_payment = model.first_payment_policy().first_payment_date(term_start);

    let mut payments = Vec::new();
    let periods = term_periods(
        term_start,
        term_end,
        first_payment,
        frequency,
        model.prorate_first_period,
    );
    for (index, period) in periods.into_iter().enumerate() {
        let index = index as u32;
        let steps = frequency.escalation_steps(escalation.frequency, period.escalation_index);
        let Some(amount) = escalation
            .apply(term_amount, steps)
            .and_then(|escalated| escalated.checked_mul(period.prorata))
        else {
            warn!(
                term = term.ordinal(),
                payment_index = index,
                "Escalated payment overflows; skipping term payments"
            );
            return Vec::new();
        };
        let payment = PeriodPayment {
            source: source.clone(),
            payment_index: index,
            payment_date: period.start,
            lag_days: lag.days_for(index, term.extension),
            period_start: period.start,
            period_end: period.end,
            amount: round_money(amount),
            prorata_factor: period.prorata,
        };
        payments.extend(split_to_grantors(&payment, grantors, model));
    }
    payments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::TermType;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated_term(start: NaiveDate, end: NaiveDate) -> AgreementTerm {
        AgreementTerm {
            term_ordinal: Some(1),
            term_type: Some(TermType::Operations),
            payment_model: Some("Ops".into()),
            start_date: Some(start),
            end_date: Some(end),
            ..AgreementTerm::default()
        }
    }

    fn model(frequency: &str, amount: Decimal) -> TermPaymentModel {
        TermPaymentModel {
            name: Some("Ops".into()),
            payment_frequency: Some(frequency.into()),
            flat_payment_amount: Some(amount),
            ..TermPaymentModel::default()
        }
    }

    fn grantor(name: &str) -> Grantor {
        Grantor {
            name: Some(name.into()),
            ..Grantor::default()
        }
    }

    #[test]
    fn annual_periods_cover_the_term() {
        let periods = term_periods(
            date(2024, 1, 1),
            date(2026, 6, 30),
            date(2024, 1, 1),
            PaymentFrequency::Annually,
            false,
        );
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].end, date(2024, 12, 31));
        assert_eq!(periods[2].start, date(2026, 1, 1));
        assert_eq!(periods[2].end, date(2026, 6, 30));
        assert_eq!(periods[0].prorata, Decimal::ONE);
        assert_eq!(periods[2].prorata, dec!(181) / dec!(365));
    }

    #[test]
    fn once_per_term_is_a_single_period() {
        let periods = term_periods(
            date(2024, 1, 1),
            date(2028, 12, 31),
            date(2024, 1, 1),
            PaymentFrequency::OncePerTerm,
            false,
        );
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].end, date(2028, 12, 31));
    }

    #[test]
    fn prorated_stub_precedes_first_payment() {
        let periods = term_periods(
            date(2024, 7, 1),
            date(2025, 12, 31),
            date(2025, 1, 1),
            PaymentFrequency::Annually,
            true,
        );
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start, date(2024, 7, 1));
        assert_eq!(periods[0].end, date(2024, 12, 31));
        assert_eq!(periods[0].prorata, dec!(184) / dec!(365));
        assert_eq!(periods[1].start, date(2025, 1, 1));
        assert_eq!(periods[1].escalation_index, 0);
    }

    #[test]
    fn annual_term_payments_escalate_each_period() {
        let mut m = model("Annually", dec!(1000));
        m.escalation_rate = Some(dec!(2));
        let term = dated_term(date(2024, 1, 1), date(2026, 12, 31));

        let payments = calc_periodic_payments_for_term(&term, &[m], &[grantor("Ann Owner")], dec!(0));
        let amounts: Vec<_> = payments.iter().map(|p| p.payment_amount).collect();
        assert_eq!(amounts, vec![dec!(1000), dec!(1020), dec!(1040.40)]);
        assert_eq!(payments[0].payee, "Ann Owner");
        assert_eq!(
            payments[0].source,
            PaymentSource::Term {
                term_ordinal: 1,
                model: Some("Ops".into())
            }
        );
    }

    #[test]
    fn monthly_payments_step_up_yearly() {
        let mut m = model("Monthly", dec!(100));
        m.escalation_rate = Some(dec!(10));
        let term = dated_term(date(2024, 1, 1), date(2025, 12, 31));

        let payments = calc_periodic_payments_for_term(&term, &[m], &[grantor("A")], dec!(0));
        assert_eq!(payments.len(), 24);
        assert_eq!(payments[11].payment_amount, dec!(100));
        assert_eq!(payments[12].payment_amount, dec!(110));
    }

    #[test]
    fn cumulative_term_escalation_applies_to_base() {
        let mut term = dated_term(date(2024, 1, 1), date(2024, 12, 31));
        term.cumulative_increase_amount = dec!(100);
        term.cumulative_escalation_rate = dec!(0.1);

        let payments =
            calc_periodic_payments_for_term(&term, &[model("Annually", dec!(900))], &[grantor("A")], dec!(0));
        assert_eq!(payments[0].payment_amount, dec!(1100));
    }

    #[test]
    fn cancelled_terms_and_missing_grantors_emit_nothing() {
        let m = model("Annually", dec!(1000));
        let mut term = dated_term(date(2024, 1, 1), date(2024, 12, 31));
        assert!(calc_periodic_payments_for_term(&term, &[m.clone()], &[], dec!(0)).is_empty());

        term.cancelled_by_ops = true;
        assert!(calc_periodic_payments_for_term(&term, &[m], &[grantor("A")], dec!(0)).is_empty());
    }

    #[test]
    fn unknown_frequency_emits_nothing() {
        let term = dated_term(date(2024, 1, 1), date(2030, 12, 31));
        let payments = calc_periodic_payments_for_term(
            &term,
            &[model("Fortnightly", dec!(1000))],
            &[grantor("A")],
            dec!(0),
        );
        assert!(payments.is_empty());
    }

    #[test]
    fn term_without_model_name_uses_first_model() {
        let mut term = dated_term(date(2024, 1, 1), date(2024, 12, 31));
        term.payment_model = None;
        term.term_type = None;
        let models = [model("Annually", dec!(500)), model("Annually", dec!(900))];
        assert_eq!(resolve_term_model(&term, &models), Some(&models[0]));
    }

    #[test]
    fn lag_sets_late_payment_date_only() {
        let mut m = model("Annually", dec!(1000));
        m.first_payment_lag_days = Some(dec!(30));
        m.subsequent_payment_lag_days = Some(dec!(10));
        let term = dated_term(date(2024, 1, 1), date(2025, 12, 31));

        let payments = calc_periodic_payments_for_term(&term, &[m], &[grantor("A")], dec!(0));
        assert_eq!(payments[0].payment_date, date(2024, 1, 1));
        assert_eq!(payments[0].late_payment_date, Some(date(2024, 1, 31)));
        assert_eq!(payments[1].late_payment_date, Some(date(2025, 1, 11)));
    }

    #[test]
    fn fixed_first_payment_stays_inside_each_term() {
        let mut m = model("Annually", dec!(1000));
        m.name = Some("Opt".into());
        m.first_payment_date = Some(date(2024, 3, 1));
        let terms = [
            AgreementTerm {
                term_ordinal: Some(1),
                payment_model: Some("Opt".into()),
                ..dated_term(date(2024, 1, 1), date(2026, 12, 31))
            },
            AgreementTerm {
                term_ordinal: Some(2),
                payment_model: Some("Opt".into()),
                ..dated_term(date(2027, 1, 1), date(2028, 12, 31))
            },
        ];

        let first = calc_periodic_payments_for_term(&terms[0], &[m.clone()], &[grantor("A")], dec!(0));
        let dates: Vec<_> = first.iter().map(|p| p.payment_date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2025, 3, 1), date(2026, 3, 1)]);

        let second = calc_periodic_payments_for_term(&terms[1], &[m], &[grantor("A")], dec!(0));
        let dates: Vec<_> = second.iter().map(|p| p.payment_date).collect();
        assert_eq!(dates, vec![date(2027, 1, 1), date(2028, 1, 1)]);
        assert!(second.iter().all(|p| {
            p.payment_period_start >= date(2027, 1, 1) && p.payment_period_end <= date(2028, 12, 31)
        }));
    }

    #[test]
    fn first_payment_before_term_start_is_moved_to_it() {
        let periods = term_periods(
            date(2027, 1, 1),
            date(2028, 12, 31),
            date(2024, 3, 1),
            PaymentFrequency::Annually,
            true,
        );
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start, date(2027, 1, 1));
        assert_eq!(periods[0].escalation_index, 0);
        assert_eq!(periods[1].end, date(2028, 12, 31));
    }

    #[test]
    fn overflowing_escalation_skips_the_term() {
        let mut m = model("Annually", dec!(10000));
        m.escalation_rate = Some(dec!(100));
        let term = dated_term(date(2024, 1, 1), date(2122, 12, 31));

        let payments = calc_periodic_payments_for_term(&term, &[m], &[grantor("A")], dec!(0));
        assert!(payments.is_empty());
    }

    #[test]
    fn overflowing_term_amount_skips_the_term() {
        let mut term = dated_term(date(2024, 1, 1), date(2024, 12, 31));
        term.cumulative_increase_amount = Decimal::MAX;

        let payments =
            calc_periodic_payments_for_term(&term, &[model("Annually", dec!(1))], &[grantor("A")], dec!(0));
        assert!(payments.is_empty());
    }

    fn splits_summing_to_100(weights: &[u32]) -> Vec<Decimal> {
        let total: u32 = weights.iter().sum();
        let mut splits: Vec<Decimal> = weights[..weights.len() - 1]
            .iter()
            .map(|w| Decimal::from(w * 10_000 / total) / dec!(100))
            .collect();
        let assigned: Decimal = splits.iter().sum();
        splits.push(dec!(100) - assigned);
        splits
    }

    proptest! {
        #[test]
        fn grantor_splits_conserve_the_period_amount(
            cents in 1i64..100_000_000,
            weights in proptest::collection::vec(1u32..1_000, 1..6),
        ) {
            let m = model("Annually", Decimal::new(cents, 2));
            let term = dated_term(date(2024, 1, 1), date(2024, 12, 31));
            let grantors: Vec<Grantor> = splits_summing_to_100(&weights)
                .into_iter()
                .enumerate()
                .map(|(i, split)| Grantor {
                    payment_split: Some(split),
                    ..grantor(&format!("Owner {}", i))
                })
                .collect();

            let single = calc_periodic_payments_for_term(&term, &[m.clone()], &[grantor("A")], dec!(0));
            let split = calc_periodic_payments_for_term(&term, &[m], &grantors, dec!(0));

            prop_assert_eq!(split.len(), grantors.len());
            let total: Decimal = split.iter().map(|p| p.payment_amount).sum();
            prop_assert!((total - single[0].payment_amount).abs() < dec!(0.0001));
        }

        #[test]
        fn equal_splits_conserve_the_period_amount(
            cents in 1i64..100_000_000,
            owners in 1usize..7,
        ) {
            let m = model("Monthly", Decimal::new(cents, 2));
            let term = dated_term(date(2024, 1, 1), date(2024, 3, 31));
            let grantors: Vec<Grantor> = (0..owners).map(|i| grantor(&format!("Owner {}", i))).collect();

            let single = calc_periodic_payments_for_term(&term, &[m.clone()], &[grantor("A")], dec!(0));
            let split = calc_periodic_payments_for_term(&term, &[m], &grantors, dec!(0));

            for (index, whole) in single.iter().enumerate() {
                let total: Decimal = split
                    .iter()
                    .filter(|p| p.payment_index == index as u32)
                    .map(|p| p.payment_amount)
                    .sum();
                prop_assert!((total - whole.payment_amount).abs() < dec!(0.0001));
            }
        }
    }
}
