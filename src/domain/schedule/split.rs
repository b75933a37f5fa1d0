//! Per-grantor payment splitting.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::document::{Grantor, Payment, PaymentSource, ScheduledModel};
use crate::domain::foundation::{round_money, round_to, RATIO_DP};

/// A payment for one period before it is divided between grantors.
#[derive(Debug, Clone)]
pub struct PeriodPayment {
    pub source: PaymentSource,
    pub payment_index: u32,
    pub payment_date: NaiveDate,
    pub lag_days: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount: Decimal,
    pub prorata_factor: Decimal,
}

/// Percent share of each grantor: the configured split, or an equal share.
pub fn grantor_shares(grantors: &[Grantor]) -> Vec<Decimal> {
    if grantors.is_empty() {
        return Vec::new();
    }
    let equal = dec!(100) / Decimal::from(grantors.len());
    grantors
        .iter()
        .map(|g| g.payment_split.unwrap_or(equal))
        .collect()
}

fn late_date(date: NaiveDate, lag_days: i64) -> Option<NaiveDate> {
    if lag_days <= 0 {
        return None;
    }
    date.checked_add_days(Days::new(lag_days as u64))
}

/// Divides `amount` by percent shares, rounding the running total rather
/// than each share so the cents add back up to the rounded whole.
fn share_amounts(amount: Decimal, shares: &[Decimal]) -> Vec<Decimal> {
    let mut exact = Decimal::ZERO;
    let mut allocated = Decimal::ZERO;
    shares
        .iter()
        .map(|share| {
            exact = exact.saturating_add(amount.saturating_mul(*share / dec!(100)));
            let running = round_money(exact);
            let portion = running.saturating_sub(allocated);
            allocated = running;
            portion
        })
        .collect()
}

/// Emits one payment per grantor for a period, named by the model's payee
/// override or the grantor's nickname.
pub fn split_to_grantors<M: ScheduledModel + ?Sized>(
    period: &PeriodPayment,
    grantors: &[Grantor],
    model: &M,
) -> Vec<Payment> {
    let late = late_date(period.payment_date, period.lag_days);
    let amounts = share_amounts(period.amount, &grantor_shares(grantors));
    grantors
        .iter()
        .zip(amounts)
        .map(|(grantor, amount)| Payment {
            source: period.source.clone(),
            payment_index: period.payment_index,
            payment_date: period.payment_date,
            late_payment_date: late,
            payment_period_start: period.period_start,
            payment_period_end: period.period_end,
            payment_amount: amount,
            payee: model
                .payee_override()
                .map(str::to_string)
                .unwrap_or_else(|| grantor.nickname()),
            applicable_to_purchase: model.applicable_to_purchase(),
            refundable: model.refundable(),
            prorata_factor: round_to(period.prorata_factor, RATIO_DP),
        })
        .collect()
}
