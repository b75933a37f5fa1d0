//! Date-based payments: one-time payments and recurring `[begin, end)`
//! schedules independent of agreement terms.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::split::{split_to_grantors, PeriodPayment};
use crate::domain::document::{DatePaymentModel, Document, Payment, PaymentSource, ScheduledModel};
use crate::domain::foundation::{earliest_date, round_money};

/// Payments for every date payment model on the document.
pub fn calc_date_payments(doc: &Document) -> Vec<Payment> {
    if doc.grantor.is_empty() {
        return Vec::new();
    }
    doc.date_payment_models
        .iter()
        .flat_map(|model| payments_for_model(doc, model))
        .collect()
}

fn payments_for_model(doc: &Document, model: &DatePaymentModel) -> Vec<Payment> {
    let Some(amount) = model.payment_amount else {
        debug!(document_id = %doc.id, model = %model.label(), "Date payment model has no amount");
        return Vec::new();
    };
    let source = PaymentSource::Date {
        description: model.label(),
    };
    let termination = doc.termination_date();
    let lag = model.lag();

    if let (true, Some(date)) = (model.is_one_time(), model.payment_date) {
        if termination.is_some_and(|t| t < date) || model.end_date.is_some_and(|e| e < date) {
            debug!(document_id = %doc.id, model = %model.label(), "One-time payment falls after end");
            return Vec::new();
        }
        let payment = PeriodPayment {
            source,
            payment_index: 0,
            payment_date: date,
            lag_days: lag.days_for(0, false),
            period_start: date,
            period_end: date,
            amount: round_money(amount),
            prorata_factor: Decimal::ONE,
        };
        return split_to_grantors(&payment, &doc.grantor, model);
    }

    let Some(begin) = model.begin_date else {
        debug!(document_id = %doc.id, model = %model.label(), "Date payment model has no dates");
        return Vec::new();
    };
    let frequency = match model.frequency() {
        Ok(frequency) => frequency,
        Err(error) => {
            warn!(document_id = %doc.id, model = %model.label(), %error, "Skipping date payments");
            return Vec::new();
        }
    };
    let Some(end) = earliest_date([termination, model.end_date, model.payment_date])
        .or_else(|| doc.final_term_end_date.and_then(|d| d.succ_opt()))
    else {
        warn!(document_id = %doc.id, model = %model.label(), "Recurring date payment has no end");
        return Vec::new();
    };

    let escalation = model.escalation();
    let period = |index: u32, start: NaiveDate, period_end: NaiveDate| {
        let steps = frequency.escalation_steps(escalation.frequency, index);
        let amount = escalation.apply(amount, steps)?;
        Some(PeriodPayment {
            source: source.clone(),
            payment_index: index,
            payment_date: start,
            lag_days: lag.days_for(index, false),
            period_start: start,
            period_end,
            amount: round_money(amount),
            prorata_factor: Decimal::ONE,
        })
    };
    let overflow = || -> Vec<Payment> {
        warn!(
            document_id = %doc.id,
            model = %model.label(),
            "Escalated payment overflows; skipping date payments"
        );
        Vec::new()
    };
    let last_day = end.checked_sub_days(Days::new(1)).unwrap_or(end);

    let Some(months) = frequency.months() else {
        if begin >= end {
            return Vec::new();
        }
        return match period(0, begin, last_day) {
            Some(payment) => split_to_grantors(&payment, &doc.grantor, model),
            None => overflow(),
        };
    };

    let mut payments = Vec::new();
    for k in 0u32.. {
        let Some(start) = begin.checked_add_months(Months::new(months * k)) else {
            break;
        };
        if start >= end {
            break;
        }
        let period_end = begin
            .checked_add_months(Months::new(months * (k + 1)))
            .and_then(|d| d.pred_opt())
            .map_or(last_day, |d| d.min(last_day));
        let Some(payment) = period(k, start, period_end) else {
            return overflow();
        };
        payments.extend(split_to_grantors(&payment, &doc.grantor, model));
    }
    payments
}
