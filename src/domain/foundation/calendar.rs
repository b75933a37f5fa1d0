//! Calendar helpers for agreement terms and payment periods.

use chrono::{DateTime, Days, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Days used to convert the fractional remainder of a year length.
const DAYS_PER_FRACTIONAL_YEAR: Decimal = dec!(365);

/// Calendar duration derived from a decimal term length in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermDuration {
    /// Missing or non-positive length.
    Zero,
    /// Sub-year lengths that land on a whole number of months.
    Months(u32),
    /// Whole years plus whole remainder months.
    YearsMonths { years: u32, months: u32 },
    /// Lengths with no exact month fraction: whole years plus the
    /// remainder converted to days.
    FractionalYears { years: u32, days: u64 },
}

impl TermDuration {
    /// Classifies a term length given in (possibly fractional) years.
    pub fn from_years(length_years: Option<Decimal>) -> Self {
        let years = match length_years {
            Some(years) if years > Decimal::ZERO => years,
            _ => return TermDuration::Zero,
        };

        // Lengths past u32 months cannot land on a calendar date anyway.
        let out_of_range = TermDuration::YearsMonths {
            years: u32::MAX,
            months: 0,
        };
        let (Some(months), Some(whole_years)) =
            (years.checked_mul(dec!(12)), years.trunc().to_u32())
        else {
            return out_of_range;
        };

        if months.fract().is_zero() {
            let Some(total_months) = months.to_u32() else {
                return out_of_range;
            };
            if years < Decimal::ONE {
                return TermDuration::Months(total_months);
            }
            return TermDuration::YearsMonths {
                years: whole_years,
                months: total_months - whole_years * 12,
            };
        }

        let days = (years.fract() * DAYS_PER_FRACTIONAL_YEAR)
            .round()
            .to_u64()
            .unwrap_or(0);
        TermDuration::FractionalYears {
            years: whole_years,
            days,
        }
    }

    /// Adds this duration to `start`. Returns `None` only on calendar overflow.
    pub fn add_to(&self, start: NaiveDate) -> Option<NaiveDate> {
        match *self {
            TermDuration::Zero => Some(start),
            TermDuration::Months(months) => start.checked_add_months(Months::new(months)),
            TermDuration::YearsMonths { years, months } => {
                let total = years.checked_mul(12)?.checked_add(months)?;
                start.checked_add_months(Months::new(total))
            }
            TermDuration::FractionalYears { years, days } => start
                .checked_add_months(Months::new(years.checked_mul(12)?))
                .and_then(|d| d.checked_add_days(Days::new(days))),
        }
    }
}

/// Computes the last day of a term that starts on `start` and runs for
/// `length_years`: start + duration - 1 day.
pub fn add_term_length(start: NaiveDate, length_years: Option<Decimal>) -> Option<NaiveDate> {
    TermDuration::from_years(length_years)
        .add_to(start)
        .and_then(|d| d.pred_opt())
}

/// Returns the earliest of the dates that are present.
pub fn earliest_date<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    dates.into_iter().flatten().min()
}

/// Number of calendar days in `[start, end]`, counting both ends.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Parses an upstream date value.
///
/// Accepts RFC 3339 timestamps (`2024-01-01T00:00:00Z`), bare ISO dates, and
/// timestamps without an offset; anything else yields `None`.
pub fn parse_fact_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}
