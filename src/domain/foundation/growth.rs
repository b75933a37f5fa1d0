//! Escalation formulas and decimal rounding.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

/// Decimal places kept on payment amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places kept on pro-rata factors and split ratios.
pub const RATIO_DP: u32 = 4;

/// Linear growth: `base * (1 + rate * periods)`.
///
/// `None` when the result does not fit in a `Decimal`.
pub fn calculate_growth(base: Decimal, rate: Decimal, periods: u32) -> Option<Decimal> {
    let factor = rate
        .checked_mul(Decimal::from(periods))?
        .checked_add(Decimal::ONE)?;
    base.checked_mul(factor)
}

/// Compounding growth: `base * (1 + rate) ^ periods`.
///
/// `None` when the result does not fit in a `Decimal`.
pub fn calculate_compounding_growth(base: Decimal, rate: Decimal, periods: u32) -> Option<Decimal> {
    let factor = Decimal::ONE
        .checked_add(rate)?
        .checked_powu(u64::from(periods))?;
    base.checked_mul(factor)
}

/// Adds up amounts, pinning at the `Decimal` bounds instead of overflowing.
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Rounds half away from zero, matching how amounts are quoted in agreements.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to cents.
pub fn round_money(value: Decimal) -> Decimal {
    round_to(value, MONEY_DP)
}

/// Converts a percentage fact (e.g. `2.5`) to a rate (`0.025`). Missing is zero.
pub fn percent_to_rate(percent: Option<Decimal>) -> Decimal {
    percent.map(|p| p / dec!(100)).unwrap_or(Decimal::ZERO)
}
