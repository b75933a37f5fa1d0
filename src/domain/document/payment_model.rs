//! Payment models and the strategy enums that drive schedule generation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::facts::FactRecord;
use crate::domain::foundation::{
    calculate_compounding_growth, calculate_growth, percent_to_rate, FactId, ValidationError,
};

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ════════════════════════════════════════════════════════════════════════════════
// PaymentFrequency
// ════════════════════════════════════════════════════════════════════════════════

/// How often a payment (or an escalation) recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Annually,
    Semiannually,
    Quarterly,
    Monthly,
    /// A single payment covering the whole term.
    OncePerTerm,
}

impl PaymentFrequency {
    /// Parses an upstream select-list value.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match normalize(value).as_str() {
            "annually" | "annual" | "yearly" => Ok(PaymentFrequency::Annually),
            "semiannually" | "semi annually" | "semiannual" | "semi annual" => {
                Ok(PaymentFrequency::Semiannually)
            }
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "once per term" | "once" | "one time" => Ok(PaymentFrequency::OncePerTerm),
            "" => Err(ValidationError::empty_field("payment_frequency")),
            _ => Err(ValidationError::unrecognized("payment_frequency", value)),
        }
    }

    /// Parses an optional value; absent is an empty-field error.
    pub fn parse_opt(value: Option<&str>) -> Result<Self, ValidationError> {
        value
            .map(Self::parse)
            .unwrap_or_else(|| Err(ValidationError::empty_field("payment_frequency")))
    }

    /// Calendar months per period, `None` for once-per-term.
    pub fn months(&self) -> Option<u32> {
        match self {
            PaymentFrequency::Annually => Some(12),
            PaymentFrequency::Semiannually => Some(6),
            PaymentFrequency::Quarterly => Some(3),
            PaymentFrequency::Monthly => Some(1),
            PaymentFrequency::OncePerTerm => None,
        }
    }

    /// Periods per year, `None` for once-per-term.
    pub fn periods_per_year(&self) -> Option<u32> {
        self.months().map(|m| 12 / m)
    }

    /// Number of escalation steps applied by the period at `period_index`
    /// when paying at `self` and escalating at `escalation`.
    ///
    /// Monthly payments with annual escalation step up every 12 periods;
    /// annual payments with monthly escalation step up 12 times per period.
    pub fn escalation_steps(&self, escalation: PaymentFrequency, period_index: u32) -> u32 {
        match (self.periods_per_year(), escalation.periods_per_year()) {
            (Some(payments), Some(escalations)) => period_index * escalations / payments,
            _ => 0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// FirstPaymentPolicy
// ════════════════════════════════════════════════════════════════════════════════

/// When the first payment of a term falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstPaymentPolicy {
    StartWithTerm,
    NextJanuaryFirst,
    FirstOfNextMonth,
    FixedDate(NaiveDate),
}

impl FirstPaymentPolicy {
    /// Resolves the policy from the `first_payment_start` select value and an
    /// optional explicit date. Unknown or missing values start with the term.
    pub fn resolve(start: Option<&str>, fixed_date: Option<NaiveDate>) -> Self {
        let normalized = start.map(normalize);
        match normalized.as_deref() {
            Some("start with term") | Some("term start") => FirstPaymentPolicy::StartWithTerm,
            Some("next jan 1") | Some("next january 1") | Some("january 1") | Some("jan 1") => {
                FirstPaymentPolicy::NextJanuaryFirst
            }
            Some("1st of month") | Some("first of month") | Some("1st of next month")
            | Some("first of next month") => FirstPaymentPolicy::FirstOfNextMonth,
            _ => match fixed_date {
                Some(date) => FirstPaymentPolicy::FixedDate(date),
                None => FirstPaymentPolicy::StartWithTerm,
            },
        }
    }

    /// First payment date for a term commencing on `term_start`.
    pub fn first_payment_date(&self, term_start: NaiveDate) -> NaiveDate {
        match *self {
            FirstPaymentPolicy::StartWithTerm => term_start,
            FirstPaymentPolicy::NextJanuaryFirst => {
                if term_start.ordinal() == 1 {
                    term_start
                } else {
                    NaiveDate::from_ymd_opt(term_start.year() + 1, 1, 1).unwrap_or(term_start)
                }
            }
            FirstPaymentPolicy::FirstOfNextMonth => {
                if term_start.day() == 1 {
                    term_start
                } else {
                    term_start
                        .with_day(1)
                        .and_then(|d| d.checked_add_months(chrono::Months::new(1)))
                        .unwrap_or(term_start)
                }
            }
            FirstPaymentPolicy::FixedDate(date) => date,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Escalation and lag
// ════════════════════════════════════════════════════════════════════════════════

/// Whether periodic escalation compounds or grows linearly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EscalationType {
    #[default]
    Compounding,
    Linear,
}

impl EscalationType {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(normalize).as_deref() {
            Some("linear") | Some("simple") | Some("fixed") => EscalationType::Linear,
            _ => EscalationType::Compounding,
        }
    }
}

/// Resolved periodic escalation of a payment model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    /// Rate per escalation step (`0.02` for 2%).
    pub rate: Decimal,
    /// How often the rate steps; defaults to annually.
    pub frequency: PaymentFrequency,
    pub kind: EscalationType,
}

impl Escalation {
    /// Escalates `base` by `steps` applications of the rate, or `None` on
    /// overflow.
    pub fn apply(&self, base: Decimal, steps: u32) -> Option<Decimal> {
        match self.kind {
            EscalationType::Compounding => calculate_compounding_growth(base, self.rate, steps),
            EscalationType::Linear => calculate_growth(base, self.rate, steps),
        }
    }
}

/// Informational lag between a payment date and its late date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LagPolicy {
    pub first_days: i64,
    pub subsequent_days: i64,
    /// Whether lag also applies on extension terms.
    pub on_extensions: bool,
}

impl LagPolicy {
    /// Lag in days for the period at `period_index`.
    pub fn days_for(&self, period_index: u32, extension: bool) -> i64 {
        if extension && !self.on_extensions {
            return 0;
        }
        if period_index == 0 {
            self.first_days
        } else {
            self.subsequent_days
        }
    }
}

/// Settings shared by term-based and date-based models.
pub trait ScheduledModel {
    fn escalation(&self) -> Escalation;
    fn lag(&self) -> LagPolicy;
    /// Explicit payee overriding the grantor nickname.
    fn payee_override(&self) -> Option<&str>;
    fn applicable_to_purchase(&self) -> bool;
    fn refundable(&self) -> bool;
}

fn escalation_from(rate: Option<Decimal>, frequency: Option<&str>, kind: Option<&str>) -> Escalation {
    Escalation {
        rate: percent_to_rate(rate),
        frequency: frequency
            .and_then(|f| PaymentFrequency::parse(f).ok())
            .unwrap_or(PaymentFrequency::Annually),
        kind: EscalationType::parse(kind),
    }
}

fn days(value: Option<Decimal>) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    value.and_then(|d| d.trunc().to_i64()).unwrap_or(0)
}

// ════════════════════════════════════════════════════════════════════════════════
// TermPaymentModel
// ════════════════════════════════════════════════════════════════════════════════

/// Pricing and schedule settings applied to agreement terms by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermPaymentModel {
    pub fact_id: Option<FactId>,
    pub name: Option<String>,
    pub payment_frequency: Option<String>,
    pub minimum_payment: Option<Decimal>,
    pub payment_per_mw: Option<Decimal>,
    pub mw: Option<Decimal>,
    pub inverter_count: Option<Decimal>,
    pub inverter_rating_mva: Option<Decimal>,
    pub payment_per_mva: Option<Decimal>,
    pub flat_payment_amount: Option<Decimal>,
    pub payment_per_acre: Option<Decimal>,
    pub agreement_acres: Option<Decimal>,
    /// Percent per escalation step.
    pub escalation_rate: Option<Decimal>,
    pub escalation_frequency: Option<String>,
    pub escalation_type: Option<String>,
    pub first_payment_start: Option<String>,
    pub first_payment_date: Option<NaiveDate>,
    pub first_payment_lag_days: Option<Decimal>,
    pub subsequent_payment_lag_days: Option<Decimal>,
    pub lag_applies_to_extensions: bool,
    pub prorate_first_period: bool,
    pub payee: Option<String>,
    pub applicable_to_purchase: bool,
    pub refundable: bool,
}

impl TermPaymentModel {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            fact_id: Some(record.id),
            name: record.text("model_name"),
            payment_frequency: record.text("payment_frequency"),
            minimum_payment: record.number("minimum_payment"),
            payment_per_mw: record.number("payment_per_mw"),
            mw: record.number("mw"),
            inverter_count: record.number("inverter_count"),
            inverter_rating_mva: record.number("inverter_rating_mva"),
            payment_per_mva: record.number("payment_per_mva"),
            flat_payment_amount: record.number("flat_payment_amount"),
            payment_per_acre: record.number("payment_per_acre"),
            agreement_acres: record.number("agreement_acres"),
            escalation_rate: record.number("escalation_rate"),
            escalation_frequency: record.text("escalation_frequency"),
            escalation_type: record.text("escalation_type"),
            first_payment_start: record.text("first_payment_start"),
            first_payment_date: record.date("first_payment_date"),
            first_payment_lag_days: record.number("first_payment_lag_days"),
            subsequent_payment_lag_days: record.number("subsequent_payment_lag_days"),
            lag_applies_to_extensions: record.flag("lag_applies_to_extensions").unwrap_or(true),
            prorate_first_period: record.flag("prorate_first_period").unwrap_or(false),
            payee: record.text("payee"),
            applicable_to_purchase: record.flag("applicable_to_purchase").unwrap_or(false),
            refundable: record.flag("refundable").unwrap_or(false),
        }
    }

    pub fn frequency(&self) -> Result<PaymentFrequency, ValidationError> {
        PaymentFrequency::parse_opt(self.payment_frequency.as_deref())
    }

    pub fn first_payment_policy(&self) -> FirstPaymentPolicy {
        FirstPaymentPolicy::resolve(self.first_payment_start.as_deref(), self.first_payment_date)
    }

    /// Base payment: the largest amount any pricing method yields.
    /// `fallback_acres` is used when the model carries no acreage itself.
    pub fn base_payment(&self, fallback_acres: Decimal) -> Decimal {
        PricingMethod::ALL
            .iter()
            .map(|method| method.amount(self, fallback_acres))
            .fold(Decimal::ZERO, Decimal::max)
    }

    /// Whether any pricing method has all of its inputs.
    pub fn has_pricing_inputs(&self, fallback_acres: Decimal) -> bool {
        PricingMethod::ALL
            .iter()
            .any(|method| method.amount(self, fallback_acres) > Decimal::ZERO)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .map(|n| n.trim().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(false)
    }
}

impl ScheduledModel for TermPaymentModel {
    fn escalation(&self) -> Escalation {
        escalation_from(
            self.escalation_rate,
            self.escalation_frequency.as_deref(),
            self.escalation_type.as_deref(),
        )
    }

    fn lag(&self) -> LagPolicy {
        LagPolicy {
            first_days: days(self.first_payment_lag_days),
            subsequent_days: days(self.subsequent_payment_lag_days),
            on_extensions: self.lag_applies_to_extensions,
        }
    }

    fn payee_override(&self) -> Option<&str> {
        self.payee.as_deref()
    }

    fn applicable_to_purchase(&self) -> bool {
        self.applicable_to_purchase
    }

    fn refundable(&self) -> bool {
        self.refundable
    }
}

/// The independent ways a periodic base payment can be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingMethod {
    MinimumPayment,
    PerMegawatt,
    PerInverterMva,
    FlatAmount,
    PerAcre,
}

impl PricingMethod {
    pub const ALL: [PricingMethod; 5] = [
        PricingMethod::MinimumPayment,
        PricingMethod::PerMegawatt,
        PricingMethod::PerInverterMva,
        PricingMethod::FlatAmount,
        PricingMethod::PerAcre,
    ];

    /// Amount this method yields; missing inputs count as zero.
    pub fn amount(&self, model: &TermPaymentModel, fallback_acres: Decimal) -> Decimal {
        let v = |x: Option<Decimal>| x.unwrap_or(Decimal::ZERO);
        match self {
            PricingMethod::MinimumPayment => v(model.minimum_payment),
            PricingMethod::PerMegawatt => v(model.payment_per_mw).saturating_mul(v(model.mw)),
            PricingMethod::PerInverterMva => v(model.inverter_count)
                .saturating_mul(v(model.inverter_rating_mva))
                .saturating_mul(v(model.payment_per_mva)),
            PricingMethod::FlatAmount => v(model.flat_payment_amount),
            PricingMethod::PerAcre => {
                v(model.payment_per_acre).saturating_mul(model.agreement_acres.unwrap_or(fallback_acres))
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// DatePaymentModel
// ════════════════════════════════════════════════════════════════════════════════

/// A one-time payment on a date, or a recurring schedule over `[begin, end)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatePaymentModel {
    pub fact_id: Option<FactId>,
    pub description: Option<String>,
    pub payment_amount: Option<Decimal>,
    /// Set for one-time payments.
    pub payment_date: Option<NaiveDate>,
    pub begin_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_frequency: Option<String>,
    pub escalation_rate: Option<Decimal>,
    pub escalation_frequency: Option<String>,
    pub escalation_type: Option<String>,
    pub first_payment_lag_days: Option<Decimal>,
    pub subsequent_payment_lag_days: Option<Decimal>,
    pub payee: Option<String>,
    pub applicable_to_purchase: bool,
    pub refundable: bool,
}

impl DatePaymentModel {
    pub fn from_record(record: &FactRecord) -> Self {
        Self {
            fact_id: Some(record.id),
            description: record.text("payment_description"),
            payment_amount: record.number("payment_amount"),
            payment_date: record.date("payment_date"),
            begin_date: record.date("begin_date"),
            end_date: record.date("end_date"),
            payment_frequency: record.text("payment_frequency"),
            escalation_rate: record.number("escalation_rate"),
            escalation_frequency: record.text("escalation_frequency"),
            escalation_type: record.text("escalation_type"),
            first_payment_lag_days: record.number("first_payment_lag_days"),
            subsequent_payment_lag_days: record.number("subsequent_payment_lag_days"),
            payee: record.text("payee"),
            applicable_to_purchase: record.flag("applicable_to_purchase").unwrap_or(false),
            refundable: record.flag("refundable").unwrap_or(false),
        }
    }

    /// A model with a payment date and no begin date is one-time.
    pub fn is_one_time(&self) -> bool {
        self.payment_date.is_some() && self.begin_date.is_none()
    }

    pub fn frequency(&self) -> Result<PaymentFrequency, ValidationError> {
        PaymentFrequency::parse_opt(self.payment_frequency.as_deref())
    }

    pub fn label(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| "Date payment".to_string())
    }
}

impl ScheduledModel for DatePaymentModel {
    fn escalation(&self) -> Escalation {
        escalation_from(
            self.escalation_rate,
            self.escalation_frequency.as_deref(),
            self.escalation_type.as_deref(),
        )
    }

    fn lag(&self) -> LagPolicy {
        LagPolicy {
            first_days: days(self.first_payment_lag_days),
            subsequent_days: days(self.subsequent_payment_lag_days),
            on_extensions: true,
        }
    }

    fn payee_override(&self) -> Option<&str> {
        self.payee.as_deref()
    }

    fn applicable_to_purchase(&self) -> bool {
        self.applicable_to_purchase
    }

    fn refundable(&self) -> bool {
        self.refundable
    }
}
