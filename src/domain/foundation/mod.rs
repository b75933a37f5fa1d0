//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, calendar and money helpers, and error types
//! that form the vocabulary of the Jupiter document domain.

mod calendar;
mod errors;
mod growth;
mod ids;

pub use calendar::{
    add_term_length, days_inclusive, earliest_date, parse_fact_date, TermDuration,
};
pub use errors::ValidationError;
pub use growth::{
    calculate_compounding_growth, calculate_growth, percent_to_rate, round_money, round_to,
    saturating_sum, MONEY_DP, RATIO_DP,
};
pub use ids::{DocumentId, DocumentTypeId, FactId, FactTypeId, FieldTypeId, TagId};
