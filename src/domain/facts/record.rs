//! Generic fact values and the per-instance records built from them.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::raw::{DataType, FactType, RawField};
use crate::domain::foundation::{parse_fact_date, FactId, FactTypeId, FieldTypeId};

static FIELD_NAME_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s()\-]+").expect("static pattern"));

/// Normalizes a human-readable field name into a property key:
/// `"Term Length (Years)"` becomes `"term_length_years"`.
///
/// Distinct names that normalize to the same key collide; the later field wins.
pub fn clean_field_names(name: &str) -> String {
    let lowered = name.to_lowercase();
    let collapsed = FIELD_NAME_SEPARATORS.replace_all(&lowered, "_");
    collapsed.trim_end_matches('_').to_string()
}

/// The requested conversion for a single extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Date,
    Number,
    String,
    Bool,
}

/// A typed fact field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FactValue {
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
    Bool(bool),
}

impl FactValue {
    /// Converts a raw field by the given kind. Returns `None` when the slot for
    /// that kind is empty or the date does not parse.
    pub fn from_raw(field: &RawField, kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Number => field.number_value.map(FactValue::Number),
            ValueKind::Date => field
                .date_value
                .as_deref()
                .and_then(parse_fact_date)
                .map(FactValue::Date),
            ValueKind::String => field.string_value.clone().map(FactValue::Text),
            ValueKind::Bool => field.boolean_value.map(FactValue::Bool),
        }
    }

    /// Whether the value survives the sparse-record policy: zero, empty
    /// strings and `false` are dropped.
    pub fn is_truthy(&self) -> bool {
        match self {
            FactValue::Number(n) => !n.is_zero(),
            FactValue::Date(_) => true,
            FactValue::Text(s) => !s.is_empty(),
            FactValue::Bool(b) => *b,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FactValue::Number(n) => Some(*n),
            FactValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FactValue::Date(d) => Some(*d),
            FactValue::Text(s) => parse_fact_date(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(b) => Some(*b),
            FactValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "y" => Some(true),
                "no" | "false" | "n" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl ValueKind {
    /// How a field of `data_type` is read, or `None` for types that are not.
    pub fn of(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::Number => Some(ValueKind::Number),
            DataType::Date => Some(ValueKind::Date),
            DataType::String | DataType::SelectList => Some(ValueKind::String),
            DataType::Boolean => Some(ValueKind::Bool),
            DataType::Unknown => None,
        }
    }
}

/// One fact instance flattened into normalized property keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRecord {
    pub id: FactId,
    pub values: BTreeMap<String, FactValue>,
}

impl FactRecord {
    pub fn new(id: FactId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FactValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.values.get(key)
    }

    pub fn number(&self, key: &str) -> Option<Decimal> {
        self.get(key).and_then(FactValue::as_number)
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.get(key).and_then(FactValue::as_date)
    }

    /// Text value, with surrounding whitespace trimmed and blanks treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(FactValue::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(FactValue::as_bool)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalized key and declared type of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub key: String,
    pub data_type: DataType,
}

/// A fact type with its field names normalized once, so per-document
/// extraction does no name matching.
#[derive(Debug, Clone, PartialEq)]
pub struct FactSchema {
    pub fact_type_id: FactTypeId,
    pub name: String,
    pub fields: HashMap<FieldTypeId, FieldSchema>,
}

impl FactSchema {
    pub fn from_fact_type(fact_type: &FactType) -> Self {
        let fields = fact_type
            .fields
            .iter()
            .map(|f| {
                (
                    f.id,
                    FieldSchema {
                        key: clean_field_names(&f.name),
                        data_type: f.data_type,
                    },
                )
            })
            .collect();

        Self {
            fact_type_id: fact_type.id,
            name: fact_type.name.clone(),
            fields,
        }
    }
}
