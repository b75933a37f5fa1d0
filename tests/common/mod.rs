//! Shared fixtures for integration tests.
//!
//! Builds an upstream catalog (fact types, document types, tags) using the
//! same names the live export carries, plus a small builder for raw documents.

#![allow(dead_code)]

use jupiter_docs::domain::facts::{
    DataType, DocumentTypeDef, FactType, FieldType, RawDocument, RawFact, RawField, ReferenceData,
    TagDef,
};
use jupiter_docs::domain::foundation::{
    DocumentId, DocumentTypeId, FactId, FactTypeId, FieldTypeId, TagId,
};
use rust_decimal::Decimal;

/// A field value as it would appear on a raw fact.
#[derive(Debug, Clone)]
pub enum Value {
    Num(Decimal),
    Date(&'static str),
    Text(&'static str),
    Flag(bool),
}

const CATALOG: &[(&str, &[(&str, DataType)])] = &[
    ("Agreement Group", &[("Agreement Group", DataType::String)]),
    ("Effective Date", &[("Effective Date", DataType::Date)]),
    ("Amendment Date", &[("Amendment Date", DataType::Date)]),
    ("Outside Date", &[("Outside Date", DataType::Date)]),
    ("Closing Date", &[("Closing Date", DataType::Date)]),
    ("Purchase Price", &[("Full Purchase Price", DataType::Number)]),
    ("Jupiter Entity", &[("Entity Name", DataType::String)]),
    ("Grantee", &[("Grantee Name", DataType::String)]),
    (
        "Grantor",
        &[
            ("Grantor Name", DataType::String),
            ("Payment Split", DataType::Number),
        ],
    ),
    (
        "Property Description",
        &[
            ("County", DataType::String),
            ("State", DataType::SelectList),
            ("Agreement Acres", DataType::Number),
        ],
    ),
    (
        "Agreement Term",
        &[
            ("Term Ordinal", DataType::Number),
            ("Term Type", DataType::SelectList),
            ("Term Length (Years)", DataType::Number),
            ("Extension", DataType::Boolean),
            ("Payment Model", DataType::String),
            ("Increase Amount", DataType::Number),
            ("Escalation Rate", DataType::Number),
        ],
    ),
    (
        "Term Payment Model",
        &[
            ("Model Name", DataType::String),
            ("Payment Frequency", DataType::SelectList),
            ("Flat Payment Amount", DataType::Number),
            ("Payment Per Acre", DataType::Number),
            ("Applicable To Purchase", DataType::Boolean),
        ],
    ),
    (
        "Date Payment Model",
        &[
            ("Payment Description", DataType::String),
            ("Payment Amount", DataType::Number),
            ("Payment Date", DataType::Date),
            ("Begin Date", DataType::Date),
            ("End Date", DataType::Date),
            ("Payment Frequency", DataType::SelectList),
        ],
    ),
    (
        "Operational Details",
        &[
            ("Construction Commencement Date", DataType::Date),
            ("Operations Commencement Date", DataType::Date),
        ],
    ),
    ("Termination", &[("Termination Date", DataType::Date)]),
];

const DOCUMENT_TYPES: &[&str] = &["Lease", "Deed", "Master Service Agreement"];

const TAGS: &[&str] = &["Operational", "Under Construction", "Terminated", "Purchased", "Closed"];

/// Upstream reference collections with fresh ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub fact_types: Vec<FactType>,
    pub document_types: Vec<DocumentTypeDef>,
    pub tags: Vec<TagDef>,
}

impl Catalog {
    pub fn new() -> Self {
        let fact_types = CATALOG
            .iter()
            .map(|(name, fields)| FactType {
                id: FactTypeId::new(),
                name: (*name).to_string(),
                archived: false,
                allow_multiple: true,
                fields: fields
                    .iter()
                    .map(|(field, data_type)| FieldType {
                        id: FieldTypeId::new(),
                        name: (*field).to_string(),
                        data_type: *data_type,
                    })
                    .collect(),
            })
            .collect();
        let document_types = DOCUMENT_TYPES
            .iter()
            .map(|name| DocumentTypeDef {
                id: DocumentTypeId::new(),
                name: (*name).to_string(),
            })
            .collect();
        let tags = TAGS
            .iter()
            .map(|name| TagDef {
                id: TagId::new(),
                name: (*name).to_string(),
            })
            .collect();
        Self {
            fact_types,
            document_types,
            tags,
        }
    }

    pub fn reference(&self) -> ReferenceData {
        ReferenceData::new(
            self.fact_types.clone(),
            self.document_types.clone(),
            self.tags.clone(),
        )
    }

    fn fact_type(&self, name: &str) -> &FactType {
        self.fact_types
            .iter()
            .find(|ft| ft.name == name)
            .unwrap_or_else(|| panic!("unknown fact type {}", name))
    }

    pub fn document_type(&self, name: &str) -> DocumentTypeId {
        self.document_types
            .iter()
            .find(|dt| dt.name == name)
            .map(|dt| dt.id)
            .unwrap_or_else(|| panic!("unknown document type {}", name))
    }

    pub fn tag(&self, name: &str) -> TagId {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .unwrap_or_else(|| panic!("unknown tag {}", name))
    }

    /// One raw fact of `fact_type` carrying the given field values.
    pub fn fact(&self, fact_type: &str, values: &[(&str, Value)]) -> RawFact {
        let ft = self.fact_type(fact_type);
        let fields = values
            .iter()
            .map(|(field_name, value)| {
                let field = ft
                    .fields
                    .iter()
                    .find(|f| f.name == *field_name)
                    .unwrap_or_else(|| panic!("unknown field {} on {}", field_name, fact_type));
                let mut raw = RawField {
                    fact_field_type_id: field.id,
                    data_type: Some(field.data_type),
                    ..RawField::default()
                };
                match value {
                    Value::Num(n) => raw.number_value = Some(*n),
                    Value::Date(d) => raw.date_value = Some(format!("{}T00:00:00.000Z", d)),
                    Value::Text(s) => raw.string_value = Some((*s).to_string()),
                    Value::Flag(b) => raw.boolean_value = Some(*b),
                }
                raw
            })
            .collect();
        RawFact {
            id: FactId::new(),
            fact_type_id: ft.id,
            fields,
        }
    }

    /// Fact carrying a single field value.
    pub fn scalar(&self, fact_type: &str, field: &str, value: Value) -> RawFact {
        self.fact(fact_type, &[(field, value)])
    }

    pub fn document(&self, name: &str, document_type: &str) -> DocBuilder<'_> {
        DocBuilder {
            catalog: self,
            raw: RawDocument {
                id: DocumentId::new(),
                name: name.to_string(),
                document_type_id: Some(self.document_type(document_type)),
                tag_ids: vec![],
                facts: vec![],
            },
        }
    }
}

/// Fluent builder for a raw document.
pub struct DocBuilder<'a> {
    catalog: &'a Catalog,
    raw: RawDocument,
}

impl DocBuilder<'_> {
    pub fn group(self, group: &'static str) -> Self {
        self.fact_from(|catalog| catalog.scalar("Agreement Group", "Agreement Group", Value::Text(group)))
    }

    pub fn effective(self, date: &'static str) -> Self {
        self.fact_from(|catalog| catalog.scalar("Effective Date", "Effective Date", Value::Date(date)))
    }

    pub fn amended(self, date: &'static str) -> Self {
        self.fact_from(|catalog| catalog.scalar("Amendment Date", "Amendment Date", Value::Date(date)))
    }

    pub fn closing(self, date: &'static str) -> Self {
        self.fact_from(|catalog| catalog.scalar("Closing Date", "Closing Date", Value::Date(date)))
    }

    pub fn purchase_price(self, price: Decimal) -> Self {
        self.fact_from(|catalog| catalog.scalar("Purchase Price", "Full Purchase Price", Value::Num(price)))
    }

    pub fn grantor(self, name: &'static str) -> Self {
        self.fact_from(|catalog| catalog.fact("Grantor", &[("Grantor Name", Value::Text(name))]))
    }

    pub fn parcel(self, county: &'static str, state: &'static str, acres: Decimal) -> Self {
        self.fact_from(|catalog| catalog.fact(
            "Property Description",
            &[
                ("County", Value::Text(county)),
                ("State", Value::Text(state)),
                ("Agreement Acres", Value::Num(acres)),
            ],
        ))
    }

    pub fn term(self, ordinal: Decimal, term_type: &'static str, years: Decimal) -> Self {
        self.fact_from(|catalog| catalog.fact(
            "Agreement Term",
            &[
                ("Term Ordinal", Value::Num(ordinal)),
                ("Term Type", Value::Text(term_type)),
                ("Term Length (Years)", Value::Num(years)),
            ],
        ))
    }

    pub fn flat_model(self, name: &'static str, frequency: &'static str, amount: Decimal) -> Self {
        self.fact_from(|catalog| catalog.fact(
            "Term Payment Model",
            &[
                ("Model Name", Value::Text(name)),
                ("Payment Frequency", Value::Text(frequency)),
                ("Flat Payment Amount", Value::Num(amount)),
            ],
        ))
    }

    pub fn one_time(self, description: &'static str, amount: Decimal, date: &'static str) -> Self {
        self.fact_from(|catalog| catalog.fact(
            "Date Payment Model",
            &[
                ("Payment Description", Value::Text(description)),
                ("Payment Amount", Value::Num(amount)),
                ("Payment Date", Value::Date(date)),
            ],
        ))
    }

    pub fn tagged(mut self, tag: &str) -> Self {
        self.raw.tag_ids.push(self.catalog.tag(tag));
        self
    }

    fn fact_from(self, make: impl FnOnce(&Catalog) -> RawFact) -> Self {
        let fact = make(self.catalog);
        self.with(fact)
    }

    pub fn with(mut self, fact: RawFact) -> Self {
        self.raw.facts.push(fact);
        self
    }

    pub fn build(self) -> RawDocument {
        self.raw
    }
}
