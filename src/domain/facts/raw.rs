//! Upstream shapes: documents with their raw facts, and the reference
//! definitions (fact types, document types, tags) that give those facts names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DocumentId, DocumentTypeId, FactId, FactTypeId, FieldTypeId, TagId,
};

/// Data type of a fact field as declared by its field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Number,
    Date,
    String,
    SelectList,
    Boolean,
    /// Any type this crate does not read.
    #[serde(other)]
    Unknown,
}

/// A field definition within a fact type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldType {
    pub id: FieldTypeId,
    pub name: String,
    pub data_type: DataType,
}

/// A fact type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactType {
    pub id: FactTypeId,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default, rename = "fieldTypes", alias = "fields")]
    pub fields: Vec<FieldType>,
}

/// A document type definition (`Lease`, `Deed`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeDef {
    pub id: DocumentTypeId,
    pub name: String,
}

/// A tag definition (`Terminated`, `Purchased`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDef {
    pub id: TagId,
    pub name: String,
}

/// One field value on a raw fact. Exactly one of the value slots is
/// expected to be populated, matching the field's data type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub fact_field_type_id: FieldTypeId,
    #[serde(default)]
    pub data_type: Option<DataType>,
    #[serde(default)]
    pub number_value: Option<Decimal>,
    #[serde(default)]
    pub date_value: Option<String>,
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub boolean_value: Option<bool>,
}

/// A fact instance attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFact {
    pub id: FactId,
    pub fact_type_id: FactTypeId,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// A document as returned by the upstream search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub id: DocumentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub document_type_id: Option<DocumentTypeId>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub facts: Vec<RawFact>,
}
