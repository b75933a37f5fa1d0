//! Read-only reference lookups shared by every document in a run.

use serde::{Deserialize, Serialize};

use super::raw::{DocumentTypeDef, FactType, FieldType, TagDef};
use crate::domain::foundation::{DocumentTypeId, FactTypeId, FieldTypeId, TagId};

/// Fact type, document type, and tag definitions fetched once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    pub fact_types: Vec<FactType>,
    pub document_types: Vec<DocumentTypeDef>,
    pub tags: Vec<TagDef>,
}

fn names_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl ReferenceData {
    pub fn new(
        fact_types: Vec<FactType>,
        document_types: Vec<DocumentTypeDef>,
        tags: Vec<TagDef>,
    ) -> Self {
        Self {
            fact_types,
            document_types,
            tags,
        }
    }

    /// Resolves a fact type name to its id. Active fact types win over
    /// archived ones carrying the same name.
    pub fn get_fact_type_id(&self, name: &str) -> Option<FactTypeId> {
        self.fact_types
            .iter()
            .filter(|ft| names_match(&ft.name, name))
            .min_by_key(|ft| ft.archived)
            .map(|ft| ft.id)
    }

    /// Resolves a field name within a fact type to the field type id.
    pub fn get_fact_field_id(&self, fact_type_id: FactTypeId, field_name: &str) -> Option<FieldTypeId> {
        self.fact_type(fact_type_id)?
            .fields
            .iter()
            .find(|f| names_match(&f.name, field_name))
            .map(|f| f.id)
    }

    /// Returns the fact type definition for an id.
    pub fn fact_type(&self, id: FactTypeId) -> Option<&FactType> {
        self.fact_types.iter().find(|ft| ft.id == id)
    }

    /// Returns the field type definition for a field within a fact type.
    pub fn field_type(&self, fact_type_id: FactTypeId, field_id: FieldTypeId) -> Option<&FieldType> {
        self.fact_type(fact_type_id)?
            .fields
            .iter()
            .find(|f| f.id == field_id)
    }

    /// Returns the display name of a tag.
    pub fn get_tag_name(&self, id: TagId) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    /// Resolves a tag name to its id.
    pub fn get_tag_id(&self, name: &str) -> Option<TagId> {
        self.tags
            .iter()
            .find(|t| names_match(&t.name, name))
            .map(|t| t.id)
    }

    /// Returns the display name of a document type.
    pub fn get_document_type_name(&self, id: DocumentTypeId) -> Option<&str> {
        self.document_types
            .iter()
            .find(|dt| dt.id == id)
            .map(|dt| dt.name.as_str())
    }

    /// Field type ids of every non-archived fact type, the set the upstream
    /// search is asked to include.
    pub fn active_field_ids(&self) -> Vec<FieldTypeId> {
        self.fact_types
            .iter()
            .filter(|ft| !ft.archived)
            .flat_map(|ft| ft.fields.iter().map(|f| f.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::facts::raw::DataType;

    fn field(name: &str) -> FieldType {
        FieldType {
            id: FieldTypeId::new(),
            name: name.to_string(),
            data_type: DataType::Date,
        }
    }

    fn reference() -> ReferenceData {
        let active = FactType {
            id: FactTypeId::new(),
            name: "Effective Date".to_string(),
            archived: false,
            allow_multiple: false,
            fields: vec![field("Effective Date")],
        };
        let archived = FactType {
            id: FactTypeId::new(),
            name: "Effective Date".to_string(),
            archived: true,
            allow_multiple: false,
            fields: vec![field("Effective Date"), field("Notes")],
        };
        ReferenceData::new(
            vec![archived, active],
            vec![DocumentTypeDef {
                id: DocumentTypeId::new(),
                name: "Lease".to_string(),
            }],
            vec![TagDef {
                id: TagId::new(),
                name: "Terminated".to_string(),
            }],
        )
    }

    #[test]
    fn fact_type_lookup_prefers_active_definition() {
        let refs = reference();
        let id = refs.get_fact_type_id("effective date").unwrap();
        assert!(!refs.fact_type(id).unwrap().archived);
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let refs = reference();
        assert!(refs.get_fact_type_id("Rent Roll").is_none());
        let id = refs.get_fact_type_id("Effective Date").unwrap();
        assert!(refs.get_fact_field_id(id, "Missing Field").is_none());
        assert!(refs.get_tag_name(TagId::new()).is_none());
        assert!(refs.get_document_type_name(DocumentTypeId::new()).is_none());
    }

    #[test]
    fn tag_lookup_round_trips_by_name() {
        let refs = reference();
        let id = refs.get_tag_id("Terminated").unwrap();
        assert_eq!(refs.get_tag_name(id), Some("Terminated"));
    }

    #[test]
    fn active_field_ids_skip_archived_fact_types() {
        let refs = reference();
        assert_eq!(refs.active_field_ids().len(), 1);
    }
}
