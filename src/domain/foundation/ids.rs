//! Strongly-typed identifier value objects.
//!
//! Every upstream record is keyed by a UUID; wrapping each kind in its own
//! newtype keeps a fact type id from being passed where a field type id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(
    /// Unique identifier for an upstream document.
    DocumentId
);
define_id!(
    /// Unique identifier for a single fact instance on a document.
    FactId
);
define_id!(
    /// Unique identifier for a fact type definition.
    FactTypeId
);
define_id!(
    /// Unique identifier for a field type within a fact type.
    FieldTypeId
);
define_id!(
    /// Unique identifier for a document type definition.
    DocumentTypeId
);
define_id!(
    /// Unique identifier for a tag definition.
    TagId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_generates_unique_values() {
        let id1 = DocumentId::new();
        let id2 = DocumentId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn fact_type_id_parses_from_string() {
        let uuid_str = "7601840f-8d47-4c0b-a2a1-2ad2a692bfb8";
        let id = FactTypeId::from_str(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn field_type_id_rejects_invalid_string() {
        assert!(FieldTypeId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn tag_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let id = TagId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
