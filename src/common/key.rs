use crate::common;

use aws_sdk_dynamodb::types;
use serde::{Deserialize, Serialize};
use std::{collections, fmt};

/// Opaque identifier of a persisted document.
///
/// Assigned once, on first insert, and never changed afterwards.
///
/// ```rust
/// use employee_crud::common::key;
///
/// let id = key::DocumentId::generate();
/// assert_eq!(id, key::DocumentId::from(id.as_str()));
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The identifier as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary key of a document: its identifier under the `_id` element.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DocumentKey {
    /// The identifier to address.
    pub id: DocumentId,
}

impl From<DocumentId> for DocumentKey {
    fn from(id: DocumentId) -> Self {
        Self { id }
    }
}

impl From<DocumentKey> for collections::HashMap<String, types::AttributeValue> {
    fn from(key: DocumentKey) -> Self {
        Self::from([(
            common::ID_ELEMENT.to_string(),
            types::AttributeValue::S(key.id.0),
        )])
    }
}
