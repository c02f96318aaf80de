//! The contract a type fulfils to be stored in a [`Collection`](crate::collection::Collection).

use crate::common::key;

use serde::{Serialize, de::DeserializeOwned};

/// An in-memory record persisted as one document.
///
/// Member names are the names serde produces for the type's fields. They are
/// the names filters and sort orders refer to; the type's
/// [`ClassMap`](crate::mapping::ClassMap) decides what they become once persisted.
///
/// The identifier member must serialize as `null` until an identifier is
/// assigned, which an `Option<DocumentId>` does.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Every member, in declaration order, including the identifier.
    const MEMBERS: &'static [&'static str];

    /// The member holding the identifier; always persisted as `_id`.
    const ID_MEMBER: &'static str = "Id";

    /// The identifier, once assigned.
    fn id(&self) -> Option<&key::DocumentId>;

    /// Record the identifier assigned on insert.
    fn set_id(&mut self, id: key::DocumentId);
}
