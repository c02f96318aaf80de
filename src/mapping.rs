//! Member-to-element mapping between entities and persisted documents.
//!
//! A [`ClassMap`] starts as the one-to-one mapping of an entity's members,
//! then omits or renames members. It is the only place renaming happens:
//! documents, filters and sort orders all pass through it on their way to
//! the store.
//!
//! Class maps are registered once per process in a [`ClassMapRegistry`].
//! Re-registering an identical map is harmless; registering a different map
//! for an entity that already has one is a [`MappingError::Conflict`].
//!
//! ```rust
//! use employee_crud::{employee::Employee, mapping};
//!
//! let registry = mapping::ClassMapRegistry::new();
//! let class_map = mapping::ClassMap::builder::<Employee>()
//!     .unmap_member("Name")
//!     .map_member("MonthlyIncome", "Income")
//!     .build()
//!     .unwrap();
//! assert_eq!(class_map.element_name("MonthlyIncome"), Some("Income"));
//! assert_eq!(class_map.element_name("Name"), None);
//!
//! assert_eq!(
//!     registry.register(class_map.clone()),
//!     Ok(mapping::Registration::Registered)
//! );
//! assert_eq!(
//!     registry.register(class_map),
//!     Ok(mapping::Registration::AlreadyRegistered)
//! );
//! ```

use crate::{
    common::{self, condition, sort},
    entity::Entity,
    error::Result,
};

use indexmap::IndexMap;
use serde_json::Value;
use std::{any, collections, sync};

/// Ways a class map can be misconfigured or misapplied.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MappingError {
    /// A different class map is already registered for the entity.
    #[error("a different class map is already registered for {entity}")]
    Conflict {
        /// The entity type.
        entity: &'static str,
    },
    /// The member is not one of the entity's members.
    #[error("{entity} has no member {member:?}")]
    UnknownMember {
        /// The entity type.
        entity: &'static str,
        /// The offending member.
        member: String,
    },
    /// The identifier member cannot be omitted or renamed.
    #[error("the identifier member {member:?} of {entity} is always persisted as _id")]
    IdentifierMember {
        /// The entity type.
        entity: &'static str,
        /// The identifier member.
        member: String,
    },
    /// Two members would be persisted under the same element.
    #[error("more than one member of {entity} is persisted as {element:?}")]
    DuplicateElement {
        /// The entity type.
        entity: &'static str,
        /// The shared element name.
        element: String,
    },
    /// The member is omitted from documents, so it cannot be queried.
    #[error("member {member:?} of {entity} is not persisted")]
    UnmappedMember {
        /// The entity type.
        entity: &'static str,
        /// The omitted member.
        member: String,
    },
    /// A stored document holds an element no member claims.
    #[error("document element {element:?} does not map to any member of {entity}")]
    UnexpectedElement {
        /// The entity type.
        entity: &'static str,
        /// The unclaimed element.
        element: String,
    },
    /// The entity did not serialize to a map of members.
    #[error("{entity} does not serialize to a document")]
    NotADocument {
        /// The entity type.
        entity: &'static str,
    },
}

/// How an entity's members are persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassMap {
    entity: &'static str,
    type_id: any::TypeId,
    id_member: &'static str,
    /// member name -> element name, `None` when omitted
    members: IndexMap<String, Option<String>>,
}

impl ClassMap {
    /// The default mapping: every member under its own name, the identifier under `_id`.
    pub fn auto_map<E: Entity>() -> Self {
        let mut members: IndexMap<String, Option<String>> = E::MEMBERS
            .iter()
            .map(|member| (member.to_string(), Some(member.to_string())))
            .collect();
        members.insert(
            E::ID_MEMBER.to_string(),
            Some(common::ID_ELEMENT.to_string()),
        );
        Self {
            entity: any::type_name::<E>(),
            type_id: any::TypeId::of::<E>(),
            id_member: E::ID_MEMBER,
            members,
        }
    }

    /// Customise the default mapping of `E`.
    pub fn builder<E: Entity>() -> ClassMapBuilder {
        ClassMapBuilder {
            class_map: Self::auto_map::<E>(),
            error: None,
        }
    }

    /// The element a member is persisted as, or `None` when it is omitted or unknown.
    pub fn element_name(&self, member: &str) -> Option<&str> {
        self.members.get(member)?.as_deref()
    }

    /// The member persisted as `element`.
    pub fn member_name(&self, element: &str) -> Option<&str> {
        self.mapped_members()
            .find(|(_, mapped)| *mapped == element)
            .map(|(member, _)| member)
    }

    /// `(member, element)` pairs that are persisted, in declaration order.
    pub fn mapped_members(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members
            .iter()
            .filter_map(|(member, element)| Some((member.as_str(), element.as_deref()?)))
    }

    /// Members left out of documents.
    pub fn unmapped_members(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|(_, element)| element.is_none())
            .map(|(member, _)| member.as_str())
    }

    fn queryable_element(&self, member: String) -> Result<String, MappingError> {
        match self.members.get(&member) {
            Some(Some(element)) => Ok(element.clone()),
            Some(None) => Err(MappingError::UnmappedMember {
                entity: self.entity,
                member,
            }),
            None => Err(MappingError::UnknownMember {
                entity: self.entity,
                member,
            }),
        }
    }

    /// Rewrite a filter over members into a filter over persisted elements.
    pub fn translate_filter<T>(
        &self,
        filter: condition::Filter<T>,
    ) -> Result<condition::Filter<T>, MappingError> {
        filter.map_fields(&mut |member| self.queryable_element(member))
    }

    /// Rewrite a sort order over a member into one over its persisted element.
    pub fn translate_sort(&self, sort_by: sort::SortBy) -> Result<sort::SortBy, MappingError> {
        Ok(sort::SortBy {
            direction: sort_by.direction,
            field: self.queryable_element(sort_by.field)?,
        })
    }

    fn check_entity<E: Entity>(&self) {
        debug_assert_eq!(
            self.type_id,
            any::TypeId::of::<E>(),
            "class map for {} applied to {}",
            self.entity,
            any::type_name::<E>()
        );
    }

    /// Serialize an entity and apply the mapping.
    pub fn to_document<E: Entity>(&self, entity: &E) -> Result<common::Document> {
        self.check_entity::<E>();
        let Value::Object(mut members) = serde_json::to_value(entity)? else {
            return Err(MappingError::NotADocument {
                entity: self.entity,
            }
            .into());
        };
        let mut document = common::Document::with_capacity(members.len());
        for (member, element) in &self.members {
            let Some(value) = members.remove(member) else {
                continue;
            };
            let Some(element) = element else {
                continue;
            };
            if member == self.id_member && value.is_null() {
                continue;
            }
            document.insert(element.clone(), value);
        }
        if let Some(member) = members.keys().next() {
            return Err(MappingError::UnknownMember {
                entity: self.entity,
                member: member.clone(),
            }
            .into());
        }
        Ok(document)
    }

    /// Undo the mapping and deserialize the entity. Omitted members take their serde defaults.
    pub fn from_document<E: Entity>(&self, mut document: common::Document) -> Result<E> {
        self.check_entity::<E>();
        let mut members = serde_json::Map::with_capacity(self.members.len());
        for (member, element) in self.mapped_members() {
            if let Some(value) = document.remove(element) {
                members.insert(member.to_string(), value);
            }
        }
        if let Some(element) = document.keys().next() {
            return Err(MappingError::UnexpectedElement {
                entity: self.entity,
                element: element.clone(),
            }
            .into());
        }
        let entity = serde_json::from_value(Value::Object(members))?;
        Ok(entity)
    }
}

/// Builder returned by [`ClassMap::builder`].
#[derive(Debug)]
pub struct ClassMapBuilder {
    class_map: ClassMap,
    error: Option<MappingError>,
}

impl ClassMapBuilder {
    fn member_entry(&mut self, member: &str) -> Option<&mut Option<String>> {
        if self.error.is_some() {
            return None;
        }
        let entity = self.class_map.entity;
        if member == self.class_map.id_member {
            self.error = Some(MappingError::IdentifierMember {
                entity,
                member: member.to_string(),
            });
            return None;
        }
        if !self.class_map.members.contains_key(member) {
            self.error = Some(MappingError::UnknownMember {
                entity,
                member: member.to_string(),
            });
            return None;
        }
        self.class_map.members.get_mut(member)
    }

    /// Leave `member` out of persisted documents.
    pub fn unmap_member(mut self, member: &str) -> Self {
        if let Some(entry) = self.member_entry(member) {
            *entry = None;
        }
        self
    }

    /// Persist `member` under `element`.
    pub fn map_member(mut self, member: &str, element: &str) -> Self {
        if let Some(entry) = self.member_entry(member) {
            *entry = Some(element.to_string());
        }
        self
    }

    /// Validate and freeze the mapping.
    pub fn build(self) -> Result<ClassMap, MappingError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut seen = collections::HashSet::new();
        for (_, element) in self.class_map.mapped_members() {
            if !seen.insert(element) {
                return Err(MappingError::DuplicateElement {
                    entity: self.class_map.entity,
                    element: element.to_string(),
                });
            }
        }
        Ok(self.class_map)
    }
}

/// Outcome of [`ClassMapRegistry::register`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Registration {
    /// The map is now active.
    Registered,
    /// The same map was already active; nothing changed.
    AlreadyRegistered,
}

/// Class maps by entity type. Entries never change once inserted.
#[derive(Debug, Default)]
pub struct ClassMapRegistry {
    maps: sync::RwLock<collections::HashMap<any::TypeId, sync::Arc<ClassMap>>>,
}

impl ClassMapRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `E` already has a class map, registered or auto-mapped.
    pub fn is_registered<E: Entity>(&self) -> bool {
        self.maps
            .read()
            .unwrap_or_else(sync::PoisonError::into_inner)
            .contains_key(&any::TypeId::of::<E>())
    }

    /// Activate a class map for its entity.
    pub fn register(&self, class_map: ClassMap) -> Result<Registration, MappingError> {
        let mut maps = self
            .maps
            .write()
            .unwrap_or_else(sync::PoisonError::into_inner);
        match maps.get(&class_map.type_id) {
            Some(existing) if **existing == class_map => Ok(Registration::AlreadyRegistered),
            Some(_) => Err(MappingError::Conflict {
                entity: class_map.entity,
            }),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    entity = class_map.entity,
                    unmapped = ?class_map.unmapped_members().collect::<Vec<_>>(),
                    "registered class map"
                );
                maps.insert(class_map.type_id, sync::Arc::new(class_map));
                Ok(Registration::Registered)
            }
        }
    }

    /// The active class map of `E`, freezing the default mapping if none was registered.
    pub fn lookup<E: Entity>(&self) -> sync::Arc<ClassMap> {
        let type_id = any::TypeId::of::<E>();
        if let Some(class_map) = self
            .maps
            .read()
            .unwrap_or_else(sync::PoisonError::into_inner)
            .get(&type_id)
        {
            return class_map.clone();
        }
        self.maps
            .write()
            .unwrap_or_else(sync::PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| sync::Arc::new(ClassMap::auto_map::<E>()))
            .clone()
    }
}

/// The process-wide registry.
pub fn class_maps() -> &'static ClassMapRegistry {
    static REGISTRY: sync::OnceLock<ClassMapRegistry> = sync::OnceLock::new();
    REGISTRY.get_or_init(ClassMapRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::key;

    use rstest::rstest;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Badge {
        id: Option<key::DocumentId>,
        #[serde(default)]
        holder: String,
        level: u8,
        room: String,
    }

    impl Entity for Badge {
        const MEMBERS: &'static [&'static str] = &["Id", "Holder", "Level", "Room"];

        fn id(&self) -> Option<&key::DocumentId> {
            self.id.as_ref()
        }

        fn set_id(&mut self, id: key::DocumentId) {
            self.id = Some(id);
        }
    }

    fn badge_map() -> ClassMap {
        ClassMap::builder::<Badge>()
            .unmap_member("Holder")
            .map_member("Level", "Clearance")
            .build()
            .unwrap()
    }

    #[test]
    fn test_auto_map_is_one_to_one_except_identifier() {
        let class_map = ClassMap::auto_map::<Badge>();
        let mapped: Vec<_> = class_map.mapped_members().collect();
        assert_eq!(
            mapped,
            vec![
                ("Id", "_id"),
                ("Holder", "Holder"),
                ("Level", "Level"),
                ("Room", "Room"),
            ]
        );
        assert_eq!(class_map.unmapped_members().count(), 0);
    }

    #[test]
    fn test_builder_unmaps_and_renames() {
        let class_map = badge_map();
        assert_eq!(class_map.element_name("Holder"), None);
        assert_eq!(class_map.element_name("Level"), Some("Clearance"));
        assert_eq!(class_map.element_name("Room"), Some("Room"));
        assert_eq!(class_map.member_name("Clearance"), Some("Level"));
        assert_eq!(class_map.member_name("_id"), Some("Id"));
        assert_eq!(
            class_map.unmapped_members().collect::<Vec<_>>(),
            vec!["Holder"]
        );
    }

    #[rstest]
    #[case::unknown_member(
        ClassMap::builder::<Badge>().unmap_member("Nickname"),
        MappingError::UnknownMember {
            entity: any::type_name::<Badge>(),
            member: "Nickname".to_string(),
        }
    )]
    #[case::unmap_identifier(
        ClassMap::builder::<Badge>().unmap_member("Id"),
        MappingError::IdentifierMember {
            entity: any::type_name::<Badge>(),
            member: "Id".to_string(),
        }
    )]
    #[case::rename_identifier(
        ClassMap::builder::<Badge>().map_member("Id", "BadgeId"),
        MappingError::IdentifierMember {
            entity: any::type_name::<Badge>(),
            member: "Id".to_string(),
        }
    )]
    #[case::duplicate_element(
        ClassMap::builder::<Badge>().map_member("Level", "Room"),
        MappingError::DuplicateElement {
            entity: any::type_name::<Badge>(),
            element: "Room".to_string(),
        }
    )]
    #[case::first_error_wins(
        ClassMap::builder::<Badge>()
            .unmap_member("Nickname")
            .unmap_member("Id"),
        MappingError::UnknownMember {
            entity: any::type_name::<Badge>(),
            member: "Nickname".to_string(),
        }
    )]
    fn test_builder_rejects(#[case] builder: ClassMapBuilder, #[case] expected: MappingError) {
        assert_eq!(builder.build(), Err(expected));
    }

    #[test]
    fn test_to_document_applies_mapping() {
        let badge = Badge {
            id: Some(key::DocumentId::from("b-1")),
            holder: "Peter".to_string(),
            level: 3,
            room: "A4".to_string(),
        };
        let document = badge_map().to_document(&badge).unwrap();
        assert_eq!(
            serde_json::Value::Object(document),
            json!({"_id": "b-1", "Clearance": 3, "Room": "A4"})
        );
    }

    #[test]
    fn test_to_document_skips_unassigned_identifier() {
        let badge = Badge {
            level: 1,
            room: "B2".to_string(),
            ..Default::default()
        };
        let document = badge_map().to_document(&badge).unwrap();
        assert_eq!(
            serde_json::Value::Object(document),
            json!({"Clearance": 1, "Room": "B2"})
        );
    }

    #[test]
    fn test_from_document_reverses_mapping() {
        let serde_json::Value::Object(document) =
            json!({"_id": "b-2", "Clearance": 5, "Room": "C1"})
        else {
            unreachable!()
        };
        let badge: Badge = badge_map().from_document(document).unwrap();
        assert_eq!(
            badge,
            Badge {
                id: Some(key::DocumentId::from("b-2")),
                holder: String::new(),
                level: 5,
                room: "C1".to_string(),
            }
        );
    }

    #[test]
    fn test_from_document_rejects_unclaimed_element() {
        let serde_json::Value::Object(document) =
            json!({"_id": "b-3", "Level": 5, "Room": "C1"})
        else {
            unreachable!()
        };
        let error = badge_map().from_document::<Badge>(document).unwrap_err();
        assert!(matches!(
            error,
            crate::Error::Mapping(MappingError::UnexpectedElement { ref element, .. }) if element == "Level"
        ));
    }

    #[rstest]
    #[case::renamed("Level", Ok("Clearance".to_string()))]
    #[case::unchanged("Room", Ok("Room".to_string()))]
    #[case::identifier("Id", Ok("_id".to_string()))]
    #[case::omitted(
        "Holder",
        Err(MappingError::UnmappedMember {
            entity: any::type_name::<Badge>(),
            member: "Holder".to_string(),
        })
    )]
    #[case::unknown(
        "Clearance",
        Err(MappingError::UnknownMember {
            entity: any::type_name::<Badge>(),
            member: "Clearance".to_string(),
        })
    )]
    fn test_translate_sort(#[case] member: &str, #[case] expected: Result<String, MappingError>) {
        let actual = badge_map()
            .translate_sort(sort::SortBy::ascending(member))
            .map(|sort_by| sort_by.field);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_translate_filter() {
        let filter = condition::Filter::Leaves(
            condition::LogicalOperator::And,
            vec![
                condition::FieldCondition::new("Level", condition::Condition::GreaterThan(2)),
                condition::FieldCondition::new("Room", condition::Condition::NotNull),
            ],
        );
        let translated = badge_map().translate_filter(filter).unwrap();
        assert_eq!(
            translated,
            condition::Filter::Leaves(
                condition::LogicalOperator::And,
                vec![
                    condition::FieldCondition::new(
                        "Clearance",
                        condition::Condition::GreaterThan(2)
                    ),
                    condition::FieldCondition::new("Room", condition::Condition::NotNull),
                ],
            )
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = ClassMapRegistry::new();
        assert!(!registry.is_registered::<Badge>());
        assert_eq!(registry.register(badge_map()), Ok(Registration::Registered));
        assert_eq!(
            registry.register(badge_map()),
            Ok(Registration::AlreadyRegistered)
        );
        assert!(registry.is_registered::<Badge>());
        assert_eq!(*registry.lookup::<Badge>(), badge_map());
    }

    #[test]
    fn test_register_rejects_conflicting_map() {
        let registry = ClassMapRegistry::new();
        registry.register(badge_map()).unwrap();
        assert_eq!(
            registry.register(ClassMap::auto_map::<Badge>()),
            Err(MappingError::Conflict {
                entity: any::type_name::<Badge>(),
            })
        );
        assert_eq!(*registry.lookup::<Badge>(), badge_map());
    }

    #[test]
    fn test_lookup_freezes_auto_map() {
        let registry = ClassMapRegistry::new();
        assert_eq!(*registry.lookup::<Badge>(), ClassMap::auto_map::<Badge>());
        assert!(registry.is_registered::<Badge>());
        assert_eq!(
            registry.register(badge_map()),
            Err(MappingError::Conflict {
                entity: any::type_name::<Badge>(),
            })
        );
    }
}
