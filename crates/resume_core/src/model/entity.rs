//! Base shape shared by every persisted record.
//!
//! # Invariants
//! - `id` is assigned once and never reused within a collection.
//! - `tags` holds bare tag ids in insertion order without duplicates.
//! - `create_date` is kept at millisecond precision.

use crate::model::dates;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier (UUID v4 text).
pub type EntityId = String;

/// Allocates a new random identifier, independent across collections.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Fields every record carries regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntity {
    pub id: EntityId,
    #[serde(with = "dates::timestamp", default = "dates::now")]
    pub create_date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<EntityId>,
    /// Marks the record as selected for an output document.
    #[serde(default)]
    pub included: bool,
}

impl BaseEntity {
    /// Creates a base with the current timestamp and no tags.
    pub fn new(id: impl Into<EntityId>, included: bool) -> Self {
        Self {
            id: id.into(),
            create_date: dates::now(),
            tags: Vec::new(),
            included,
        }
    }
}

/// Contract for anything a `CollectionStore` can hold.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    fn base(&self) -> &BaseEntity;
    fn base_mut(&mut self) -> &mut BaseEntity;

    fn id(&self) -> &str {
        &self.base().id
    }
}

macro_rules! impl_entity {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::model::entity::Entity for $kind {
                fn base(&self) -> &$crate::model::entity::BaseEntity {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut $crate::model::entity::BaseEntity {
                    &mut self.base
                }
            }
        )+
    };
}

pub(crate) use impl_entity;
