//! Tag record referenced by id from any other record's `tags`.

use crate::model::entity::{impl_entity, BaseEntity};
use serde::{Deserialize, Serialize};

/// Name-keyed label. Uniqueness of `tag_name` is maintained by
/// `TagRegistry::resolve_or_create`, not by the underlying store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntity {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub tag_name: String,
}

impl TagEntity {
    pub fn new(base: BaseEntity, tag_name: impl Into<String>) -> Self {
        Self {
            base,
            tag_name: tag_name.into(),
        }
    }
}

impl_entity!(TagEntity);
