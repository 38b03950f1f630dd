//! Tag registry: name-keyed tag records with resolve-or-create semantics.
//!
//! # Invariants
//! - `resolve_or_create` never creates a second tag with an existing name
//!   (case-sensitive exact match).
//! - `search` matches case-insensitive substrings, not just prefixes.

use crate::model::entity::{BaseEntity, EntityId};
use crate::model::tag::TagEntity;
use crate::storage::kv::KeyValueStore;
use crate::store::collection::CollectionStore;
use crate::store::collection_names;
use crate::store::StoreResult;
use log::debug;
use std::ops::{Deref, DerefMut};

pub struct TagRegistry<'s> {
    inner: CollectionStore<'s, TagEntity>,
}

impl<'s> TagRegistry<'s> {
    pub fn open(storage: &'s dyn KeyValueStore) -> Self {
        Self {
            inner: CollectionStore::open(storage, collection_names::TAGS),
        }
    }

    /// Returns the id of the tag named `tag_name`, creating it when absent.
    pub fn resolve_or_create(&mut self, tag_name: &str) -> StoreResult<EntityId> {
        if let Some(existing) = self.inner.find(|tag| tag.tag_name == tag_name) {
            return Ok(existing.base.id.clone());
        }

        let id = self.inner.create_id();
        self.inner
            .add_item(TagEntity::new(BaseEntity::new(id.clone(), false), tag_name))?;
        debug!("event=tag_create module=store status=ok tag_id={id}");
        Ok(id)
    }

    /// Resolves every name in order; repeated names collapse to one id.
    pub fn resolve_all<S: AsRef<str>>(&mut self, tag_names: &[S]) -> StoreResult<Vec<EntityId>> {
        let mut ids: Vec<EntityId> = Vec::with_capacity(tag_names.len());
        for name in tag_names {
            let id = self.resolve_or_create(name.as_ref())?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Tag names containing `query`, compared in lowercase.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.inner
            .items()
            .iter()
            .filter(|tag| tag.tag_name.to_lowercase().contains(&needle))
            .map(|tag| tag.tag_name.clone())
            .collect()
    }

    /// Names for `ids` in the given order; unknown ids are skipped.
    pub fn names_for(&self, ids: &[EntityId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.inner.get(id))
            .map(|tag| tag.tag_name.clone())
            .collect()
    }
}

impl<'s> Deref for TagRegistry<'s> {
    type Target = CollectionStore<'s, TagEntity>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for TagRegistry<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
