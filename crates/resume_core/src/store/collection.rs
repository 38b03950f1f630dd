//! Generic persisted collection store.
//!
//! # Responsibility
//! - Hold the in-memory records of one collection.
//! - Flush the whole collection through the codec on every mutation.
//!
//! # Invariants
//! - Ids are unique within the collection (`add_item` rejects duplicates).
//! - Natural keys are never enforced here; that is reconciliation's job.
//! - A failed flush leaves the in-memory change in place (no rollback).

use crate::model::entity::{new_entity_id, Entity, EntityId};
use crate::model::resume::{
    Certification, Education, JobDescription, ProfessionalSummary, Project, SkillName,
    SkillType, Volunteer,
};
use crate::storage::codec::{decode_collection, encode_collection};
use crate::storage::kv::KeyValueStore;
use crate::store::{StoreError, StoreResult};
use log::{debug, error, info, warn};

pub type JobDescriptionStore<'s> = CollectionStore<'s, JobDescription>;
pub type SkillNameStore<'s> = CollectionStore<'s, SkillName>;
pub type SkillTypeStore<'s> = CollectionStore<'s, SkillType>;
pub type EducationStore<'s> = CollectionStore<'s, Education>;
pub type CertificationStore<'s> = CollectionStore<'s, Certification>;
pub type VolunteerStore<'s> = CollectionStore<'s, Volunteer>;
pub type ProjectStore<'s> = CollectionStore<'s, Project>;
pub type SummaryStore<'s> = CollectionStore<'s, ProfessionalSummary>;

/// Id-keyed container for one entity kind, persisted under `name`.
pub struct CollectionStore<'s, T: Entity> {
    storage: &'s dyn KeyValueStore,
    name: &'static str,
    items: Vec<T>,
}

impl<'s, T: Entity> CollectionStore<'s, T> {
    /// Creates an empty, not yet loaded store.
    pub fn new(storage: &'s dyn KeyValueStore, name: &'static str) -> Self {
        Self {
            storage,
            name,
            items: Vec::new(),
        }
    }

    /// Creates a store and immediately loads its durable contents.
    pub fn open(storage: &'s dyn KeyValueStore, name: &'static str) -> Self {
        let mut store = Self::new(storage, name);
        store.load_items();
        store
    }

    /// Collection name, also used as the durable key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Replaces in-memory records with the durable value.
    ///
    /// Missing, unreadable or malformed data resets the collection to empty
    /// and is logged; single unreadable records are skipped and logged.
    /// This never returns an error.
    pub fn load_items(&mut self) {
        self.items = load_records(self.storage, self.name);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// First record satisfying `predicate`, in insertion order.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(*item))
    }

    /// Appends a record and persists the collection.
    pub fn add_item(&mut self, item: T) -> StoreResult<()> {
        if self.get(item.id()).is_some() {
            return Err(StoreError::DuplicateId {
                collection: self.name,
                id: item.id().to_string(),
            });
        }
        debug!(
            "event=item_add module=store status=start collection={} id={}",
            self.name,
            item.id()
        );
        self.items.push(item);
        self.save_to_storage()
    }

    /// Replaces the record with the same id.
    ///
    /// Returns `Ok(false)` without persisting when no record matches.
    pub fn update_item(&mut self, item: T) -> StoreResult<bool> {
        let Some(slot) = self.items.iter_mut().find(|existing| existing.id() == item.id()) else {
            debug!(
                "event=item_update module=store status=skipped collection={} id={} reason=not_found",
                self.name,
                item.id()
            );
            return Ok(false);
        };
        *slot = item;
        self.save_to_storage()?;
        Ok(true)
    }

    /// Removes the record with `id`; persists even when nothing matched.
    pub fn delete_item(&mut self, id: &str) -> StoreResult<()> {
        self.delete_where(|item| item.id() == id).map(|_| ())
    }

    /// Removes every record matching `predicate` and persists.
    ///
    /// Returns the number of removed records.
    pub fn delete_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> StoreResult<usize> {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        let removed = before - self.items.len();
        debug!(
            "event=item_delete module=store status=ok collection={} removed={}",
            self.name, removed
        );
        self.save_to_storage()?;
        Ok(removed)
    }

    /// Flips the `included` flag of one record.
    pub fn set_included(&mut self, id: &str, included: bool) -> StoreResult<bool> {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return Ok(false);
        };
        item.base_mut().included = included;
        self.save_to_storage()?;
        Ok(true)
    }

    /// Allocates a fresh identifier.
    pub fn create_id(&self) -> EntityId {
        new_entity_id()
    }

    /// Writes every record in canonical form under the collection name.
    pub fn save_to_storage(&self) -> StoreResult<()> {
        save_records(self.storage, self.name, &self.items)
    }
}

impl<'s> CollectionStore<'s, JobDescription> {
    /// Description lines owned by `job_id`, in insertion order.
    pub fn descriptions_for(&self, job_id: &str) -> Vec<&JobDescription> {
        self.items
            .iter()
            .filter(|description| description.job_id == job_id)
            .collect()
    }
}

pub(crate) fn load_records<T: Entity>(storage: &dyn KeyValueStore, name: &str) -> Vec<T> {
    let raw = match storage.get(name) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=collection_load module=store status=empty collection={name}");
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=collection_load module=store status=error collection={} error_code=storage_read_failed error={}",
                name, err
            );
            return Vec::new();
        }
    };

    match decode_collection::<T>(&raw) {
        Ok(decoded) => {
            for (index, err) in &decoded.rejected {
                warn!(
                    "event=collection_load module=store status=record_skipped collection={} index={} error_code=record_corrupt error={}",
                    name, index, err
                );
            }
            info!(
                "event=collection_load module=store status=ok collection={} count={} skipped={}",
                name,
                decoded.records.len(),
                decoded.rejected.len()
            );
            decoded.records
        }
        Err(err) => {
            warn!(
                "event=collection_load module=store status=reset collection={} error_code=storage_corrupt error={}",
                name, err
            );
            Vec::new()
        }
    }
}

pub(crate) fn save_records<T: Entity>(
    storage: &dyn KeyValueStore,
    name: &str,
    items: &[T],
) -> StoreResult<()> {
    let encoded = encode_collection(items)?;
    if let Err(err) = storage.set(name, &encoded) {
        error!(
            "event=collection_save module=store status=error collection={} error_code=storage_write_failed error={}",
            name, err
        );
        return Err(err.into());
    }
    debug!(
        "event=collection_save module=store status=ok collection={} count={}",
        name,
        items.len()
    );
    Ok(())
}
