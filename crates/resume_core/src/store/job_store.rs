//! Job collection with cascading delete into job descriptions.
//!
//! # Invariants
//! - Deleting a job removes every description whose `job_id` matches,
//!   and no other description.
//! - The only delete entry point requires the description store, so the
//!   cascade cannot be skipped.

use crate::model::entity::EntityId;
use crate::model::resume::Job;
use crate::storage::kv::KeyValueStore;
use crate::store::collection::{CollectionStore, JobDescriptionStore};
use crate::store::collection_names;
use crate::store::StoreResult;
use log::info;
use std::ops::Deref;

/// Persisted jobs; read access derefs to the generic store.
pub struct JobStore<'s> {
    inner: CollectionStore<'s, Job>,
}

impl<'s> JobStore<'s> {
    pub fn open(storage: &'s dyn KeyValueStore) -> Self {
        Self {
            inner: CollectionStore::open(storage, collection_names::JOBS),
        }
    }

    pub fn load_items(&mut self) {
        self.inner.load_items();
    }

    pub fn add_item(&mut self, job: Job) -> StoreResult<()> {
        self.inner.add_item(job)
    }

    pub fn update_item(&mut self, job: Job) -> StoreResult<bool> {
        self.inner.update_item(job)
    }

    pub fn set_included(&mut self, id: &str, included: bool) -> StoreResult<bool> {
        self.inner.set_included(id, included)
    }

    pub fn create_id(&self) -> EntityId {
        self.inner.create_id()
    }

    /// Deletes one job and all of its descriptions.
    ///
    /// Both collections are persisted even when `id` matched nothing.
    /// Returns the number of descriptions removed.
    pub fn delete_item(
        &mut self,
        id: &str,
        descriptions: &mut JobDescriptionStore<'_>,
    ) -> StoreResult<usize> {
        self.inner.delete_item(id)?;
        let removed = descriptions.delete_where(|description| description.job_id == id)?;
        info!(
            "event=job_delete module=store status=ok job_id={} descriptions_removed={}",
            id, removed
        );
        Ok(removed)
    }
}

impl<'s> Deref for JobStore<'s> {
    type Target = CollectionStore<'s, Job>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
