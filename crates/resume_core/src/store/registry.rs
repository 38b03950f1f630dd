//! Application-scoped registry owning every collection store.
//!
//! # Responsibility
//! - Construct and load each store exactly once per storage handle.
//! - Be passed by reference to reconciliation and UI-facing callers.
//!
//! # Invariants
//! - All stores share one `KeyValueStore`; there is no global state.

use crate::storage::kv::KeyValueStore;
use crate::store::collection::{
    CertificationStore, CollectionStore, EducationStore, JobDescriptionStore, ProjectStore,
    SkillNameStore, SkillTypeStore, SummaryStore, VolunteerStore,
};
use crate::store::collection_names;
use crate::store::job_store::JobStore;
use crate::store::person_registry::PersonRegistry;
use crate::store::tag_registry::TagRegistry;
use crate::store::StoreResult;

pub struct StoreRegistry<'s> {
    pub persons: PersonRegistry<'s>,
    pub jobs: JobStore<'s>,
    pub job_descriptions: JobDescriptionStore<'s>,
    pub skill_names: SkillNameStore<'s>,
    pub skill_types: SkillTypeStore<'s>,
    pub education: EducationStore<'s>,
    pub certifications: CertificationStore<'s>,
    pub volunteers: VolunteerStore<'s>,
    pub projects: ProjectStore<'s>,
    pub summaries: SummaryStore<'s>,
    pub tags: TagRegistry<'s>,
}

/// Record count per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub persons: usize,
    pub jobs: usize,
    pub job_descriptions: usize,
    pub skill_names: usize,
    pub skill_types: usize,
    pub education: usize,
    pub certifications: usize,
    pub volunteers: usize,
    pub projects: usize,
    pub summaries: usize,
    pub tags: usize,
}

impl<'s> StoreRegistry<'s> {
    /// Builds every store over `storage` and loads its contents.
    pub fn open(storage: &'s dyn KeyValueStore) -> Self {
        Self {
            persons: PersonRegistry::open(storage),
            jobs: JobStore::open(storage),
            job_descriptions: CollectionStore::open(storage, collection_names::JOB_DESCRIPTIONS),
            skill_names: CollectionStore::open(storage, collection_names::SKILL_NAMES),
            skill_types: CollectionStore::open(storage, collection_names::SKILL_TYPES),
            education: CollectionStore::open(storage, collection_names::EDUCATION),
            certifications: CollectionStore::open(storage, collection_names::CERTIFICATIONS),
            volunteers: CollectionStore::open(storage, collection_names::VOLUNTEERS),
            projects: CollectionStore::open(storage, collection_names::PROJECTS),
            summaries: CollectionStore::open(storage, collection_names::SUMMARIES),
            tags: TagRegistry::open(storage),
        }
    }

    /// Reloads every store from durable storage.
    pub fn reload(&mut self) {
        self.persons.load_items();
        self.jobs.load_items();
        self.job_descriptions.load_items();
        self.skill_names.load_items();
        self.skill_types.load_items();
        self.education.load_items();
        self.certifications.load_items();
        self.volunteers.load_items();
        self.projects.load_items();
        self.summaries.load_items();
        self.tags.load_items();
    }

    /// Deletes a job together with its descriptions.
    pub fn delete_job(&mut self, id: &str) -> StoreResult<usize> {
        self.jobs.delete_item(id, &mut self.job_descriptions)
    }

    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            persons: self.persons.users().len(),
            jobs: self.jobs.len(),
            job_descriptions: self.job_descriptions.len(),
            skill_names: self.skill_names.len(),
            skill_types: self.skill_types.len(),
            education: self.education.len(),
            certifications: self.certifications.len(),
            volunteers: self.volunteers.len(),
            projects: self.projects.len(),
            summaries: self.summaries.len(),
            tags: self.tags.len(),
        }
    }
}
