//! Persisted collection stores.
//!
//! # Responsibility
//! - Provide one generic id-keyed store for every entity kind.
//! - Layer kind-specific contracts (tags, persons, job cascade) on top.
//! - Own the application-scoped `StoreRegistry`.
//!
//! # Invariants
//! - Every successful mutation is flushed to durable storage before return.
//! - Loading never fails; unreadable collections reset to empty.

use crate::storage::codec::CodecError;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
pub mod job_store;
pub mod person_registry;
pub mod registry;
pub mod tag_registry;

/// Durable key for each collection.
pub mod collection_names {
    pub const USERS: &str = "users";
    pub const JOBS: &str = "jobs";
    pub const JOB_DESCRIPTIONS: &str = "jobDescriptions";
    pub const SKILL_NAMES: &str = "skillNames";
    pub const SKILL_TYPES: &str = "skillTypes";
    pub const EDUCATION: &str = "education";
    pub const CERTIFICATIONS: &str = "certifications";
    pub const VOLUNTEERS: &str = "volunteers";
    pub const PROJECTS: &str = "projects";
    pub const SUMMARIES: &str = "professionalSummaries";
    pub const TAGS: &str = "tags";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store mutations.
#[derive(Debug)]
pub enum StoreError {
    /// Durable write failed.
    Storage(StorageError),
    /// Records could not be encoded.
    Codec(CodecError),
    /// A record with this id already exists in the collection.
    DuplicateId {
        collection: &'static str,
        id: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::DuplicateId { collection, id } => {
                write!(f, "duplicate id `{id}` in collection `{collection}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::DuplicateId { .. } => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}
