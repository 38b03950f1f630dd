//! Core domain logic for the resume vault.
//! This crate is the single source of truth for record invariants and
//! reconciliation rules.

pub mod config;
pub mod extraction;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use extraction::json::JsonPayloadExtractor;
pub use extraction::payload::{ExtractedFact, ExtractionPayload, PayloadError};
pub use extraction::{DocumentExtractor, ExtractionError, SourceDocument};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::entity::{BaseEntity, Entity, EntityId};
pub use model::resume::{
    Certification, Education, Job, JobDescription, Person, ProfessionalSummary, Project,
    SkillName, SkillType, Volunteer,
};
pub use model::tag::TagEntity;
pub use reconcile::engine::{FactKind, ReconcileError, ReconcileReport, ReconciliationEngine};
pub use service::import_service::{DocumentImport, ImportFailure, ImportService, ImportSummary};
pub use storage::kv::{KeyValueStore, SqliteKeyValueStore};
pub use storage::{open_vault, open_vault_in_memory, StorageError, StorageResult};
pub use store::collection::CollectionStore;
pub use store::registry::{CollectionCounts, StoreRegistry};
pub use store::{StoreError, StoreResult};
