//! Domain model for reconciled resume records.
//!
//! # Responsibility
//! - Define the shared base shape and every persisted entity kind.
//! - Own wire naming (camelCase) and date/timestamp representations.
//!
//! # Invariants
//! - Every record carries a `BaseEntity` with a stable, immutable id.
//! - Natural keys are not part of the model; they live in `reconcile`.

pub mod dates;
pub mod entity;
pub mod resume;
pub mod tag;
