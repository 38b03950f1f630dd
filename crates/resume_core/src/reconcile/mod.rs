//! Reconciliation of extracted facts into persisted collections.
//!
//! # Responsibility
//! - Match each extracted fact to existing records by natural key.
//! - Add only unmatched facts, cascading dependent records.
//!
//! # Invariants
//! - First-writer-wins: a matched record is never modified.
//! - Records added before a failure are kept; there is no rollback.

pub mod engine;
pub mod keys;
