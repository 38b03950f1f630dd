//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate extraction and reconciliation into caller-level APIs.
//! - Keep CLI/UI layers decoupled from store and extraction details.

pub mod import_service;
