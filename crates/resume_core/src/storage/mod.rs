//! Durable key-value storage and the collection codec on top of it.
//!
//! # Responsibility
//! - Open the SQLite vault file and bring its schema up to date.
//! - Abstract durable storage as string keys to string values.
//! - Translate whole collections to and from their canonical JSON text.
//!
//! # Invariants
//! - One key per collection; values are JSON arrays of records.
//! - Codec never panics on malformed input; callers decide how to recover.
//! - Every storage failure names the collection key or schema step involved.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod kv;
pub mod migrations;
mod vault;

pub use vault::{open_vault, open_vault_in_memory};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the durable backing store.
#[derive(Debug)]
pub enum StorageError {
    /// The vault file could not be opened or configured.
    Open(rusqlite::Error),
    /// The vault was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// A schema step failed; the whole upgrade was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// Reading the value stored for a collection key failed.
    Read {
        key: String,
        source: rusqlite::Error,
    },
    /// Writing the value for a collection key failed.
    Write {
        key: String,
        source: rusqlite::Error,
    },
    /// A non-SQLite backend refused the operation.
    Unavailable { key: String, reason: String },
}

impl StorageError {
    /// Collection key the failure relates to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Read { key, .. } | Self::Write { key, .. } | Self::Unavailable { key, .. } => {
                Some(key)
            }
            Self::Open(_) | Self::SchemaTooNew { .. } | Self::Migration { .. } => None,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open vault: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "vault schema version {found} is newer than supported {supported}"
            ),
            Self::Migration { version, source } => {
                write!(f, "vault schema step {version} failed: {source}")
            }
            Self::Read { key, source } => write!(f, "failed to read `{key}`: {source}"),
            Self::Write { key, source } => write!(f, "failed to write `{key}`: {source}"),
            Self::Unavailable { key, reason } => write!(f, "storage unavailable for `{key}`: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            Self::Migration { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. } => Some(source),
            Self::SchemaTooNew { .. } | Self::Unavailable { .. } => None,
        }
    }
}
