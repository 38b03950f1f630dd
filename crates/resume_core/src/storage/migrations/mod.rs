//! Vault schema steps and the upgrade runner.
//!
//! # Invariants
//! - Steps are listed in increasing version order.
//! - `PRAGMA user_version` holds the last applied step.
//! - An upgrade applies every pending step or none of them.

use super::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

/// Version and SQL for each schema step.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Highest schema version this build can read.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Stored schema version of an open vault.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(StorageError::Open)
}

/// Brings the vault schema up to `latest_version()`.
///
/// # Errors
/// - `SchemaTooNew` when the vault is ahead of this build; nothing is touched.
/// - `Migration` naming the failing step; earlier steps are rolled back.
pub fn upgrade_schema(conn: &mut Connection) -> StorageResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(StorageError::SchemaTooNew { found, supported });
    }

    let pending: Vec<(u32, &str)> = SCHEMA_STEPS
        .iter()
        .copied()
        .filter(|(version, _)| *version > found)
        .collect();
    let Some(&(target, _)) = pending.last() else {
        return Ok(());
    };

    let step_failed =
        |version: u32| move |source: rusqlite::Error| StorageError::Migration { version, source };
    let tx = conn.transaction().map_err(step_failed(target))?;
    for (version, sql) in pending {
        tx.execute_batch(sql).map_err(step_failed(version))?;
        tx.pragma_update(None, "user_version", version)
            .map_err(step_failed(version))?;
    }
    tx.commit().map_err(step_failed(target))?;

    info!(
        "event=schema_upgrade module=storage status=ok from_version={} to_version={}",
        found, target
    );
    Ok(())
}
