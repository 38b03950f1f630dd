//! Opening the SQLite vault that backs every collection.
//!
//! # Invariants
//! - A returned connection has the `kv_entries` schema fully applied.

use super::migrations::upgrade_schema;
use super::{StorageError, StorageResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the vault file at `path`.
///
/// # Side effects
/// - Creates the file when it does not exist yet.
/// - Emits `vault_open` logging events with duration and status.
pub fn open_vault(path: impl AsRef<Path>) -> StorageResult<Connection> {
    let path = path.as_ref();
    open_logged("file", || Connection::open(path))
}

/// Opens a throwaway in-memory vault, mainly for tests.
pub fn open_vault_in_memory() -> StorageResult<Connection> {
    open_logged("memory", Connection::open_in_memory)
}

fn open_logged(
    mode: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<Connection> {
    let started_at = Instant::now();
    let result = connect()
        .map_err(StorageError::Open)
        .and_then(prepare_vault);

    match &result {
        Ok(_) => info!(
            "event=vault_open module=storage status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=vault_open module=storage status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn prepare_vault(mut conn: Connection) -> StorageResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(StorageError::Open)?;
    upgrade_schema(&mut conn)?;
    Ok(conn)
}
