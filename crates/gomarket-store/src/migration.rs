//! Table setup for the SQLite backend.
//!
//! Migrations are SQL batches applied in order inside one transaction; the
//! database's `user_version` records how many have run. Only the backend's
//! own tables are covered; values stored in them are opaque strings.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Migration batches. Entry `n` moves the layout from version `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[
    // v1: one row per key.
    "CREATE TABLE kv_entries (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    );",
];

/// Layout version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the table layout up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let found = layout_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database layout v{} is newer than supported v{}",
            found, CURRENT_VERSION
        )));
    }
    if found == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for batch in &MIGRATIONS[found as usize..] {
        tx.execute_batch(batch)?;
    }
    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
    tx.commit()?;

    tracing::debug!(from = found, to = CURRENT_VERSION, "migrated key-value tables");
    Ok(())
}

/// Layout version recorded in the database; 0 for a fresh file.
pub fn layout_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Wall-clock Unix milliseconds, stamped on each write.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
