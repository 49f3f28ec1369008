//! Schema migrations, applied at open time.
//!
//! SQLite's `user_version` pragma records the applied schema version.
//! [`MIGRATIONS`] lists one upgrade step per version; each step runs at
//! most once, so reopening an up-to-date database is a no-op.

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

type Migration = fn(&Connection) -> rusqlite::Result<()>;

/// Upgrade steps in version order: entry `i` brings the schema to
/// version `i + 1`.
const MIGRATIONS: &[(&str, Migration)] = &[("v001_initial", v001_initial::up)];

/// Bring the connected database up to the latest schema version.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let applied: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let target = MIGRATIONS.len() as u32;

    if applied >= target {
        tracing::debug!(version = applied, "schema is current");
        return Ok(());
    }

    for (i, (name, up)) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        tracing::info!(migration = name, "applying schema migration");
        up(conn).map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
        conn.pragma_update(None, "user_version", (i + 1) as u32)?;
    }

    Ok(())
}
