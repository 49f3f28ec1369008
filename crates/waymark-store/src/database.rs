//! Database connection management and the generic key/value layer.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] behind an async
//! mutex and guarantees that migrations are run before any other operation.
//! Each record collection is a two-column table (`key TEXT`, `value BLOB`)
//! holding bincode-encoded records; the typed repositories in the sibling
//! modules are thin layers over [`Database::put`], [`Database::get`],
//! [`Database::get_all`] and [`Database::delete`].
//!
//! No operation ever touches more than one key, so there are no cross-record
//! transactions: concurrent writers to the same key are last-writer-wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{Result, StoreError};
use crate::migrations;

/// Environment variable overriding the platform data directory.
pub const DATA_DIR_ENV: &str = "WAYMARK_DATA_DIR";

/// The record collections persisted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Maps,
    Users,
    MapWikis,
    DungeonProjects,
}

impl Collection {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Collection::Maps => "maps",
            Collection::Users => "users",
            Collection::MapWikis => "map_wikis",
            Collection::DungeonProjects => "dungeon_projects",
        }
    }
}

/// Handle to the local Waymark database.
///
/// Cheap to clone: all clones share one connection, and operations
/// serialize on it. Repository methods for each domain model live in the
/// `maps`, `users`, `wikis`, `projects`, `session`, `ownership` and
/// `backup` modules.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/waymark/waymark.db`
    /// - macOS:   `~/Library/Application Support/com.waymark.waymark/waymark.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\waymark\waymark\data\waymark.db`
    ///
    /// Setting `WAYMARK_DATA_DIR` overrides the directory entirely.
    pub fn open() -> Result<Self> {
        let data_dir = resolve_data_dir()?;
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("waymark.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Run schema migrations.
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lock the underlying connection for ad-hoc SQL.
    ///
    /// Repository modules use this for the few queries the key/value
    /// helpers cannot express (e.g. the `app_state` table).
    pub(crate) async fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }

    // ------------------------------------------------------------------
    // Generic key/value operations
    // ------------------------------------------------------------------

    /// Insert or overwrite the record at `key`.
    pub async fn put<T: Serialize>(
        &self,
        collection: Collection,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let bytes = bincode::serialize(value).map_err(StoreError::Encode)?;

        let conn = self.conn.lock().await;
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            collection.table()
        );
        conn.execute(&sql, params![key, bytes])?;

        tracing::debug!(collection = collection.table(), key = %key, "put record");
        Ok(())
    }

    /// Insert the record only if `key` is absent.
    ///
    /// Returns `true` when a row was written. This is the merge primitive
    /// used by backup import: existing records are never overwritten.
    pub async fn insert<T: Serialize>(
        &self,
        collection: Collection,
        key: &str,
        value: &T,
    ) -> Result<bool> {
        let bytes = bincode::serialize(value).map_err(StoreError::Encode)?;

        let conn = self.conn.lock().await;
        let sql = format!(
            "INSERT OR IGNORE INTO {} (key, value) VALUES (?1, ?2)",
            collection.table()
        );
        let affected = conn.execute(&sql, params![key, bytes])?;
        Ok(affected > 0)
    }

    /// Fetch the record at `key`. Absent keys are `Ok(None)`, never an error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<T>> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT value FROM {} WHERE key = ?1", collection.table());
        let bytes: Option<Vec<u8>> = conn
            .query_row(&sql, params![key], |row| row.get(0))
            .optional()?;

        match bytes {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(StoreError::Decode)?,
            )),
            None => Ok(None),
        }
    }

    /// Load every record in the collection, keyed by its string key.
    ///
    /// Derived queries (listings, uniqueness checks, reverse link lookups)
    /// are computed by scanning this result. Acceptable for a single local
    /// library; not meant for shared multi-user data sets.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<HashMap<String, T>> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT key, value FROM {}", collection.table());
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut records = HashMap::new();
        for row in rows {
            let (key, bytes) = row?;
            let value = bincode::deserialize(&bytes).map_err(StoreError::Decode)?;
            records.insert(key, value);
        }
        Ok(records)
    }

    /// Delete the record at `key`. Returns `true` if a row was removed.
    pub async fn delete(&self, collection: Collection, key: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let sql = format!("DELETE FROM {} WHERE key = ?1", collection.table());
        let affected = conn.execute(&sql, params![key])?;

        tracing::debug!(
            collection = collection.table(),
            key = %key,
            removed = affected > 0,
            "delete record"
        );
        Ok(affected > 0)
    }

    /// Number of records in the collection.
    pub async fn count(&self, collection: Collection) -> Result<u64> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let project_dirs =
        ProjectDirs::from("com", "waymark", "waymark").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().to_path_buf())
}
