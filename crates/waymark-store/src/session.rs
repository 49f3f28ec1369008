//! Scoped singleton values in the `app_state` table.
//!
//! These are environment state rather than records: the persisted session
//! key (`current_user_id`), the app settings JSON document and the applied
//! pin catalog version each live in one row keyed by name. A missing row
//! is always a normal condition.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

/// `app_state` key holding the id of the last signed-in user.
pub const CURRENT_USER_KEY: &str = "current_user_id";

/// `app_state` key holding the settings JSON document.
pub const SETTINGS_KEY: &str = "settings";

/// `app_state` key holding the pin catalog version last applied to the
/// library (see `waymark_shared::pins::CATALOG_VERSION`).
pub const PIN_CATALOG_VERSION_KEY: &str = "pin_catalog_version";

impl Database {
    /// Read a scoped value. Missing keys are `Ok(None)`.
    pub async fn get_app_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn().await;
        let value = conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a scoped value.
    pub async fn set_app_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn().await;
        conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a scoped value. Removing a missing key is a no-op.
    pub async fn clear_app_value(&self, key: &str) -> Result<()> {
        let conn = self.conn().await;
        conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Session key helpers
    // ------------------------------------------------------------------

    /// The user id persisted by the last login, if any.
    ///
    /// This is only a cache for session restore at startup; the live
    /// session is held by the client layer.
    pub async fn stored_session_user(&self) -> Result<Option<String>> {
        self.get_app_value(CURRENT_USER_KEY).await
    }

    /// Persist `user_id` as the active session.
    pub async fn store_session_user(&self, user_id: &str) -> Result<()> {
        self.set_app_value(CURRENT_USER_KEY, user_id).await
    }

    /// Forget the persisted session.
    pub async fn clear_session_user(&self) -> Result<()> {
        self.clear_app_value(CURRENT_USER_KEY).await
    }
}
