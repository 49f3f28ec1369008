//! Application state shared across all commands.
//!
//! A UI shell creates one [`AppState`] at startup (typically inside an
//! `Arc`) and hands a reference to every command invocation.

use tokio::sync::RwLock;

use waymark_store::Database;

use crate::error::Result;
use crate::session::Session;

/// Central application state.
///
/// Holds the database handle and the current session. Commands stamp
/// ownership from [`AppState::session`]; swapping the value is the entire
/// login/logout mechanism.
pub struct AppState {
    /// Handle to the local database.
    pub database: Database,

    /// The live session. Starts anonymous; `commands::auth` moves it
    /// through the login/restore/logout lifecycle.
    pub session: RwLock<Session>,
}

impl AppState {
    /// Open the default on-disk database with an anonymous session.
    ///
    /// Callers usually follow up with `commands::auth::restore_session`
    /// to pick up where the last run left off.
    pub fn open() -> Result<Self> {
        Ok(Self::new(Database::open()?))
    }

    /// Wrap an already-open database. Used by tests and by shells that
    /// manage their own database location.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            session: RwLock::new(Session::Anonymous),
        }
    }

    /// The user id of the active session, if signed in.
    pub async fn current_user_id(&self) -> Option<String> {
        self.session.read().await.user_id().map(str::to_string)
    }
}
