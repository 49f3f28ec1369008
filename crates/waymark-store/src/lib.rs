//! # waymark-store
//!
//! Local persistence for the Waymark application, backed by SQLite.
//!
//! Records live in per-collection key/value tables and are encoded with
//! bincode; the crate exposes an async [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed repository methods for every
//! domain model. All operations resolve against the local store only;
//! there is no network anywhere below this line.

pub mod backup;
pub mod database;
pub mod maps;
pub mod migrations;
pub mod models;
pub mod ownership;
pub mod projects;
pub mod session;
pub mod users;
pub mod wikis;

mod error;
mod password;

pub use database::{Collection, Database};
pub use error::StoreError;
pub use models::*;
