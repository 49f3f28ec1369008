//! # waymark-client
//!
//! The application-facing layer of Waymark. A UI shell (desktop, TUI,
//! whatever) creates one [`AppState`], restores the persisted session and
//! then calls the async functions under [`commands`], which group the
//! surface by domain: auth, maps, wiki, projects, migrate, backup,
//! settings.
//!
//! Ownership always comes from the injected [`Session`] value, never from
//! ambient globals, so two states in one process cannot leak users into
//! each other's records.

pub mod commands;
pub mod error;
pub mod session;
pub mod state;

pub use error::AppError;
pub use session::Session;
pub use state::AppState;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise defaults to debug for the client
/// layer and info for the store.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("waymark_client=debug,waymark_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
