//! Command functions a UI shell calls.
//!
//! Each sub-module groups related commands by domain. Every function takes
//! the shared [`AppState`] and returns `Result<_, AppError>`; anything a
//! UI should render (profiles, reports, settings) comes back as a plain
//! serializable value.
//!
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod auth;
pub mod backup;
pub mod maps;
pub mod migrate;
pub mod projects;
pub mod settings;
pub mod wiki;

use waymark_shared::constants::MAX_NAME_LEN;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// The signed-in user's id, or [`AppError::NotSignedIn`].
pub(crate) async fn require_user(state: &AppState) -> Result<String> {
    state
        .current_user_id()
        .await
        .ok_or(AppError::NotSignedIn)
}

/// Trimmed display name for maps and projects, or a validation error.
pub(crate) fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "name longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}
