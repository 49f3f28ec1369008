//! Account and session commands: signup, login, logout, session restore,
//! profile edits.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use waymark_shared::constants::MIN_PASSWORD_LEN;
use waymark_store::User;

use crate::commands::require_user;
use crate::error::{AppError, Result};
use crate::session::Session;
use crate::state::AppState;

/// Profile data safe to hand to a UI. Never includes the password hash.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339(),
            last_login_at: user.last_login_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create an account and activate a session for it.
///
/// A clash on the username surfaces as
/// [`StoreError::DuplicateUsername`](waymark_store::StoreError::DuplicateUsername)
/// wrapped in [`AppError::Store`].
pub async fn sign_up(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> Result<UserDto> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() {
        return Err(AppError::Validation("username must not be empty".into()));
    }
    if email.is_empty() {
        return Err(AppError::Validation("email must not be empty".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user = state.database.create_user(username, email, password).await?;

    state.database.store_session_user(&user.id).await?;
    *state.session.write().await = Session::signed_in(&user.id, &user.username);

    info!(user_id = %user.id, username = %user.username, "account created");
    Ok(UserDto::from(&user))
}

/// Validate credentials and activate the session.
///
/// Wrong password and unknown username produce the same
/// [`AppError::InvalidCredentials`].
pub async fn log_in(state: &AppState, username: &str, password: &str) -> Result<UserDto> {
    let Some(mut user) = state
        .database
        .validate_user(username.trim(), password)
        .await?
    else {
        return Err(AppError::InvalidCredentials);
    };

    user.last_login_at = Some(Utc::now());
    state.database.update_user(&user).await?;

    state.database.store_session_user(&user.id).await?;
    *state.session.write().await = Session::signed_in(&user.id, &user.username);

    info!(user_id = %user.id, "signed in");
    Ok(UserDto::from(&user))
}

/// Clear the live session and the persisted key.
pub async fn log_out(state: &AppState) -> Result<()> {
    state.database.clear_session_user().await?;
    *state.session.write().await = Session::Anonymous;

    info!("signed out");
    Ok(())
}

/// Restore the session persisted by the last login.
///
/// A missing key is `Ok(None)`. A key pointing at a user record that no
/// longer exists is also `Ok(None)`: the stale key is cleared and the
/// session stays anonymous.
pub async fn restore_session(state: &AppState) -> Result<Option<UserDto>> {
    let Some(user_id) = state.database.stored_session_user().await? else {
        return Ok(None);
    };

    match state.database.get_user_by_id(&user_id).await? {
        Some(user) => {
            *state.session.write().await = Session::signed_in(&user.id, &user.username);
            info!(user_id = %user.id, "session restored");
            Ok(Some(UserDto::from(&user)))
        }
        None => {
            // The account is gone; drop the stale key.
            state.database.clear_session_user().await?;
            info!(user_id = %user_id, "persisted session points at a missing user, cleared");
            Ok(None)
        }
    }
}

/// Update profile fields of the signed-in user. `None` leaves a field
/// unchanged; a new password is re-hashed by the store.
pub async fn update_profile(
    state: &AppState,
    email: Option<&str>,
    new_password: Option<&str>,
) -> Result<UserDto> {
    let user_id = require_user(state).await?;

    let Some(mut user) = state.database.get_user_by_id(&user_id).await? else {
        return Err(AppError::NotFound(format!("user {user_id}")));
    };

    // No writes until every supplied field has passed validation.
    let email = email.map(str::trim);
    if let Some(email) = email {
        if email.is_empty() {
            return Err(AppError::Validation("email must not be empty".into()));
        }
    }
    if let Some(password) = new_password {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
    }

    if let Some(email) = email {
        user.email = email.to_string();
        state.database.update_user(&user).await?;
    }
    if let Some(password) = new_password {
        state.database.set_user_password(&user.id, password).await?;
    }

    info!(user_id = %user.id, "profile updated");
    Ok(UserDto::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_store::{Database, StoreError};

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (AppState::new(db), dir)
    }

    #[tokio::test]
    async fn sign_up_activates_a_session() {
        let (state, _dir) = test_state().await;

        let dto = sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();

        assert_eq!(dto.username, "mira");
        assert_eq!(state.current_user_id().await.as_deref(), Some(dto.id.as_str()));
        assert_eq!(
            state.database.stored_session_user().await.unwrap(),
            Some(dto.id.clone())
        );
    }

    #[tokio::test]
    async fn sign_up_validates_fields_before_writing() {
        let (state, _dir) = test_state().await;

        assert!(matches!(
            sign_up(&state, "  ", "a@b.c", "hunter2hunter2").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            sign_up(&state, "mira", "", "hunter2hunter2").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            sign_up(&state, "mira", "a@b.c", "short").await,
            Err(AppError::Validation(_))
        ));

        // Nothing was written and the session stayed anonymous.
        assert!(state.current_user_id().await.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_surfaces_as_store_error() {
        let (state, _dir) = test_state().await;

        sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();

        let err = sign_up(&state, "mira", "other@example.com", "hunter2hunter2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::DuplicateUsername)
        ));
    }

    #[tokio::test]
    async fn login_logout_lifecycle() {
        let (state, _dir) = test_state().await;

        let created = sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();
        log_out(&state).await.unwrap();
        assert!(state.current_user_id().await.is_none());

        // Wrong password and unknown user look identical.
        assert!(matches!(
            log_in(&state, "mira", "wrong-password").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            log_in(&state, "nobody", "hunter2hunter2").await,
            Err(AppError::InvalidCredentials)
        ));

        let logged_in = log_in(&state, "mira", "hunter2hunter2").await.unwrap();
        assert_eq!(logged_in.id, created.id);
        // Login refreshes the timestamp; signup leaves it unset.
        assert!(created.last_login_at.is_none());
        assert!(logged_in.last_login_at.is_some());
        assert!(state.session.read().await.is_signed_in());
    }

    #[tokio::test]
    async fn restore_session_picks_up_last_login() {
        let (state, _dir) = test_state().await;

        let dto = sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();

        // Same database, fresh state: what a restart looks like.
        let restarted = AppState::new(state.database.clone());
        let restored = restore_session(&restarted).await.unwrap().unwrap();
        assert_eq!(restored.id, dto.id);
        assert!(restarted.session.read().await.is_signed_in());
    }

    #[tokio::test]
    async fn restore_session_clears_dangling_user_id() {
        let (state, _dir) = test_state().await;

        // A persisted key whose account no longer exists.
        state.database.store_session_user("ghost-user").await.unwrap();

        let restored = restore_session(&state).await.unwrap();
        assert!(restored.is_none());
        assert!(!state.session.read().await.is_signed_in());
        assert!(state.database.stored_session_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_profile_requires_a_session() {
        let (state, _dir) = test_state().await;

        assert!(matches!(
            update_profile(&state, Some("new@example.com"), None).await,
            Err(AppError::NotSignedIn)
        ));

        sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();

        let dto = update_profile(&state, Some("new@example.com"), Some("fresh-password"))
            .await
            .unwrap();
        assert_eq!(dto.email, "new@example.com");

        // The new password is live.
        log_out(&state).await.unwrap();
        assert!(log_in(&state, "mira", "fresh-password").await.is_ok());
    }

    #[tokio::test]
    async fn update_profile_validates_fields_before_writing() {
        let (state, _dir) = test_state().await;

        let dto = sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();

        // A valid email paired with a too-short password is rejected whole.
        assert!(matches!(
            update_profile(&state, Some("new@example.com"), Some("short")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            update_profile(&state, Some("   "), None).await,
            Err(AppError::Validation(_))
        ));

        // Neither rejected call reached the store.
        let stored = state.database.get_user_by_id(&dto.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "mira@example.com");
        log_out(&state).await.unwrap();
        assert!(log_in(&state, "mira", "hunter2hunter2").await.is_ok());
    }
}
