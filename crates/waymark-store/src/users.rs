//! Account records and credential checks.
//!
//! Passwords never leave this module in plain form: `create_user` hashes
//! before writing and `validate_user` compares against the stored hash.
//! Username lookup is a full scan of the users collection, which is fine
//! for a store that holds a handful of local accounts.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::database::{Collection, Database};
use crate::error::{Result, StoreError};
use crate::models::User;
use crate::password;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Create a new account.
    ///
    /// Usernames are unique by exact, case-sensitive match; a clash fails
    /// with [`StoreError::DuplicateUsername`] and writes nothing.
    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let users: HashMap<String, User> = self.get_all(Collection::Users).await?;
        if users.values().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password::hash(password)?,
            created_at: Utc::now(),
            last_login_at: None,
        };

        self.put(Collection::Users, &user.id, &user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Look up an account by username and verify the password.
    ///
    /// Unknown username and wrong password both come back as `Ok(None)`,
    /// so a caller cannot tell which half failed.
    pub async fn validate_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let users: HashMap<String, User> = self.get_all(Collection::Users).await?;

        let Some(user) = users.into_values().find(|u| u.username == username) else {
            return Ok(None);
        };

        if password::verify(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Fetch a single account by id. Absent ids are `Ok(None)`.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get(Collection::Users, id).await
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite the account stored at `user.id`.
    ///
    /// Used for the two permitted mutations: profile edits and the
    /// login-timestamp refresh. The password hash is written as-is; use
    /// [`Database::set_user_password`] to change a password.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        self.put(Collection::Users, &user.id, user).await
    }

    /// Hash `new_password` and store it on the account.
    ///
    /// Returns `false` when no account is stored at `id`.
    pub async fn set_user_password(&self, id: &str, new_password: &str) -> Result<bool> {
        let Some(mut user) = self.get_user_by_id(id).await? else {
            return Ok(false);
        };

        user.password_hash = password::hash(new_password)?;
        self.update_user(&user).await?;
        Ok(true)
    }
}
