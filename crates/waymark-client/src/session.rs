//! Explicit session values.
//!
//! The session moves through a fixed lifecycle: restored from the
//! persisted key at startup, replaced on login/signup, reset on logout.
//! Commands read the current value out of [`AppState`] instead of
//! consulting any ambient global, and the `current_user_id` row in the
//! store is only a cache of the last login for the next startup.
//!
//! [`AppState`]: crate::state::AppState

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who is driving the app right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Session {
    /// No user signed in. Browsing public and unowned records only.
    #[default]
    Anonymous,
    /// An account is active.
    #[serde(rename_all = "camelCase")]
    SignedIn {
        user_id: String,
        username: String,
        /// When this session became active (login or restore).
        since: DateTime<Utc>,
    },
}

impl Session {
    /// Session value for a fresh login or restore.
    pub fn signed_in(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Session::SignedIn {
            user_id: user_id.into(),
            username: username.into(),
            since: Utc::now(),
        }
    }

    /// The active user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn { user_id, .. } => Some(user_id),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accessors() {
        let anon = Session::default();
        assert!(!anon.is_signed_in());
        assert!(anon.user_id().is_none());

        let active = Session::signed_in("u-1", "mira");
        assert!(active.is_signed_in());
        assert_eq!(active.user_id(), Some("u-1"));
    }
}
