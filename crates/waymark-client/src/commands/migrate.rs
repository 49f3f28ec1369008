//! Library migration: claim records created before accounts existed.

use tracing::{info, warn};

use waymark_store::ownership::OwnershipReport;

use crate::commands::require_user;
use crate::error::Result;
use crate::state::AppState;

/// Assign every unowned map and dungeon sketch to the signed-in user,
/// marking each one private.
///
/// Typically offered right after the first signup on an old library.
/// Safe to run again: records that already have an owner are skipped, and
/// per-record failures are collected in the report instead of aborting.
pub async fn claim_library(state: &AppState) -> Result<OwnershipReport> {
    let user_id = require_user(state).await?;

    let report = state.database.claim_unowned_records(&user_id).await?;

    if report.success {
        info!(
            maps = report.migrated_maps,
            projects = report.migrated_projects,
            "library claimed"
        );
    } else {
        warn!(
            errors = report.errors.len(),
            "library claim finished with failures"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{auth, maps, projects};
    use crate::error::AppError;
    use waymark_store::Database;

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (AppState::new(db), dir)
    }

    #[tokio::test]
    async fn claim_requires_a_session() {
        let (state, _dir) = test_state().await;

        assert!(matches!(
            claim_library(&state).await,
            Err(AppError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn claim_takes_over_the_anonymous_library() {
        let (state, _dir) = test_state().await;

        // An old library built before accounts existed.
        let old_map = maps::upload_map(&state, "Old map", None, vec![1]).await.unwrap();
        projects::create_project(&state, "Old sketch").await.unwrap();

        let dto = auth::sign_up(&state, "mira", "mira@example.com", "hunter2hunter2")
            .await
            .unwrap();

        let report = claim_library(&state).await.unwrap();
        assert!(report.success);
        assert_eq!(report.migrated_maps, 1);
        assert_eq!(report.migrated_projects, 1);

        let claimed = maps::get_map(&state, &old_map.id).await.unwrap();
        assert_eq!(claimed.user_id.as_deref(), Some(dto.id.as_str()));
        assert!(!claimed.is_public);

        // A second run has nothing left to do.
        let second = claim_library(&state).await.unwrap();
        assert_eq!(second.migrated_maps, 0);
        assert_eq!(second.migrated_projects, 0);
    }
}
