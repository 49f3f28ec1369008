//! Library backup commands: JSON export and merge import.

use tracing::info;

use waymark_store::backup::{BackupPayload, ImportStats};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Export the whole library as a JSON string the shell can write to a
/// file of the user's choosing.
pub async fn export_library(state: &AppState) -> Result<String> {
    let payload = state.database.export_backup().await?;

    let json = serde_json::to_string_pretty(&payload)
        .map_err(|e| AppError::Serialization(e.to_string()))?;

    info!(
        maps = payload.maps.len(),
        projects = payload.projects.len(),
        "library exported"
    );
    Ok(json)
}

/// Merge a backup file's contents into the library. Records already
/// present (by id) are left untouched.
pub async fn import_library(state: &AppState, json: &str) -> Result<ImportStats> {
    let payload: BackupPayload =
        serde_json::from_str(json).map_err(|e| AppError::Serialization(e.to_string()))?;

    Ok(state.database.import_backup(&payload).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{maps, wiki};
    use waymark_shared::wiki::WikiCategory;
    use waymark_store::Database;

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (AppState::new(db), dir)
    }

    #[tokio::test]
    async fn export_then_import_into_a_fresh_library() {
        let (source, _a) = test_state().await;
        let (target, _b) = test_state().await;

        let map = maps::upload_map(&source, "Keep", None, vec![0xCA, 0xFE])
            .await
            .unwrap();
        wiki::add_section(
            &source,
            &map.id,
            "Lore",
            "Old stones.",
            WikiCategory::Lore,
            vec![],
            vec![],
        )
        .await
        .unwrap();

        let json = export_library(&source).await.unwrap();

        let stats = import_library(&target, &json).await.unwrap();
        assert_eq!(stats.maps_imported, 1);
        assert_eq!(stats.wikis_imported, 1);

        let restored = maps::get_map(&target, &map.id).await.unwrap();
        assert_eq!(restored.image, vec![0xCA, 0xFE]);

        // Importing the same backup again changes nothing.
        let again = import_library(&target, &json).await.unwrap();
        assert_eq!(again.maps_imported, 0);
        assert_eq!(again.wikis_imported, 0);
    }

    #[tokio::test]
    async fn import_rejects_malformed_json() {
        let (state, _dir) = test_state().await;

        assert!(matches!(
            import_library(&state, "{ not json").await,
            Err(AppError::Serialization(_))
        ));
    }
}
