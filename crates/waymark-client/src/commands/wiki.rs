//! Wiki commands: per-map lore sections.

use tracing::info;

use waymark_shared::wiki::WikiCategory;
use waymark_store::wikis::NewWikiSection;
use waymark_store::{MapWiki, WikiSection, WikiSectionPatch};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// The wiki for a map. Maps without sections yet come back as an empty
/// wiki seeded with the standard categories.
///
/// Reads are forgiving: this also serves wikis orphaned by a map
/// deletion. Writes go through [`add_section`], which does check that
/// the map exists.
pub async fn get_wiki(state: &AppState, map_id: &str) -> Result<MapWiki> {
    Ok(state
        .database
        .get_map_wiki(map_id)
        .await?
        .unwrap_or_else(|| MapWiki::empty(map_id)))
}

/// Add a section to a map's wiki (creating the wiki on first write).
///
/// `linked_pin_ids` is stored verbatim; labels are not checked against
/// the map's pins.
pub async fn add_section(
    state: &AppState,
    map_id: &str,
    title: &str,
    content: &str,
    category: WikiCategory,
    tags: Vec<String>,
    linked_pin_ids: Vec<String>,
) -> Result<WikiSection> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("section title must not be empty".into()));
    }
    if state.database.get_map_record(map_id).await?.is_none() {
        return Err(AppError::NotFound(format!("map {map_id}")));
    }

    let section = state
        .database
        .create_wiki_section(
            map_id,
            NewWikiSection {
                title: title.to_string(),
                content: content.to_string(),
                category,
                tags,
                linked_pin_ids,
            },
        )
        .await?;

    info!(map_id = %map_id, section_id = %section.id, "wiki section added");
    Ok(section)
}

/// Patch one section; `None` fields keep their stored values.
pub async fn edit_section(
    state: &AppState,
    map_id: &str,
    section_id: &str,
    patch: WikiSectionPatch,
) -> Result<()> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("section title must not be empty".into()));
        }
    }

    if !state
        .database
        .update_wiki_section(map_id, section_id, &patch)
        .await?
    {
        return Err(AppError::NotFound(format!(
            "wiki section {section_id} on map {map_id}"
        )));
    }
    Ok(())
}

/// Remove one section from a map's wiki.
pub async fn remove_section(state: &AppState, map_id: &str, section_id: &str) -> Result<()> {
    if !state.database.delete_wiki_section(map_id, section_id).await? {
        return Err(AppError::NotFound(format!(
            "wiki section {section_id} on map {map_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::maps;
    use waymark_store::Database;

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (AppState::new(db), dir)
    }

    #[tokio::test]
    async fn maps_start_with_an_empty_wiki() {
        let (state, _dir) = test_state().await;

        let map = maps::upload_map(&state, "Keep", None, vec![1]).await.unwrap();

        let wiki = get_wiki(&state, &map.id).await.unwrap();
        assert!(wiki.sections.is_empty());
        assert_eq!(wiki.categories, WikiCategory::standard());
    }

    #[tokio::test]
    async fn orphaned_wikis_stay_readable() {
        let (state, _dir) = test_state().await;

        let map = maps::upload_map(&state, "Keep", None, vec![1]).await.unwrap();
        add_section(
            &state,
            &map.id,
            "Kept lore",
            "Survives the map.",
            WikiCategory::Lore,
            vec![],
            vec![],
        )
        .await
        .unwrap();

        maps::delete_map(&state, &map.id).await.unwrap();

        let wiki = get_wiki(&state, &map.id).await.unwrap();
        assert_eq!(wiki.sections.len(), 1);
        assert_eq!(wiki.sections[0].title, "Kept lore");
    }

    #[tokio::test]
    async fn section_lifecycle() {
        let (state, _dir) = test_state().await;

        let map = maps::upload_map(&state, "Keep", None, vec![1]).await.unwrap();

        let section = add_section(
            &state,
            &map.id,
            "The Founding",
            "Built on older ruins.",
            WikiCategory::History,
            vec!["origin".to_string()],
            vec!["2".to_string()],
        )
        .await
        .unwrap();

        edit_section(
            &state,
            &map.id,
            &section.id,
            WikiSectionPatch {
                content: Some("Built on much older ruins.".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let wiki = get_wiki(&state, &map.id).await.unwrap();
        assert_eq!(wiki.sections.len(), 1);
        assert_eq!(wiki.sections[0].content, "Built on much older ruins.");
        assert_eq!(wiki.sections[0].title, "The Founding");

        remove_section(&state, &map.id, &section.id).await.unwrap();
        let wiki = get_wiki(&state, &map.id).await.unwrap();
        assert!(wiki.sections.is_empty());

        assert!(matches!(
            remove_section(&state, &map.id, &section.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn add_section_validates_title_and_map() {
        let (state, _dir) = test_state().await;

        let map = maps::upload_map(&state, "Keep", None, vec![1]).await.unwrap();

        assert!(matches!(
            add_section(&state, &map.id, "  ", "x", WikiCategory::General, vec![], vec![]).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            add_section(&state, "missing", "T", "x", WikiCategory::General, vec![], vec![]).await,
            Err(AppError::NotFound(_))
        ));
    }
}
