//! Per-map wiki documents and their sections.
//!
//! A wiki is one record keyed by the owning map's id. Section operations
//! load the document, edit it in memory and write it back whole, which
//! keeps them on the single-key path like every other mutation.

use chrono::Utc;
use uuid::Uuid;

use waymark_shared::wiki::WikiCategory;

use crate::database::{Collection, Database};
use crate::error::Result;
use crate::models::{MapWiki, WikiSection, WikiSectionPatch};

/// Arguments for a new wiki section. The id is generated at insert time.
#[derive(Debug, Clone)]
pub struct NewWikiSection {
    pub title: String,
    pub content: String,
    pub category: WikiCategory,
    pub tags: Vec<String>,
    pub linked_pin_ids: Vec<String>,
}

impl Database {
    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch the wiki for `map_id`.
    ///
    /// Maps have no wiki row until their first section is written; `None`
    /// means "no sections yet" and callers usually substitute
    /// [`MapWiki::empty`].
    pub async fn get_map_wiki(&self, map_id: &str) -> Result<Option<MapWiki>> {
        self.get(Collection::MapWikis, map_id).await
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Append a section to the map's wiki, creating the wiki document on
    /// first write. Returns the stored section with its generated id.
    ///
    /// `linked_pin_ids` is stored verbatim; nothing checks the labels
    /// against the map's pin list.
    pub async fn create_wiki_section(
        &self,
        map_id: &str,
        section: NewWikiSection,
    ) -> Result<WikiSection> {
        let mut wiki = self
            .get_map_wiki(map_id)
            .await?
            .unwrap_or_else(|| MapWiki::empty(map_id));

        let section = WikiSection {
            id: Uuid::new_v4().to_string(),
            title: section.title,
            content: section.content,
            category: section.category,
            tags: section.tags,
            linked_pin_ids: section.linked_pin_ids,
        };

        wiki.sections.push(section.clone());
        wiki.updated_at = Utc::now();
        self.put(Collection::MapWikis, map_id, &wiki).await?;

        tracing::debug!(map_id = %map_id, section_id = %section.id, "wiki section created");
        Ok(section)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Merge `patch` into one section; `None` fields keep their stored
    /// values. Returns `false` when the wiki or the section is absent.
    pub async fn update_wiki_section(
        &self,
        map_id: &str,
        section_id: &str,
        patch: &WikiSectionPatch,
    ) -> Result<bool> {
        let Some(mut wiki) = self.get_map_wiki(map_id).await? else {
            return Ok(false);
        };
        let Some(section) = wiki.sections.iter_mut().find(|s| s.id == section_id) else {
            return Ok(false);
        };

        if let Some(title) = &patch.title {
            section.title = title.clone();
        }
        if let Some(content) = &patch.content {
            section.content = content.clone();
        }
        if let Some(category) = patch.category {
            section.category = category;
        }
        if let Some(tags) = &patch.tags {
            section.tags = tags.clone();
        }
        if let Some(linked) = &patch.linked_pin_ids {
            section.linked_pin_ids = linked.clone();
        }

        wiki.updated_at = Utc::now();
        self.put(Collection::MapWikis, map_id, &wiki).await?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Remove one section from the map's wiki. Returns `false` when the
    /// wiki or the section is absent.
    pub async fn delete_wiki_section(&self, map_id: &str, section_id: &str) -> Result<bool> {
        let Some(mut wiki) = self.get_map_wiki(map_id).await? else {
            return Ok(false);
        };

        let before = wiki.sections.len();
        wiki.sections.retain(|s| s.id != section_id);
        if wiki.sections.len() == before {
            return Ok(false);
        }

        wiki.updated_at = Utc::now();
        self.put(Collection::MapWikis, map_id, &wiki).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).expect("should open");
        (db, dir)
    }

    fn lore_section(title: &str) -> NewWikiSection {
        NewWikiSection {
            title: title.to_string(),
            content: "Long ago...".to_string(),
            category: WikiCategory::Lore,
            tags: vec!["ancient".to_string()],
            linked_pin_ids: vec!["3".to_string()],
        }
    }

    #[tokio::test]
    async fn first_section_creates_the_wiki() {
        let (db, _dir) = test_db().await;

        assert!(db.get_map_wiki("map-1").await.unwrap().is_none());

        let section = db
            .create_wiki_section("map-1", lore_section("The Founding"))
            .await
            .unwrap();

        let wiki = db.get_map_wiki("map-1").await.unwrap().unwrap();
        assert_eq!(wiki.map_id, "map-1");
        assert_eq!(wiki.sections.len(), 1);
        assert_eq!(wiki.sections[0].id, section.id);
        assert_eq!(wiki.categories, WikiCategory::standard());
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let (db, _dir) = test_db().await;

        let section = db
            .create_wiki_section("map-1", lore_section("The Founding"))
            .await
            .unwrap();

        let patch = WikiSectionPatch {
            content: Some("Rewritten.".to_string()),
            ..Default::default()
        };
        assert!(db
            .update_wiki_section("map-1", &section.id, &patch)
            .await
            .unwrap());

        let wiki = db.get_map_wiki("map-1").await.unwrap().unwrap();
        assert_eq!(wiki.sections[0].content, "Rewritten.");
        // Untouched fields keep their values.
        assert_eq!(wiki.sections[0].title, "The Founding");
        assert_eq!(wiki.sections[0].tags, vec!["ancient".to_string()]);
    }

    #[tokio::test]
    async fn missing_targets_return_false() {
        let (db, _dir) = test_db().await;

        let patch = WikiSectionPatch::default();
        assert!(!db
            .update_wiki_section("no-map", "no-section", &patch)
            .await
            .unwrap());
        assert!(!db.delete_wiki_section("no-map", "no-section").await.unwrap());

        db.create_wiki_section("map-1", lore_section("Kept"))
            .await
            .unwrap();
        assert!(!db
            .delete_wiki_section("map-1", "unknown-section")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn delete_section_keeps_the_rest() {
        let (db, _dir) = test_db().await;

        let first = db
            .create_wiki_section("map-1", lore_section("First"))
            .await
            .unwrap();
        let second = db
            .create_wiki_section("map-1", lore_section("Second"))
            .await
            .unwrap();

        assert!(db.delete_wiki_section("map-1", &first.id).await.unwrap());

        let wiki = db.get_map_wiki("map-1").await.unwrap().unwrap();
        assert_eq!(wiki.sections.len(), 1);
        assert_eq!(wiki.sections[0].id, second.id);
    }
}
