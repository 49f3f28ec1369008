//! CRUD and derived queries for [`MapRecord`]s.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use waymark_shared::pins::PinData;

use crate::database::{Collection, Database};
use crate::error::Result;
use crate::models::{MapRecord, MapSummary};

/// Reverse link: a map that drills down into the one being asked about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapLink {
    pub id: String,
    pub name: String,
}

impl Database {
    // ------------------------------------------------------------------
    // Create / overwrite
    // ------------------------------------------------------------------

    /// Store `record` under its id, creating or overwriting.
    ///
    /// This is a literal write: timestamps and ownership are taken from
    /// the record as given. Name validation is the caller's job.
    pub async fn save_map(&self, record: &MapRecord) -> Result<()> {
        self.put(Collection::Maps, &record.id, record).await
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single map. Absent ids are `Ok(None)`.
    pub async fn get_map_record(&self, id: &str) -> Result<Option<MapRecord>> {
        self.get(Collection::Maps, id).await
    }

    /// List every stored map as a summary row, newest first.
    pub async fn list_maps(&self) -> Result<Vec<MapSummary>> {
        let mut maps: Vec<MapRecord> = self
            .get_all(Collection::Maps)
            .await?
            .into_values()
            .collect();
        maps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(maps.iter().map(MapRecord::summary).collect())
    }

    /// Every map holding at least one pin that links to `child_id`,
    /// sorted by name.
    ///
    /// Computed by scanning all pin lists. A pin linking a map to itself
    /// does not make the map its own parent.
    pub async fn get_parent_maps(&self, child_id: &str) -> Result<Vec<MapLink>> {
        let maps: HashMap<String, MapRecord> = self.get_all(Collection::Maps).await?;

        let mut parents: Vec<MapLink> = maps
            .into_values()
            .filter(|m| m.id != child_id)
            .filter(|m| {
                m.pins
                    .iter()
                    .any(|p| p.linked_map_id.as_deref() == Some(child_id))
            })
            .map(|m| MapLink {
                id: m.id,
                name: m.name,
            })
            .collect();

        parents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parents)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace the whole pin list. There is no per-pin diffing: the editor
    /// saves the list wholesale and the last writer wins.
    ///
    /// Returns `false` when no map is stored at `id`.
    pub async fn update_map_pins(&self, id: &str, pins: &[PinData]) -> Result<bool> {
        let Some(mut record) = self.get_map_record(id).await? else {
            return Ok(false);
        };

        record.pins = pins.to_vec();
        record.updated_at = Utc::now();
        self.put(Collection::Maps, id, &record).await?;
        Ok(true)
    }

    /// Update name and description only; image, pins and ownership are
    /// left untouched. Returns `false` when no map is stored at `id`.
    pub async fn update_map_meta(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<bool> {
        let Some(mut record) = self.get_map_record(id).await? else {
            return Ok(false);
        };

        record.name = name.to_string();
        record.description = description.map(str::to_string);
        record.updated_at = Utc::now();
        self.put(Collection::Maps, id, &record).await?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a map by id. Returns `true` if a record was removed.
    ///
    /// Nothing else is cleaned up: pins on other maps that linked here now
    /// dangle (readers tolerate that), and any wiki stays under the old
    /// map id.
    pub async fn delete_map(&self, id: &str) -> Result<bool> {
        self.delete(Collection::Maps, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_shared::pins::{pin_type_by_id, PinData};

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).expect("should open");
        (db, dir)
    }

    fn pin_linking_to(label: &str, target: &str) -> PinData {
        let mut pin = PinData::new(label, 1.0, 2.0, pin_type_by_id("location").unwrap());
        pin.linked_map_id = Some(target.to_string());
        pin
    }

    #[tokio::test]
    async fn save_then_get_round_trip() {
        let (db, _dir) = test_db().await;

        let mut map = MapRecord::new("Sunken Keep", vec![0xDE, 0xAD, 0xBE, 0xEF]);
        map.description = Some("First floor".to_string());
        map.pins
            .push(PinData::new("1", 4.0, 8.0, pin_type_by_id("npc").unwrap()));

        db.save_map(&map).await.unwrap();

        let loaded = db.get_map_record(&map.id).await.unwrap().unwrap();
        assert_eq!(loaded, map);

        assert!(db.get_map_record("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_map_overwrites_by_id() {
        let (db, _dir) = test_db().await;

        let mut map = MapRecord::new("Draft", vec![1]);
        db.save_map(&map).await.unwrap();

        map.name = "Final".to_string();
        db.save_map(&map).await.unwrap();

        let loaded = db.get_map_record(&map.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Final");
        assert_eq!(db.count(Collection::Maps).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_maps_returns_summaries_newest_first() {
        let (db, _dir) = test_db().await;

        let mut older = MapRecord::new("Older", vec![1]);
        older.created_at = older.created_at - chrono::Duration::minutes(5);
        let newer = MapRecord::new("Newer", vec![2]);

        db.save_map(&older).await.unwrap();
        db.save_map(&newer).await.unwrap();

        let listing = db.list_maps().await.unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].name, "Newer");
        assert_eq!(listing[1].name, "Older");
        assert_eq!(listing[1].image, vec![1]);
    }

    #[tokio::test]
    async fn update_map_pins_replaces_wholesale() {
        let (db, _dir) = test_db().await;

        let mut map = MapRecord::new("Keep", vec![1]);
        map.pins
            .push(PinData::new("1", 0.0, 0.0, pin_type_by_id("hazard").unwrap()));
        db.save_map(&map).await.unwrap();

        let replacement = vec![
            PinData::new("1", 5.0, 5.0, pin_type_by_id("treasure").unwrap()),
            PinData::new("2", 6.0, 6.0, pin_type_by_id("treasure").unwrap()),
        ];
        assert!(db.update_map_pins(&map.id, &replacement).await.unwrap());

        let loaded = db.get_map_record(&map.id).await.unwrap().unwrap();
        assert_eq!(loaded.pins, replacement);
        assert!(loaded.updated_at >= map.updated_at);

        assert!(!db.update_map_pins("missing", &replacement).await.unwrap());
    }

    #[tokio::test]
    async fn update_map_meta_leaves_pins_and_image_alone() {
        let (db, _dir) = test_db().await;

        let mut map = MapRecord::new("Keep", vec![9, 9]);
        map.pins
            .push(PinData::new("1", 0.0, 0.0, pin_type_by_id("npc").unwrap()));
        db.save_map(&map).await.unwrap();

        assert!(db
            .update_map_meta(&map.id, "Sunken Keep", Some("flooded"))
            .await
            .unwrap());

        let loaded = db.get_map_record(&map.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Sunken Keep");
        assert_eq!(loaded.description.as_deref(), Some("flooded"));
        assert_eq!(loaded.image, vec![9, 9]);
        assert_eq!(loaded.pins.len(), 1);
    }

    #[tokio::test]
    async fn delete_map_leaves_links_dangling() {
        let (db, _dir) = test_db().await;

        let child = MapRecord::new("Cellar", vec![1]);
        let mut parent = MapRecord::new("Keep", vec![2]);
        parent.pins.push(pin_linking_to("1", &child.id));

        db.save_map(&child).await.unwrap();
        db.save_map(&parent).await.unwrap();

        assert!(db.delete_map(&child.id).await.unwrap());
        assert!(!db.delete_map(&child.id).await.unwrap());

        // The parent still holds the (now dangling) link.
        let parent = db.get_map_record(&parent.id).await.unwrap().unwrap();
        assert_eq!(
            parent.pins[0].linked_map_id.as_deref(),
            Some(child.id.as_str())
        );
        assert!(db.get_map_record(&child.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn parent_maps_scans_pin_links() {
        let (db, _dir) = test_db().await;

        let child = MapRecord::new("Cellar", vec![1]);

        let mut keep = MapRecord::new("Keep", vec![2]);
        keep.pins.push(pin_linking_to("1", &child.id));

        let mut tower = MapRecord::new("Tower", vec![3]);
        tower.pins.push(pin_linking_to("1", &child.id));

        let mut unrelated = MapRecord::new("Swamp", vec![4]);
        unrelated.pins.push(pin_linking_to("1", "somewhere-else"));

        // A self-link must not make the child its own parent.
        let mut child = child;
        let self_link = pin_linking_to("1", &child.id);
        child.pins.push(self_link);

        for map in [&child, &keep, &tower, &unrelated] {
            db.save_map(map).await.unwrap();
        }

        let parents = db.get_parent_maps(&child.id).await.unwrap();
        let names: Vec<&str> = parents.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Keep", "Tower"]);
    }
}
