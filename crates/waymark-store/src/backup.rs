//! Full-library export and import.
//!
//! The payload is built for JSON: image bytes travel base64-encoded so a
//! backup file stays inspectable in a text editor. Import merges into the
//! existing library; records whose id is already present are never
//! overwritten.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::database::{Collection, Database};
use crate::error::{Result, StoreError};
use crate::models::{DungeonProject, MapRecord, MapWiki, User};

/// Full backup payload, serialized to JSON by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPayload {
    /// ISO 8601 timestamp of when the backup was created
    pub created_at: String,
    /// App version that produced the backup
    pub version: String,
    pub maps: Vec<BackupMap>,
    pub wikis: Vec<MapWiki>,
    pub projects: Vec<DungeonProject>,
    pub users: Vec<User>,
}

/// A [`MapRecord`] with its image re-encoded for JSON transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMap {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_b64: String,
    pub pins: Vec<waymark_shared::pins::PinData>,
    pub user_id: Option<String>,
    pub is_public: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl BackupMap {
    fn from_record(record: &MapRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            image_b64: BASE64.encode(&record.image),
            pins: record.pins.clone(),
            user_id: record.user_id.clone(),
            is_public: record.is_public,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn into_record(self) -> Result<MapRecord> {
        let image = BASE64
            .decode(&self.image_b64)
            .map_err(|e| StoreError::Backup(format!("map {}: bad image data: {e}", self.id)))?;

        Ok(MapRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            image,
            pins: self.pins,
            user_id: self.user_id,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Counts of what an import actually wrote.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ImportStats {
    pub maps_imported: usize,
    pub wikis_imported: usize,
    pub projects_imported: usize,
    pub users_imported: usize,
}

impl Database {
    /// Export every record into a serializable payload, sorted by id so
    /// identical libraries produce identical backups.
    pub async fn export_backup(&self) -> Result<BackupPayload> {
        let mut maps: Vec<MapRecord> = self
            .get_all(Collection::Maps)
            .await?
            .into_values()
            .collect();
        maps.sort_by(|a, b| a.id.cmp(&b.id));

        let mut wikis: Vec<MapWiki> = self
            .get_all(Collection::MapWikis)
            .await?
            .into_values()
            .collect();
        wikis.sort_by(|a, b| a.map_id.cmp(&b.map_id));

        let mut projects: Vec<DungeonProject> = self
            .get_all(Collection::DungeonProjects)
            .await?
            .into_values()
            .collect();
        projects.sort_by(|a, b| a.id.cmp(&b.id));

        let mut users: Vec<User> = self
            .get_all(Collection::Users)
            .await?
            .into_values()
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(BackupPayload {
            created_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            maps: maps.iter().map(BackupMap::from_record).collect(),
            wikis,
            projects,
            users,
        })
    }

    /// Import a backup payload, merging with existing data.
    ///
    /// Records are inserted only where their id (and for users, their
    /// username) is free; nothing existing is overwritten. An undecodable
    /// map image fails the whole import before anything else is inspected
    /// for that record.
    pub async fn import_backup(&self, payload: &BackupPayload) -> Result<ImportStats> {
        let mut stats = ImportStats::default();

        for map in &payload.maps {
            let record = map.clone().into_record()?;
            if self.insert(Collection::Maps, &record.id, &record).await? {
                stats.maps_imported += 1;
            }
        }

        for wiki in &payload.wikis {
            if self.insert(Collection::MapWikis, &wiki.map_id, wiki).await? {
                stats.wikis_imported += 1;
            }
        }

        for project in &payload.projects {
            if self
                .insert(Collection::DungeonProjects, &project.id, project)
                .await?
            {
                stats.projects_imported += 1;
            }
        }

        // Users additionally keep the username-uniqueness invariant: a
        // record with a fresh id but a taken username is skipped.
        let existing: std::collections::HashMap<String, User> =
            self.get_all(Collection::Users).await?;
        let mut taken: Vec<String> = existing.values().map(|u| u.username.clone()).collect();
        for user in &payload.users {
            if taken.iter().any(|name| name == &user.username) {
                continue;
            }
            if self.insert(Collection::Users, &user.id, user).await? {
                stats.users_imported += 1;
                taken.push(user.username.clone());
            }
        }

        tracing::info!(
            maps = stats.maps_imported,
            wikis = stats.wikis_imported,
            projects = stats.projects_imported,
            users = stats.users_imported,
            "backup imported"
        );
        Ok(stats)
    }
}
