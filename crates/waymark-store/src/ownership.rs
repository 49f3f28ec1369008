//! One-time ownership backfill for records created before accounts existed.
//!
//! Early versions of the app had no accounts, so maps and sketches were
//! stored without an owner. When a user signs up on such a library, the
//! backfill stamps their id onto every unowned record and marks it
//! private. Already-owned records are skipped, so running it again (or
//! on two accounts in sequence) never reassigns anything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::database::{Collection, Database};
use crate::error::Result;
use crate::models::{DungeonProject, MapRecord};

/// Outcome of an ownership backfill pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnershipReport {
    /// True when every migrated record was written cleanly.
    pub success: bool,
    pub migrated_maps: usize,
    pub migrated_projects: usize,
    /// One entry per record that failed to write; the pass continues past
    /// failures so one bad record cannot block the rest.
    pub errors: Vec<String>,
}

impl Database {
    /// Assign every unowned map and dungeon sketch to `user_id`, marking
    /// each one private.
    ///
    /// Failures while writing individual records are collected into the
    /// report rather than aborting the scan; `success` is true only when
    /// `errors` is empty. A failure to read a collection at all is a real
    /// error and aborts.
    pub async fn claim_unowned_records(&self, user_id: &str) -> Result<OwnershipReport> {
        let mut report = OwnershipReport::default();

        let maps: HashMap<String, MapRecord> = self.get_all(Collection::Maps).await?;
        for (key, mut map) in maps {
            if map.user_id.is_some() {
                continue;
            }
            map.user_id = Some(user_id.to_string());
            map.is_public = false;
            match self.put(Collection::Maps, &key, &map).await {
                Ok(()) => report.migrated_maps += 1,
                Err(e) => report.errors.push(format!("map {key}: {e}")),
            }
        }

        let projects: HashMap<String, DungeonProject> =
            self.get_all(Collection::DungeonProjects).await?;
        for (key, mut project) in projects {
            if project.user_id.is_some() {
                continue;
            }
            project.user_id = Some(user_id.to_string());
            project.is_public = false;
            match self.put(Collection::DungeonProjects, &key, &project).await {
                Ok(()) => report.migrated_projects += 1,
                Err(e) => report.errors.push(format!("project {key}: {e}")),
            }
        }

        report.success = report.errors.is_empty();

        tracing::info!(
            user_id = %user_id,
            maps = report.migrated_maps,
            projects = report.migrated_projects,
            errors = report.errors.len(),
            "ownership backfill finished"
        );
        Ok(report)
    }
}
