//! CRUD for [`DungeonProject`] sketches.
//!
//! Mirrors the map repository: whole-record saves, wholesale shape-list
//! replacement, listing sorted newest first.

use chrono::Utc;

use waymark_shared::dungeon::Shape;

use crate::database::{Collection, Database};
use crate::error::Result;
use crate::models::DungeonProject;

impl Database {
    /// Store `project` under its id, creating or overwriting.
    pub async fn save_dungeon_project(&self, project: &DungeonProject) -> Result<()> {
        self.put(Collection::DungeonProjects, &project.id, project)
            .await
    }

    /// Fetch a single sketch. Absent ids are `Ok(None)`.
    pub async fn get_dungeon_project(&self, id: &str) -> Result<Option<DungeonProject>> {
        self.get(Collection::DungeonProjects, id).await
    }

    /// List every sketch, newest first.
    pub async fn list_dungeon_projects(&self) -> Result<Vec<DungeonProject>> {
        let mut projects: Vec<DungeonProject> = self
            .get_all(Collection::DungeonProjects)
            .await?
            .into_values()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    /// Replace a sketch's shape list wholesale.
    ///
    /// Returns `false` when no project is stored at `id`.
    pub async fn update_project_shapes(&self, id: &str, shapes: &[Shape]) -> Result<bool> {
        let Some(mut project) = self.get_dungeon_project(id).await? else {
            return Ok(false);
        };

        project.shapes = shapes.to_vec();
        project.updated_at = Utc::now();
        self.put(Collection::DungeonProjects, id, &project).await?;
        Ok(true)
    }

    /// Delete a sketch by id. Returns `true` if a record was removed.
    pub async fn delete_dungeon_project(&self, id: &str) -> Result<bool> {
        self.delete(Collection::DungeonProjects, id).await
    }
}
