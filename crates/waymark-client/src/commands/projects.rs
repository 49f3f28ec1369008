//! Dungeon sketch commands.

use tracing::info;

use waymark_shared::dungeon::Shape;
use waymark_store::DungeonProject;

use crate::commands::validate_name;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create an empty sketch owned by the current session's user.
pub async fn create_project(state: &AppState, name: &str) -> Result<DungeonProject> {
    let name = validate_name(name)?;

    let mut project = DungeonProject::new(name);
    project.user_id = state.current_user_id().await;

    state.database.save_dungeon_project(&project).await?;

    info!(project_id = %project.id, name = %project.name, "dungeon project created");
    Ok(project)
}

/// Fetch a full sketch.
pub async fn get_project(state: &AppState, id: &str) -> Result<DungeonProject> {
    state
        .database
        .get_dungeon_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {id}")))
}

/// Sketches visible to the current session, newest first.
pub async fn list_projects(state: &AppState) -> Result<Vec<DungeonProject>> {
    let viewer = state.current_user_id().await;

    let mut projects = state.database.list_dungeon_projects().await?;
    projects.retain(|p| p.visible_to(viewer.as_deref()));
    Ok(projects)
}

/// Replace a sketch's shapes wholesale (the editor saves the full list).
pub async fn update_shapes(state: &AppState, id: &str, shapes: Vec<Shape>) -> Result<()> {
    if !state.database.update_project_shapes(id, &shapes).await? {
        return Err(AppError::NotFound(format!("project {id}")));
    }
    Ok(())
}

/// Delete a sketch.
pub async fn delete_project(state: &AppState, id: &str) -> Result<()> {
    if !state.database.delete_dungeon_project(id).await? {
        return Err(AppError::NotFound(format!("project {id}")));
    }
    info!(project_id = %id, "dungeon project deleted");
    Ok(())
}
