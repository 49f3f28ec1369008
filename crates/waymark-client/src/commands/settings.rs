//! App settings: a single JSON document in the store's `app_state` table.

use serde::{Deserialize, Serialize};
use tracing::info;

use waymark_shared::constants::DEFAULT_GRID_SIZE;
use waymark_shared::pins::PinCategory;
use waymark_store::session::SETTINGS_KEY;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// UI preferences. Persisted as one JSON row so adding a field never
/// needs a schema migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: String,
    pub grid_size: u32,
    pub snap_to_grid: bool,
    pub default_pin_category: PinCategory,
    pub show_pin_labels: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: true,
            default_pin_category: PinCategory::Location,
            show_pin_labels: true,
        }
    }
}

/// Stored settings, or the defaults when nothing has been saved yet
/// (or the stored JSON no longer parses after a downgrade).
pub async fn get_settings(state: &AppState) -> Result<AppSettings> {
    match state.database.get_app_value(SETTINGS_KEY).await? {
        Some(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
        None => Ok(AppSettings::default()),
    }
}

/// Persist the settings document.
pub async fn update_settings(state: &AppState, settings: &AppSettings) -> Result<()> {
    let json =
        serde_json::to_string(settings).map_err(|e| AppError::Serialization(e.to_string()))?;

    state.database.set_app_value(SETTINGS_KEY, &json).await?;

    info!("settings updated");
    Ok(())
}
