//! Map commands: upload, listing, annotation editing, drill-down links.

use std::collections::HashMap;

use tracing::info;

use waymark_shared::constants::MAX_MAP_IMAGE_SIZE;
use waymark_shared::pins::{self, PinData, CATALOG_VERSION};
use waymark_store::maps::MapLink;
use waymark_store::session::PIN_CATALOG_VERSION_KEY;
use waymark_store::{Collection, MapRecord, MapSummary};

use crate::commands::validate_name;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create a map from an uploaded image.
///
/// The record is owned by the current session's user (or unowned for an
/// anonymous session) and starts private with no pins.
pub async fn upload_map(
    state: &AppState,
    name: &str,
    description: Option<&str>,
    image: Vec<u8>,
) -> Result<MapRecord> {
    let name = validate_name(name)?;
    if image.is_empty() {
        return Err(AppError::Validation("map image must not be empty".into()));
    }
    if image.len() > MAX_MAP_IMAGE_SIZE {
        return Err(AppError::Validation(format!(
            "map image larger than {MAX_MAP_IMAGE_SIZE} bytes"
        )));
    }

    let mut record = MapRecord::new(name, image);
    record.description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    record.user_id = state.current_user_id().await;

    state.database.save_map(&record).await?;

    info!(map_id = %record.id, name = %record.name, "map uploaded");
    Ok(record)
}

/// Fetch a full map record.
pub async fn get_map(state: &AppState, id: &str) -> Result<MapRecord> {
    state
        .database
        .get_map_record(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("map {id}")))
}

/// Maps visible to the current session, newest first: own maps plus
/// public and unowned ones.
pub async fn list_maps(state: &AppState) -> Result<Vec<MapSummary>> {
    let viewer = state.current_user_id().await;

    let mut records: Vec<MapRecord> = state
        .database
        .get_all::<MapRecord>(Collection::Maps)
        .await?
        .into_values()
        .filter(|m| m.visible_to(viewer.as_deref()))
        .collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(records.iter().map(MapRecord::summary).collect())
}

/// Rename / re-describe a map. Image, pins and ownership are untouched.
pub async fn update_map_details(
    state: &AppState,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<()> {
    let name = validate_name(name)?;
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    if !state.database.update_map_meta(id, name, description).await? {
        return Err(AppError::NotFound(format!("map {id}")));
    }
    Ok(())
}

/// Replace a map's pin list wholesale. The pin editor saves the whole
/// list; there is no per-pin merge.
pub async fn replace_pins(state: &AppState, id: &str, pins: Vec<PinData>) -> Result<()> {
    if !state.database.update_map_pins(id, &pins).await? {
        return Err(AppError::NotFound(format!("map {id}")));
    }
    Ok(())
}

/// Drop a new pin at `(x, y)`.
///
/// The pin gets the next contiguous label and a value copy of the chosen
/// catalog type; later catalog edits will not touch it.
pub async fn place_pin(
    state: &AppState,
    map_id: &str,
    x: f64,
    y: f64,
    pin_type_id: &str,
) -> Result<PinData> {
    let mut map = get_map(state, map_id).await?;

    let Some(pin_type) = pins::pin_type_by_id(pin_type_id) else {
        return Err(AppError::Validation(format!(
            "unknown pin type '{pin_type_id}'"
        )));
    };

    let pin = PinData::new(pins::next_label(&map.pins), x, y, pin_type);
    map.pins.push(pin.clone());
    if !state.database.update_map_pins(map_id, &map.pins).await? {
        return Err(AppError::NotFound(format!("map {map_id}")));
    }

    info!(map_id = %map_id, label = %pin.label, "pin placed");
    Ok(pin)
}

/// Remove a pin by label. Remaining pins are renumbered from "1"; the
/// renumbered list is returned.
pub async fn remove_pin(state: &AppState, map_id: &str, label: &str) -> Result<Vec<PinData>> {
    let mut map = get_map(state, map_id).await?;

    if !pins::remove_pin(&mut map.pins, label) {
        return Err(AppError::NotFound(format!("pin '{label}' on map {map_id}")));
    }
    if !state.database.update_map_pins(map_id, &map.pins).await? {
        return Err(AppError::NotFound(format!("map {map_id}")));
    }

    info!(map_id = %map_id, label = %label, "pin removed");
    Ok(map.pins)
}

/// Point a pin at another map, or clear the link with `None`.
///
/// A link target must exist when the link is made; if the target is
/// deleted later the link dangles and readers render it as missing.
pub async fn link_pin(
    state: &AppState,
    map_id: &str,
    label: &str,
    target_map_id: Option<&str>,
) -> Result<()> {
    if let Some(target) = target_map_id {
        if state.database.get_map_record(target).await?.is_none() {
            return Err(AppError::NotFound(format!("map {target}")));
        }
    }

    let mut map = get_map(state, map_id).await?;
    let Some(pin) = map.pins.iter_mut().find(|p| p.label == label) else {
        return Err(AppError::NotFound(format!("pin '{label}' on map {map_id}")));
    };
    pin.linked_map_id = target_map_id.map(str::to_string);

    if !state.database.update_map_pins(map_id, &map.pins).await? {
        return Err(AppError::NotFound(format!("map {map_id}")));
    }
    Ok(())
}

/// Delete a map. Dangling pin links from other maps and the map's wiki
/// are left behind untouched.
pub async fn delete_map(state: &AppState, id: &str) -> Result<()> {
    if !state.database.delete_map(id).await? {
        return Err(AppError::NotFound(format!("map {id}")));
    }
    info!(map_id = %id, "map deleted");
    Ok(())
}

/// Every map that links down into `id`, for breadcrumb navigation.
pub async fn parent_maps(state: &AppState, id: &str) -> Result<Vec<MapLink>> {
    Ok(state.database.get_parent_maps(id).await?)
}

/// Whether the library was last refreshed against an older pin catalog
/// than the one this build ships.
pub async fn pin_catalog_is_stale(state: &AppState) -> Result<bool> {
    let applied = state
        .database
        .get_app_value(PIN_CATALOG_VERSION_KEY)
        .await?
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);
    Ok(applied < CATALOG_VERSION)
}

/// Re-copy the shipped catalog onto every map's pins and remember the
/// catalog version.
///
/// Placed pins hold value copies of their type, so a catalog update does
/// nothing until the user runs this explicit migration. Returns how many
/// pins were rewritten.
pub async fn refresh_pin_catalog(state: &AppState) -> Result<usize> {
    let catalog = pins::default_pin_types();
    let maps: HashMap<String, MapRecord> =
        state.database.get_all(Collection::Maps).await?;

    let mut rewritten = 0;
    for (id, mut map) in maps {
        let updated = pins::refresh_pin_types(&mut map.pins, &catalog);
        if updated > 0 {
            state.database.update_map_pins(&id, &map.pins).await?;
            rewritten += updated;
        }
    }

    state
        .database
        .set_app_value(PIN_CATALOG_VERSION_KEY, &CATALOG_VERSION.to_string())
        .await?;

    info!(pins = rewritten, catalog_version = CATALOG_VERSION, "pin catalog refreshed");
    Ok(rewritten)
}
