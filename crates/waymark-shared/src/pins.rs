//! Pin annotations and the pin type catalog.
//!
//! A pin embeds a full copy of its [`PinType`] at placement time. Later
//! catalog edits never rewrite pins already on a map; callers that want
//! the new catalog applied run [`refresh_pin_types`] explicitly.

use serde::{Deserialize, Serialize};

/// Bumped whenever the built-in catalog changes.
pub const CATALOG_VERSION: u32 = 1;

/// Grouping for pin types, mostly drives icon palettes in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinCategory {
    Location,
    Encounter,
    Npc,
    Treasure,
    Hazard,
    Custom,
}

/// Catalog entry describing how a family of pins is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinType {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub category: PinCategory,
}

/// Free-text block attached to a pin beyond its main `info` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinSection {
    pub title: String,
    pub content: String,
}

/// A labeled point annotation on a map.
///
/// Labels are decimal strings ("1", "2", ...) kept contiguous per map:
/// [`remove_pin`] renumbers the survivors. Coordinates are in map image
/// pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinData {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub info: String,
    pub area_name: String,
    pub extra_sections: Vec<PinSection>,
    /// Map this pin drills down into. The target may have been deleted
    /// since the link was made; readers treat a missing target as a
    /// dangling link, not as corruption.
    pub linked_map_id: Option<String>,
    pub tags: Vec<String>,
    /// Value copy of the catalog entry chosen at placement time.
    pub pin_type: PinType,
}

impl PinData {
    pub fn new(label: impl Into<String>, x: f64, y: f64, pin_type: PinType) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            info: String::new(),
            area_name: String::new(),
            extra_sections: Vec::new(),
            linked_map_id: None,
            tags: Vec::new(),
            pin_type,
        }
    }
}

/// The built-in pin type catalog.
pub fn default_pin_types() -> Vec<PinType> {
    fn entry(id: &str, name: &str, icon: &str, color: &str, category: PinCategory) -> PinType {
        PinType {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            category,
        }
    }

    vec![
        entry("location", "Location", "map-marker", "#2f80ed", PinCategory::Location),
        entry("encounter", "Encounter", "crossed-swords", "#eb5757", PinCategory::Encounter),
        entry("npc", "NPC", "person", "#9b51e0", PinCategory::Npc),
        entry("treasure", "Treasure", "chest", "#f2c94c", PinCategory::Treasure),
        entry("hazard", "Hazard", "warning", "#f2994a", PinCategory::Hazard),
        entry("custom", "Custom", "star", "#828282", PinCategory::Custom),
    ]
}

/// Look up a catalog entry by id.
pub fn pin_type_by_id(id: &str) -> Option<PinType> {
    default_pin_types().into_iter().find(|t| t.id == id)
}

/// Label for the next pin placed on a map.
///
/// With contiguous labels this is just `len + 1`; if a caller has stored
/// a hand-edited list, collisions are skipped so the result stays unique.
pub fn next_label(pins: &[PinData]) -> String {
    let mut n = pins.len() + 1;
    while pins.iter().any(|p| p.label == n.to_string()) {
        n += 1;
    }
    n.to_string()
}

/// Renumber labels contiguously from "1", preserving order.
pub fn relabel(pins: &mut [PinData]) {
    for (i, pin) in pins.iter_mut().enumerate() {
        pin.label = (i + 1).to_string();
    }
}

/// Remove the pin with `label` and renumber the remainder.
///
/// Returns `false` (and leaves the list untouched) when no pin carries
/// that label.
pub fn remove_pin(pins: &mut Vec<PinData>, label: &str) -> bool {
    let before = pins.len();
    pins.retain(|p| p.label != label);
    if pins.len() == before {
        return false;
    }
    relabel(pins);
    true
}

/// Re-copy catalog entries onto pins whose `pin_type.id` matches.
///
/// This is the explicit migration path for catalog changes; pins whose
/// type id is not in `catalog` keep their embedded copy. Returns how
/// many pins were rewritten.
pub fn refresh_pin_types(pins: &mut [PinData], catalog: &[PinType]) -> usize {
    let mut updated = 0;
    for pin in pins.iter_mut() {
        if let Some(entry) = catalog.iter().find(|t| t.id == pin.pin_type.id) {
            if pin.pin_type != *entry {
                pin.pin_type = entry.clone();
                updated += 1;
            }
        }
    }
    updated
}
