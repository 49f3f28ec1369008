//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize`; records are stored
//! as bincode blobs keyed by their `id`, and can be handed directly to a
//! UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waymark_shared::dungeon::Shape;
use waymark_shared::pins::PinData;
use waymark_shared::wiki::WikiCategory;

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// An uploaded map image together with its annotations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapRecord {
    /// Unique map identifier (UUID v4).
    pub id: String,
    /// Display name, non-empty.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Raw image bytes exactly as uploaded (PNG/JPEG/WebP). The store never
    /// decodes or re-encodes them.
    pub image: Vec<u8>,
    /// Pin annotations. Labels are unique per map and kept contiguous.
    pub pins: Vec<PinData>,
    /// Owning user, once the record has been claimed by an account.
    /// Records created before accounts existed have no owner.
    pub user_id: Option<String>,
    /// Whether accounts other than the owner may see this map.
    pub is_public: bool,
    /// When the map was first saved.
    pub created_at: DateTime<Utc>,
    /// Last modification of any part of the record.
    pub updated_at: DateTime<Utc>,
}

impl MapRecord {
    /// Build a fresh, unowned, private map with no pins.
    pub fn new(name: impl Into<String>, image: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            image,
            pins: Vec::new(),
            user_id: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Visibility rule: owners always see their own maps; public and
    /// unowned maps are visible to everyone, signed in or not.
    pub fn visible_to(&self, viewer: Option<&str>) -> bool {
        visible(self.user_id.as_deref(), self.is_public, viewer)
    }

    /// Slim listing row for this map.
    pub fn summary(&self) -> MapSummary {
        MapSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }
}

/// Listing row returned by `list_maps`: enough to render a gallery tile
/// without dragging the pin list along.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Vec<u8>,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A local account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier (UUID v4).
    pub id: String,
    /// Login name, unique across the store (exact match).
    pub username: String,
    /// Contact email. Stored verbatim, never validated beyond non-empty.
    pub email: String,
    /// Argon2id hash in PHC string format. Never handed to the UI layer.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Map wiki
// ---------------------------------------------------------------------------

/// One article in a map's wiki.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WikiSection {
    /// Unique section identifier (UUID v4).
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: WikiCategory,
    pub tags: Vec<String>,
    /// Pin labels this section refers to. Not validated against the map's
    /// pin list; dangling labels are tolerated at read time.
    pub linked_pin_ids: Vec<String>,
}

/// The wiki document attached to one map, stored under the map's id.
///
/// Maps start with no wiki row at all; the first section write creates
/// one. Deleting a map leaves its wiki behind under the old key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapWiki {
    /// Id of the owning map.
    pub map_id: String,
    pub sections: Vec<WikiSection>,
    /// Category catalog for this wiki, seeded from the standard set.
    pub categories: Vec<WikiCategory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MapWiki {
    /// An empty wiki with the standard categories, the value readers see
    /// for maps that have never had a section.
    pub fn empty(map_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            map_id: map_id.into(),
            sections: Vec::new(),
            categories: WikiCategory::standard(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-wise update for a wiki section; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiSectionPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<WikiCategory>,
    pub tags: Option<Vec<String>>,
    pub linked_pin_ids: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Dungeon project
// ---------------------------------------------------------------------------

/// A dungeon sketch: a named collection of vector shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DungeonProject {
    /// Unique project identifier (UUID v4).
    pub id: String,
    /// Display name, non-empty.
    pub name: String,
    /// Drawn shapes, in paint order.
    pub shapes: Vec<Shape>,
    /// Owning user, once claimed. Same ownership model as maps.
    pub user_id: Option<String>,
    /// Whether other accounts may see this sketch.
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DungeonProject {
    /// Build a fresh, unowned, private sketch with no shapes.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            shapes: Vec::new(),
            user_id: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Same visibility rule as [`MapRecord::visible_to`].
    pub fn visible_to(&self, viewer: Option<&str>) -> bool {
        visible(self.user_id.as_deref(), self.is_public, viewer)
    }
}

fn visible(owner: Option<&str>, is_public: bool, viewer: Option<&str>) -> bool {
    match owner {
        None => true,
        Some(owner) => is_public || viewer == Some(owner),
    }
}
