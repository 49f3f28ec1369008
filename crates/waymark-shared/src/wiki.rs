//! Wiki section categories.

use serde::{Deserialize, Serialize};

/// Category a wiki section is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WikiCategory {
    General,
    History,
    Locations,
    Npcs,
    Quests,
    Lore,
}

impl WikiCategory {
    /// The standard catalog every new wiki starts with, in display order.
    pub fn standard() -> Vec<WikiCategory> {
        vec![
            WikiCategory::General,
            WikiCategory::History,
            WikiCategory::Locations,
            WikiCategory::Npcs,
            WikiCategory::Quests,
            WikiCategory::Lore,
        ]
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WikiCategory::General => "General",
            WikiCategory::History => "History",
            WikiCategory::Locations => "Locations",
            WikiCategory::Npcs => "NPCs",
            WikiCategory::Quests => "Quests",
            WikiCategory::Lore => "Lore",
        }
    }
}
