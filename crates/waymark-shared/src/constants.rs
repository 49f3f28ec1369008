//! Shared constants used across Waymark crates.

/// Maximum accepted map image size (25 MiB)
pub const MAX_MAP_IMAGE_SIZE: usize = 25 * 1024 * 1024;

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 8;

/// Default dungeon editor grid cell size, in map pixels
pub const DEFAULT_GRID_SIZE: u32 = 32;

/// Maximum length of a map or project name
pub const MAX_NAME_LEN: usize = 120;
