//! # waymark-shared
//!
//! Domain value types shared by the Waymark store and client crates:
//! pin annotations and their type catalog, wiki categories, and the
//! vector shapes used by the dungeon sketch editor.
//!
//! Everything here is plain data. I/O and persistence live in
//! `waymark-store`.

pub mod constants;
pub mod dungeon;
pub mod pins;
pub mod wiki;

pub use dungeon::{GridPoint, Shape, ShapeKind};
pub use pins::{PinCategory, PinData, PinSection, PinType};
pub use wiki::WikiCategory;
