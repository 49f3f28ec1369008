//! Vector shapes for the dungeon sketch editor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point in map space.
///
/// The editor snaps points to its grid before saving; the store keeps
/// whatever coordinates it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a shape represents on the sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Wall,
    Room,
    Door,
    Freehand,
}

/// One drawn element of a dungeon sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: String,
    pub kind: ShapeKind,
    pub points: Vec<GridPoint>,
    pub color: String,
}

impl Shape {
    pub fn new(kind: ShapeKind, points: Vec<GridPoint>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            points,
            color: "#333333".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shapes_get_distinct_ids() {
        let a = Shape::new(ShapeKind::Wall, vec![GridPoint::new(0.0, 0.0)]);
        let b = Shape::new(ShapeKind::Wall, vec![GridPoint::new(0.0, 0.0)]);
        assert_ne!(a.id, b.id);
    }
}
