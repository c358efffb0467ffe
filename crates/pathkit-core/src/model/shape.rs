use serde::{Deserialize, Serialize};

use super::{new_id, Point};

/// How the path must relate to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// The path must stay outside.
    #[default]
    Obstacle,
    /// The path must stay inside.
    KeepIn,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Obstacle => write!(f, "obstacle"),
            Self::KeepIn => write!(f, "keep-in"),
        }
    }
}

/// A simple polygon on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub vertices: Vec<Point>,
    #[serde(default)]
    pub kind: ShapeKind,
    #[serde(default)]
    pub locked: bool,
}

impl Shape {
    pub fn new(vertices: Vec<Point>, kind: ShapeKind) -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            vertices,
            kind,
            locked: false,
        }
    }

    pub fn obstacle(vertices: Vec<Point>) -> Self {
        Self::new(vertices, ShapeKind::Obstacle)
    }

    pub fn keep_in(vertices: Vec<Point>) -> Self {
        Self::new(vertices, ShapeKind::KeepIn)
    }

    /// Axis-aligned rectangle helper.
    pub fn rectangle(min: Point, max: Point, kind: ShapeKind) -> Self {
        Self::new(
            vec![
                Point::new(min.x, min.y),
                Point::new(max.x, min.y),
                Point::new(max.x, max.y),
                Point::new(min.x, max.y),
            ],
            kind,
        )
    }

    /// A polygon needs at least three vertices to bound an area.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde() {
        assert_eq!(
            serde_json::to_string(&ShapeKind::KeepIn).unwrap(),
            "\"keep-in\""
        );
        let kind: ShapeKind = serde_json::from_str("\"obstacle\"").unwrap();
        assert_eq!(kind, ShapeKind::Obstacle);
    }

    #[test]
    fn test_validity() {
        let degenerate = Shape::obstacle(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(!degenerate.is_valid());
        let rect = Shape::rectangle(Point::new(0.0, 0.0), Point::new(2.0, 2.0), ShapeKind::KeepIn);
        assert!(rect.is_valid());
        assert_eq!(rect.vertices.len(), 4);
    }
}
