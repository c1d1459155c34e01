//! Point entities placed on the map.

use serde::{Deserialize, Serialize};
use super::Point;

/// Kind of a point entity. Unknown kinds deserialize as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Treasure,
    Monster,
    Boss,
    Entrance,
    Exit,
    #[serde(other)]
    Other,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Treasure => "treasure",
            ElementKind::Monster => "monster",
            ElementKind::Boss => "boss",
            ElementKind::Entrance => "entrance",
            ElementKind::Exit => "exit",
            ElementKind::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "treasure" => ElementKind::Treasure,
            "monster" => ElementKind::Monster,
            "boss" => ElementKind::Boss,
            "entrance" => ElementKind::Entrance,
            "exit" => ElementKind::Exit,
            _ => ElementKind::Other,
        }
    }

    /// Monsters and bosses both count as hostiles.
    pub fn is_hostile(&self) -> bool {
        matches!(self, ElementKind::Monster | ElementKind::Boss)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A treasure, monster, marker or other entity at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub position: Point,
}

impl GameElement {
    pub fn new(kind: ElementKind, x: f64, y: f64) -> Self {
        Self { kind, position: Point::new(x, y) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_is_other() {
        let e: GameElement = serde_json::from_str(r#"{"type":"trap","position":{"x":1,"y":2}}"#).unwrap();
        assert_eq!(e.kind, ElementKind::Other);
    }

    #[test]
    fn test_kind_parse_matches_serde_names() {
        for kind in [ElementKind::Treasure, ElementKind::Monster, ElementKind::Boss, ElementKind::Entrance, ElementKind::Exit] {
            assert_eq!(ElementKind::parse(kind.as_str()), kind);
        }
        assert!(ElementKind::Boss.is_hostile());
        assert!(!ElementKind::Treasure.is_hostile());
    }
}
