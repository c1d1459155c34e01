//! Connections (undirected edges) and the doors that sit on them.

use serde::{Deserialize, Serialize};
use super::Point;

/// An undirected link between two spaces.
///
/// `from_room`/`to_room` name the endpoints only; direction carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_room: String,
    pub to_room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_id: Option<String>,
    #[serde(default)]
    pub inferred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_room: from.into(),
            to_room: to.into(),
            door_id: None,
            inferred: false,
            connection_type: None,
            confidence: None,
        }
    }

    pub fn with_door(mut self, door_id: impl Into<String>) -> Self {
        self.door_id = Some(door_id.into());
        self
    }

    /// Endpoint pair in canonical order, for unordered comparisons.
    pub fn key(&self) -> (&str, &str) {
        unordered(&self.from_room, &self.to_room)
    }

    pub fn links(&self, a: &str, b: &str) -> bool {
        self.key() == unordered(a, b)
    }
}

/// Order a pair of ids so that `(a, b)` and `(b, a)` compare equal.
pub fn unordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A door placed on the boundary between two spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub position: Point,
    #[serde(default)]
    pub connects: Vec<String>,
    #[serde(default)]
    pub inferred: bool,
}

impl Door {
    pub fn new(id: impl Into<String>, position: Point, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            connects: vec![a.into(), b.into()],
            inferred: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_is_unordered() {
        let c = Connection::new("b", "a");
        assert!(c.links("a", "b"));
        assert!(c.links("b", "a"));
        assert!(!c.links("a", "c"));
        assert_eq!(c.key(), ("a", "b"));
    }

    #[test]
    fn test_connection_defaults_from_json() {
        let c: Connection = serde_json::from_str(r#"{"from_room":"a","to_room":"b"}"#).unwrap();
        assert!(!c.inferred);
        assert!(c.door_id.is_none());
        assert!(c.confidence.is_none());
    }
}
