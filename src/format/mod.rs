//! # Format Adapters
//!
//! Explicit registry mapping format identifiers to adapters. Adding a
//! format means adding a [`DungeonFormat`] variant and its adapter; there
//! is no runtime discovery.
//!
//! | Id | Adapter | Carries |
//! |----|---------|---------|
//! | `json` | [`JsonAdapter`] | the full document |
//! | `text` | [`TextAdapter`] | geometry, topology, flags, entities |

pub mod json;
pub mod text;

use crate::model::Dungeon;
use crate::{Error, Result};

pub use json::JsonAdapter;
pub use text::{TextAdapter, write_text};

/// Converts between an external representation and [`Dungeon`].
pub trait FormatAdapter: Send + Sync {
    fn id(&self) -> &'static str;

    fn parse(&self, input: &str) -> Result<Dungeon>;

    fn render(&self, dungeon: &Dungeon) -> Result<String>;
}

/// Every supported format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DungeonFormat {
    Json,
    Text,
}

impl DungeonFormat {
    pub const ALL: [DungeonFormat; 2] = [DungeonFormat::Json, DungeonFormat::Text];

    pub fn id(&self) -> &'static str {
        self.adapter().id()
    }

    pub fn from_id(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| Error::UnknownFormat(id.to_string()))
    }

    pub fn adapter(&self) -> &'static dyn FormatAdapter {
        match self {
            DungeonFormat::Json => &JsonAdapter,
            DungeonFormat::Text => &TextAdapter,
        }
    }

    pub fn parse(&self, input: &str) -> Result<Dungeon> {
        self.adapter().parse(input)
    }

    pub fn render(&self, dungeon: &Dungeon) -> Result<String> {
        self.adapter().render(dungeon)
    }
}

impl std::fmt::Display for DungeonFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for DungeonFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_id(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(DungeonFormat::from_id("json").unwrap(), DungeonFormat::Json);
        assert_eq!(DungeonFormat::from_id(" TEXT ").unwrap(), DungeonFormat::Text);
        assert_eq!("text".parse::<DungeonFormat>().unwrap(), DungeonFormat::Text);
    }

    #[test]
    fn test_unknown_id() {
        let err = DungeonFormat::from_id("tmx").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(ref id) if id == "tmx"));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: Vec<&str> = DungeonFormat::ALL.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["json", "text"]);
    }
}
