//! Unified JSON document adapter.

use crate::model::Dungeon;
use crate::Result;

use super::FormatAdapter;

/// `{ "header": {...}, "levels": [ {...} ] }`
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    fn id(&self) -> &'static str {
        "json"
    }

    fn parse(&self, input: &str) -> Result<Dungeon> {
        Ok(serde_json::from_str(input)?)
    }

    fn render(&self, dungeon: &Dungeon) -> Result<String> {
        Ok(serde_json::to_string_pretty(dungeon)?)
    }
}
