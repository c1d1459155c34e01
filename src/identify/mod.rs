//! # Entrance / Exit Identification
//!
//! Assigns at most one entrance room and one exit room by walking an
//! ordered list of [`ResolutionStrategy`] objects. Each strategy only
//! fills roles the earlier ones left open:
//!
//! | Order | Strategy | Resolves |
//! |-------|----------|----------|
//! | 1 | `explicit_flags` | rooms already flagged `is_entrance` / `is_exit` |
//! | 2 | `element_markers` | room nearest an `entrance` / `exit` game element |
//! | 3 | `boss_room` | exit: best-ranked boss room reachable from the entrance |
//! | 4 | `topology` | degree-1 rooms, then minimum-degree rooms |
//! | 5 | `spatial` | min / max `x + y` of room centers |
//!
//! Resolution is deterministic: every tie breaks toward the room declared
//! first.

mod boss;
mod strategies;

use serde::Serialize;
use tracing::debug;

use crate::model::Level;
use crate::topology::{NodeIx, SpaceGraph};

pub use boss::{boss_priority, rank_boss_candidates};
pub use strategies::{BossRoom, ElementMarkers, ExplicitFlags, SpatialExtremes, Topology};

/// Shared read-only view handed to every strategy.
pub struct IdentifyContext<'a> {
    pub level: &'a Level,
    /// Rooms occupy node indices `0..level.rooms.len()`.
    pub graph: SpaceGraph<'a>,
}

impl<'a> IdentifyContext<'a> {
    pub fn new(level: &'a Level) -> Self {
        Self { level, graph: SpaceGraph::from_level(level) }
    }

    pub fn room_count(&self) -> usize {
        self.level.rooms.len()
    }

    /// BFS reachability between two rooms over the full space graph.
    pub fn reachable(&self, from: NodeIx, to: NodeIx) -> bool {
        self.graph.is_reachable(from, to)
    }
}

/// Roles resolved so far, as room indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub entrance: Option<NodeIx>,
    pub exit: Option<NodeIx>,
    pub entrance_by: Option<&'static str>,
    pub exit_by: Option<&'static str>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.entrance.is_some() && self.exit.is_some()
    }

    /// First writer wins; later calls are ignored.
    pub fn set_entrance(&mut self, room: NodeIx, by: &'static str) {
        if self.entrance.is_none() {
            self.entrance = Some(room);
            self.entrance_by = Some(by);
        }
    }

    pub fn set_exit(&mut self, room: NodeIx, by: &'static str) {
        if self.exit.is_none() {
            self.exit = Some(room);
            self.exit_by = Some(by);
        }
    }
}

/// One stage of the cascade.
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fill any open role it can. Must not overwrite resolved roles.
    fn attempt(&self, ctx: &IdentifyContext<'_>, resolution: &mut Resolution);
}

/// Result of identification, by room id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identification {
    pub entrance: Option<String>,
    pub exit: Option<String>,
    pub entrance_strategy: Option<&'static str>,
    pub exit_strategy: Option<&'static str>,
}

impl Identification {
    /// Both roles resolved to distinct rooms.
    pub fn is_complete(&self) -> bool {
        match (&self.entrance, &self.exit) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}

/// Ordered strategy cascade.
pub struct EntranceExitIdentifier {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl Default for EntranceExitIdentifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl EntranceExitIdentifier {
    /// The five-stage cascade.
    pub fn standard() -> Self {
        Self::with_strategies(vec![
            Box::new(ExplicitFlags),
            Box::new(ElementMarkers),
            Box::new(BossRoom),
            Box::new(Topology),
            Box::new(SpatialExtremes),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the cascade without touching the level.
    pub fn resolve(&self, level: &Level) -> Identification {
        let ctx = IdentifyContext::new(level);
        let mut resolution = Resolution::default();

        for strategy in &self.strategies {
            if resolution.is_complete() {
                break;
            }
            strategy.attempt(&ctx, &mut resolution);
        }

        let room_id = |ix: Option<NodeIx>| ix.map(|i| level.rooms[i].id.clone());
        let identification = Identification {
            entrance: room_id(resolution.entrance),
            exit: room_id(resolution.exit),
            entrance_strategy: resolution.entrance_by,
            exit_strategy: resolution.exit_by,
        };

        debug!(
            "Identified entrance={:?} via {:?}, exit={:?} via {:?}",
            identification.entrance,
            identification.entrance_strategy,
            identification.exit,
            identification.exit_strategy
        );
        identification
    }

    /// Resolve, then rewrite room flags so at most one room carries each.
    pub fn identify(&self, level: &mut Level) -> Identification {
        let identification = self.resolve(level);
        for room in &mut level.rooms {
            room.is_entrance = identification.entrance.as_deref() == Some(room.id.as_str());
            room.is_exit = identification.exit.as_deref() == Some(room.id.as_str());
        }
        identification
    }
}

/// Identify with the standard cascade, mutating the level's flags.
pub fn identify_entrance_exit(level: &mut Level) -> Identification {
    EntranceExitIdentifier::standard().identify(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Room;

    fn chain(names: &[&str]) -> Level {
        let mut level = Level::new();
        for (i, name) in names.iter().enumerate() {
            level = level.with_room(Room::new(*name, i as f64 * 10.0, 0.0, 5.0, 5.0));
        }
        for pair in names.windows(2) {
            level = level.with_connection(pair[0], pair[1]);
        }
        level
    }

    #[test]
    fn test_standard_order() {
        assert_eq!(
            EntranceExitIdentifier::standard().strategy_names(),
            vec!["explicit_flags", "element_markers", "boss_room", "topology", "spatial"]
        );
    }

    #[test]
    fn test_chain_resolves_ends() {
        let mut level = chain(&["a", "b", "c", "d"]);
        let id = identify_entrance_exit(&mut level);
        assert_eq!(id.entrance.as_deref(), Some("a"));
        assert_eq!(id.exit.as_deref(), Some("d"));
        assert_eq!(id.entrance_strategy, Some("topology"));
        assert!(level.rooms[0].is_entrance);
        assert!(level.rooms[3].is_exit);
    }

    #[test]
    fn test_stale_flags_are_cleared() {
        let mut level = chain(&["a", "b", "c"]);
        level.rooms[1].is_entrance = true;
        level.rooms[2].is_exit = true;
        level.rooms[0].is_exit = true;
        let id = identify_entrance_exit(&mut level);
        assert_eq!(id.entrance.as_deref(), Some("b"));
        assert_eq!(id.exit.as_deref(), Some("a"));
        assert_eq!(level.rooms.iter().filter(|r| r.is_entrance).count(), 1);
        assert_eq!(level.rooms.iter().filter(|r| r.is_exit).count(), 1);
    }

    #[test]
    fn test_empty_level_resolves_nothing() {
        let mut level = Level::new();
        let id = identify_entrance_exit(&mut level);
        assert_eq!(id, Identification::default());
        assert!(!id.is_complete());
    }

    #[test]
    fn test_custom_cascade() {
        let identifier = EntranceExitIdentifier::with_strategies(vec![Box::new(SpatialExtremes)]);
        let id = identifier.resolve(&chain(&["a", "b"]));
        assert_eq!(id.entrance_strategy, Some("spatial"));
        assert_eq!(id.exit.as_deref(), Some("b"));
    }
}
