//! Door distribution: three equally weighted sub-scores.
//!
//! 1. Spread of door counts per room: `1 − min(CV / max_cv, 1)`.
//! 2. Mean door-to-room-center distance per connection (center-to-center
//!    when the connection has no door), as a fraction of the map diagonal,
//!    inverted.
//! 3. Mean per-room entropy of neighbour bearings over four quadrants,
//!    normalized by `ln 4`. Rooms with fewer than two neighbours count as
//!    `low_degree_entropy` nats.
//!
//! NOTE: the low-degree entropy constant is a tuning value kept for score
//! compatibility; it has no derivation from the `ln 4` normalization.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde_json::json;

use crate::config::EngineConfig;
use crate::model::{Dungeon, Level, Point};
use crate::topology::SpaceGraph;

use super::{details, require, stats, QualityRule, Requires, RuleOutcome};

pub struct DoorDistributionRule {
    max_cv: f64,
    low_degree_entropy: f64,
}

impl Default for DoorDistributionRule {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl DoorDistributionRule {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_cv: config.max_door_cv,
            low_degree_entropy: config.low_degree_entropy,
        }
    }

    /// Doors per room from the door list, or connection ends when the
    /// level has no doors.
    fn door_counts(level: &Level, graph: &SpaceGraph<'_>) -> Vec<f64> {
        if level.doors.is_empty() {
            return (0..graph.room_count()).map(|ix| graph.degree(ix) as f64).collect();
        }
        let mut counts = vec![0.0; graph.room_count()];
        for door in &level.doors {
            let mut seen: Vec<usize> = Vec::with_capacity(2);
            for id in &door.connects {
                if let Some(ix) = graph.index_of(id).filter(|&ix| graph.is_room(ix)) {
                    if !seen.contains(&ix) {
                        seen.push(ix);
                        counts[ix] += 1.0;
                    }
                }
            }
        }
        counts
    }

    /// Per-connection door distance, averaged.
    fn mean_door_distance(level: &Level, graph: &SpaceGraph<'_>) -> Option<f64> {
        let distances: Vec<f64> = level
            .connections
            .iter()
            .filter_map(|conn| {
                let a = graph.center(graph.index_of(&conn.from_room)?)?;
                let b = graph.center(graph.index_of(&conn.to_room)?)?;
                let door = conn.door_id.as_deref().and_then(|id| level.door(id));
                Some(match door {
                    Some(door) => (door.position.distance(&a) + door.position.distance(&b)) / 2.0,
                    None => a.distance(&b),
                })
            })
            .collect();
        (!distances.is_empty()).then(|| stats::mean(&distances))
    }

    fn room_entropy(&self, graph: &SpaceGraph<'_>, ix: usize) -> f64 {
        let Some(origin) = graph.center(ix) else {
            return self.low_degree_entropy;
        };
        let bearings: Vec<Point> = graph
            .neighbors(ix)
            .iter()
            .filter_map(|&n| graph.center(n))
            .collect();
        if bearings.len() < 2 {
            return self.low_degree_entropy;
        }
        let mut quadrants = [0usize; 4];
        for p in &bearings {
            quadrants[quadrant(&origin, p)] += 1;
        }
        stats::shannon_entropy(&quadrants)
    }
}

/// Compass quadrant 0..=3 of `to` as seen from `from`, counter-clockwise from +x.
fn quadrant(from: &Point, to: &Point) -> usize {
    let angle = (to.y - from.y).atan2(to.x - from.x).rem_euclid(TAU);
    ((angle / FRAC_PI_2) as usize).min(3)
}

impl QualityRule for DoorDistributionRule {
    fn name(&self) -> &'static str {
        "door_distribution"
    }

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome {
        let level = match require(self.name(), dungeon, Requires::Connections) {
            Ok(level) => level,
            Err(outcome) => return outcome,
        };
        let graph = SpaceGraph::from_level(level);

        let counts = Self::door_counts(level, &graph);
        let door_cv = stats::coefficient_of_variation(&counts);
        let count_score = 1.0 - (door_cv / self.max_cv).min(1.0);

        let diagonal = level.map_bounds().map(|b| b.diagonal()).unwrap_or(0.0);
        let mean_distance = Self::mean_door_distance(level, &graph);
        let normalized_distance = match mean_distance {
            Some(d) if diagonal > stats::EPSILON => (d / diagonal).min(1.0),
            _ => 0.0,
        };
        let distance_score = 1.0 - normalized_distance;

        let entropies: Vec<f64> = (0..graph.room_count()).map(|ix| self.room_entropy(&graph, ix)).collect();
        let mean_entropy = stats::mean(&entropies);
        let entropy_score = (mean_entropy / 4f64.ln()).clamp(0.0, 1.0);

        let score = (count_score + distance_score + entropy_score) / 3.0;

        RuleOutcome::scored(
            score,
            details(json!({
                "door_counts": counts,
                "door_count_cv": door_cv,
                "count_score": count_score,
                "mean_door_distance": mean_distance,
                "map_diagonal": diagonal,
                "distance_score": distance_score,
                "mean_entropy": mean_entropy,
                "entropy_score": entropy_score,
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Door, Room};

    #[test]
    fn test_quadrants() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(quadrant(&o, &Point::new(1.0, 0.5)), 0);
        assert_eq!(quadrant(&o, &Point::new(-1.0, 0.5)), 1);
        assert_eq!(quadrant(&o, &Point::new(-1.0, -0.5)), 2);
        assert_eq!(quadrant(&o, &Point::new(1.0, -0.5)), 3);
    }

    fn plus_shape() -> Level {
        // hub with four spokes, one per quadrant
        Level::new()
            .with_room(Room::new("hub", 0.0, 0.0, 2.0, 2.0))
            .with_room(Room::new("ne", 10.0, 5.0, 2.0, 2.0))
            .with_room(Room::new("nw", -10.0, 5.0, 2.0, 2.0))
            .with_room(Room::new("sw", -10.0, -5.0, 2.0, 2.0))
            .with_room(Room::new("se", 10.0, -5.0, 2.0, 2.0))
            .with_connection("hub", "ne")
            .with_connection("hub", "nw")
            .with_connection("hub", "sw")
            .with_connection("hub", "se")
    }

    #[test]
    fn test_hub_entropy_is_maximal() {
        let level = plus_shape();
        let graph = SpaceGraph::from_level(&level);
        let rule = DoorDistributionRule::default();
        assert!((rule.room_entropy(&graph, 0) - 4f64.ln()).abs() < 1e-12);
        assert_eq!(rule.room_entropy(&graph, 1), 0.1);
    }

    #[test]
    fn test_counts_from_connections_without_doors() {
        let level = plus_shape();
        let graph = SpaceGraph::from_level(&level);
        assert_eq!(DoorDistributionRule::door_counts(&level, &graph), vec![4.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_counts_from_door_list() {
        let level = plus_shape()
            .with_door(Door::new("d1", Point::new(5.0, 3.0), "hub", "ne"))
            .with_door(Door::new("d2", Point::new(-5.0, 3.0), "hub", "nw"));
        let graph = SpaceGraph::from_level(&level);
        assert_eq!(DoorDistributionRule::door_counts(&level, &graph), vec![2.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_door_distance_uses_door_position() {
        let level = Level::new()
            .with_room(Room::new("a", 0.0, 0.0, 2.0, 2.0))
            .with_room(Room::new("b", 10.0, 0.0, 2.0, 2.0))
            .with_door(Door::new("d", Point::new(6.0, 1.0), "a", "b"));
        let mut level = level;
        level.connections.push(crate::model::Connection::new("a", "b").with_door("d"));
        let graph = SpaceGraph::from_level(&level);
        // centers (1,1) and (11,1), door at (6,1)
        assert_eq!(DoorDistributionRule::mean_door_distance(&level, &graph), Some(5.0));
    }

    #[test]
    fn test_score_is_average_of_parts() {
        let outcome = DoorDistributionRule::default().evaluate(&Dungeon::single(plus_shape()));
        let parts = outcome.detail_f64("count_score").unwrap()
            + outcome.detail_f64("distance_score").unwrap()
            + outcome.detail_f64("entropy_score").unwrap();
        assert!((outcome.score - parts / 3.0).abs() < 1e-12);
        assert!(outcome.score > 0.0 && outcome.score < 1.0);
    }
}
