//! Key path length: how long the critical entrance→exit route is relative
//! to the span of the level.
//!
//! With an identified entrance and exit the score is
//! `raw_length / diameter`, where `diameter` is the larger of the farthest
//! BFS distance from the entrance and `raw_length` itself.
//!
//! Without them the rule falls back to multi-center radial aggregation:
//!
//! ```text
//!   candidates ─► eccentricity ─► centers (ecc ≤ min+1, ≤3)
//!        │                            │
//!   (>cutoff nodes: top third         ▼
//!    by degree only)          ≤3 periphery nodes each
//!                                     │
//!            weight 1/(ecc+0.1) ◄─────┘
//!                     │
//!   score = exp(−2 · weighted_length / max_ecc)
//! ```
//!
//! The +1 center tolerance and the `1/(ecc+0.1)` weights are heuristics;
//! they are reproduced exactly because benchmark scores depend on them.

use serde_json::json;
use tracing::debug;

use crate::config::EngineConfig;
use crate::identify::EntranceExitIdentifier;
use crate::model::{Dungeon, Level};
use crate::topology::{NodeIx, SpaceGraph};

use super::{details, require, QualityRule, Requires, RuleOutcome};

const MAX_CENTERS: usize = 3;
const MAX_PERIPHERY: usize = 3;
const CENTER_TOLERANCE: usize = 1;
const WEIGHT_OFFSET: f64 = 0.1;
const DECAY: f64 = 2.0;

pub struct KeyPathLengthRule {
    large_graph_cutoff: usize,
    identifier: EntranceExitIdentifier,
}

impl Default for KeyPathLengthRule {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl KeyPathLengthRule {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            large_graph_cutoff: config.large_graph_cutoff,
            identifier: EntranceExitIdentifier::standard(),
        }
    }

    fn evaluate_level(&self, level: &Level) -> RuleOutcome {
        let identification = self.identifier.resolve(level);
        let graph = SpaceGraph::from_level(level);

        let endpoints = identification
            .is_complete()
            .then(|| {
                let entrance = graph.index_of(identification.entrance.as_deref()?)?;
                let exit = graph.index_of(identification.exit.as_deref()?)?;
                Some((entrance, exit))
            })
            .flatten();

        let Some((entrance, exit)) = endpoints else {
            debug!("key_path_length: entrance/exit unresolved, using radial fallback");
            return self.radial_fallback(&graph);
        };

        let dist = graph.bfs_distances(entrance);
        let Some(raw_length) = dist[exit] else {
            let mut outcome = RuleOutcome::insufficient("no path between entrance and exit");
            outcome.details.insert("entrance".into(), json!(graph.id(entrance)));
            outcome.details.insert("exit".into(), json!(graph.id(exit)));
            return outcome;
        };

        let farthest = dist.iter().flatten().copied().max().unwrap_or(0);
        let diameter = farthest.max(raw_length);
        let normalized_length = if diameter > 0 { raw_length as f64 / diameter as f64 } else { 0.0 };

        RuleOutcome::scored(
            normalized_length,
            details(json!({
                "method": "entrance_exit",
                "entrance": graph.id(entrance),
                "exit": graph.id(exit),
                "raw_length": raw_length,
                "diameter": diameter,
                "normalized_length": normalized_length,
            })),
        )
    }

    fn radial_fallback(&self, graph: &SpaceGraph<'_>) -> RuleOutcome {
        let Some(summary) = radial_path_summary(graph, self.large_graph_cutoff) else {
            return RuleOutcome::insufficient(
                "entrance/exit unresolved and radial fallback failed (disconnected or degenerate graph)",
            );
        };
        let centers: Vec<&str> = summary.centers.iter().map(|&c| graph.id(c)).collect();
        RuleOutcome::scored(
            summary.score,
            details(json!({
                "method": "multi_center_radial",
                "centers": centers,
                "center_eccentricities": summary.center_eccentricities,
                "weighted_path_length": summary.weighted_path_length,
                "max_eccentricity": summary.max_eccentricity,
                "normalized_length": summary.normalized_length,
                "sampled": summary.sampled,
            })),
        )
    }
}

impl QualityRule for KeyPathLengthRule {
    fn name(&self) -> &'static str {
        "key_path_length"
    }

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome {
        match require(self.name(), dungeon, Requires::Connections) {
            Ok(level) => self.evaluate_level(level),
            Err(outcome) => outcome,
        }
    }
}

/// Result of the multi-center radial heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialSummary {
    pub centers: Vec<NodeIx>,
    pub center_eccentricities: Vec<usize>,
    pub weighted_path_length: f64,
    pub max_eccentricity: usize,
    pub normalized_length: f64,
    pub score: f64,
    /// Whether center candidates were restricted to high-degree nodes.
    pub sampled: bool,
}

/// Multi-center radial path aggregation. `None` for graphs with fewer than
/// two nodes, disconnected graphs, or graphs without any path length.
pub fn radial_path_summary(graph: &SpaceGraph<'_>, large_graph_cutoff: usize) -> Option<RadialSummary> {
    let n = graph.node_count();
    if n < 2 || !graph.is_connected() {
        return None;
    }

    let sampled = n > large_graph_cutoff;
    let mut candidates: Vec<NodeIx> = (0..n).collect();
    if sampled {
        // degree centrality is degree / (n − 1); ranking by degree is equivalent
        candidates.sort_by(|&a, &b| graph.degree(b).cmp(&graph.degree(a)).then(a.cmp(&b)));
        candidates.truncate(n.div_ceil(3).max(1));
    }

    let eccentricities: Vec<(NodeIx, usize)> = candidates.iter().map(|&c| (c, graph.eccentricity(c))).collect();
    let min_ecc = eccentricities.iter().map(|&(_, e)| e).min()?;
    let max_ecc = eccentricities.iter().map(|&(_, e)| e).max()?;
    if max_ecc == 0 {
        return None;
    }

    let mut centers: Vec<(NodeIx, usize)> = eccentricities
        .iter()
        .copied()
        .filter(|&(_, e)| e <= min_ecc + CENTER_TOLERANCE)
        .collect();
    centers.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    centers.truncate(MAX_CENTERS);

    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;
    for &(center, ecc) in &centers {
        let dist = graph.bfs_distances(center);
        let weight = 1.0 / (ecc as f64 + WEIGHT_OFFSET);
        let periphery = (0..n).filter(|&ix| dist[ix] == Some(ecc)).take(MAX_PERIPHERY);
        for target in periphery {
            let length = dist[target].unwrap_or(0) as f64;
            weighted_total += weight * length;
            weight_sum += weight;
        }
    }
    if weight_sum == 0.0 {
        return None;
    }

    let weighted_path_length = weighted_total / weight_sum;
    let normalized_length = weighted_path_length / max_ecc as f64;

    Some(RadialSummary {
        center_eccentricities: centers.iter().map(|&(_, e)| e).collect(),
        centers: centers.into_iter().map(|(c, _)| c).collect(),
        weighted_path_length,
        max_eccentricity: max_ecc,
        normalized_length,
        score: (-DECAY * normalized_length).exp(),
        sampled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Corridor, Point, Room};

    fn chain(n: usize) -> Level {
        let mut level = Level::new();
        for i in 0..n {
            level = level.with_room(Room::new(format!("r{i}"), i as f64 * 10.0, 0.0, 5.0, 5.0));
        }
        for i in 1..n {
            level = level.with_connection(format!("r{}", i - 1), format!("r{i}"));
        }
        level
    }

    #[test]
    fn test_chain_path_equals_diameter() {
        let outcome = KeyPathLengthRule::default().evaluate(&Dungeon::single(chain(6)));
        assert_eq!(outcome.detail_u64("raw_length"), Some(5));
        assert_eq!(outcome.detail_u64("diameter"), Some(5));
        assert_eq!(outcome.score, 1.0);
    }

    #[test]
    fn test_shortcut_exit_is_shorter_than_span() {
        let mut level = chain(5);
        level.rooms[2].is_exit = true;
        level.rooms[0].is_entrance = true;
        let outcome = KeyPathLengthRule::default().evaluate(&Dungeon::single(level));
        assert_eq!(outcome.detail_u64("raw_length"), Some(2));
        assert_eq!(outcome.detail_u64("diameter"), Some(4));
        assert_eq!(outcome.score, 0.5);
    }

    #[test]
    fn test_unreachable_exit_scores_zero() {
        let mut level = chain(2).with_room(Room::new("island", 50.0, 50.0, 2.0, 2.0));
        level.rooms[0].is_entrance = true;
        level.rooms[2].is_exit = true;
        let outcome = KeyPathLengthRule::default().evaluate(&Dungeon::single(level));
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.reason(), Some("no path between entrance and exit"));
    }

    #[test]
    fn test_single_room_uses_radial_fallback() {
        let level = Level::new()
            .with_room(Room::new("hall", 0.0, 0.0, 5.0, 5.0))
            .with_corridor(Corridor::new("c1", [Point::new(5.0, 2.0), Point::new(10.0, 2.0)], 1.0))
            .with_corridor(Corridor::new("c2", [Point::new(10.0, 2.0), Point::new(15.0, 2.0)], 1.0))
            .with_connection("hall", "c1")
            .with_connection("c1", "c2");
        let outcome = KeyPathLengthRule::default().evaluate(&Dungeon::single(level));
        assert_eq!(outcome.details["method"], "multi_center_radial");
        // path hall-c1-c2: center c1 (ecc 1), near-centers hall and c2 (ecc 2)
        assert_eq!(outcome.details["centers"], json!(["c1", "hall", "c2"]));
        assert!(outcome.score > 0.0 && outcome.score < 1.0);
    }

    #[test]
    fn test_radial_on_path_graph() {
        let level = chain(3);
        let graph = SpaceGraph::from_level(&level);
        let summary = radial_path_summary(&graph, 50).unwrap();
        assert_eq!(summary.centers, vec![1, 0, 2]);
        assert_eq!(summary.center_eccentricities, vec![1, 2, 2]);
        assert_eq!(summary.max_eccentricity, 2);
        // center 1 reaches r0 and r2 at 1 (w=1/1.1), ends reach the far end at 2 (w=1/2.1)
        let w1 = 1.0 / 1.1;
        let w2 = 1.0 / 2.1;
        let expected = (2.0 * w1 * 1.0 + 2.0 * w2 * 2.0) / (2.0 * w1 + 2.0 * w2);
        assert!((summary.weighted_path_length - expected).abs() < 1e-12);
        assert!((summary.score - (-2.0 * expected / 2.0).exp()).abs() < 1e-12);
        assert!(!summary.sampled);
    }

    #[test]
    fn test_radial_rejects_disconnected() {
        let level = chain(2).with_room(Room::new("island", 50.0, 50.0, 2.0, 2.0));
        let graph = SpaceGraph::from_level(&level);
        assert!(radial_path_summary(&graph, 50).is_none());
    }

    #[test]
    fn test_radial_samples_large_graphs() {
        let level = chain(60);
        let graph = SpaceGraph::from_level(&level);
        let summary = radial_path_summary(&graph, 50).unwrap();
        assert!(summary.sampled);
        assert!(summary.centers.len() <= 3);
        assert!(summary.score > 0.0 && summary.score <= 1.0);
    }
}
