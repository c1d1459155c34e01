//! Loop ratio: how many independent cycles the level offers per space.
//!
//! `cyclomatic = E − V + C`, `loop_ratio = cyclomatic / V` (an exact 0 is
//! replaced by 0.1), `score = sigmoid(loop_ratio − 1)`.

use serde_json::json;

use crate::model::Dungeon;
use crate::topology::SpaceGraph;

use super::{details, require, stats, QualityRule, Requires, RuleOutcome};

/// Stand-in ratio for acyclic levels.
const ACYCLIC_FLOOR: f64 = 0.1;

pub struct LoopRatioRule;

impl QualityRule for LoopRatioRule {
    fn name(&self) -> &'static str {
        "loop_ratio"
    }

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome {
        let level = match require(self.name(), dungeon, Requires::Connections) {
            Ok(level) => level,
            Err(outcome) => return outcome,
        };

        let graph = SpaceGraph::from_level(level);
        let vertices = graph.node_count();
        let edges = graph.edge_count();
        if edges == 0 {
            return RuleOutcome::insufficient("no valid connections");
        }
        let components = graph.component_count();

        // E − V + C is never negative for an undirected multigraph
        let cyclomatic = (edges + components).saturating_sub(vertices);
        let raw_ratio = cyclomatic as f64 / vertices as f64;
        let loop_ratio = if raw_ratio == 0.0 { ACYCLIC_FLOOR } else { raw_ratio };
        let score = stats::sigmoid(loop_ratio - 1.0);

        RuleOutcome::scored(
            score,
            details(json!({
                "vertices": vertices,
                "edges": edges,
                "components": components,
                "cyclomatic_number": cyclomatic,
                "raw_loop_ratio": raw_ratio,
                "loop_ratio": loop_ratio,
            })),
        )
    }
}
