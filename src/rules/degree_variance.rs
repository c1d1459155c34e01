//! Degree variance: rewards levels where rooms have similar numbers of
//! connections.
//!
//! The population variance of room degrees is normalized by
//! `((n − 1) / 2)²`, the variance of a level split between isolated rooms
//! and rooms linked to every other room.

use serde_json::json;

use crate::model::Dungeon;
use crate::topology::SpaceGraph;

use super::{details, require, stats, QualityRule, Requires, RuleOutcome};

pub struct DegreeVarianceRule;

impl QualityRule for DegreeVarianceRule {
    fn name(&self) -> &'static str {
        "degree_variance"
    }

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome {
        let level = match require(self.name(), dungeon, Requires::Connections) {
            Ok(level) => level,
            Err(outcome) => return outcome,
        };

        let graph = SpaceGraph::from_level(level);
        let degrees: Vec<f64> = (0..graph.room_count()).map(|ix| graph.degree(ix) as f64).collect();
        let n = degrees.len() as f64;

        let raw_variance = stats::variance(&degrees);
        let max_variance = ((n - 1.0) / 2.0).powi(2);
        let normalized_variance = if max_variance > stats::EPSILON {
            (raw_variance / max_variance).clamp(0.0, 1.0)
        } else {
            0.0
        };

        RuleOutcome::scored(
            1.0 - normalized_variance,
            details(json!({
                "degrees": degrees,
                "mean_degree": stats::mean(&degrees),
                "raw_variance": raw_variance,
                "max_variance": max_variance,
                "normalized_variance": normalized_variance,
            })),
        )
    }
}
