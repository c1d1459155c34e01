//! Geometric balance of room layout: mirror symmetry about the vertical
//! midline, uniformity of room areas, and uniformity of spacing between
//! connected rooms. The score is the geometric mean of the nonzero factors.

use serde_json::json;

use crate::config::EngineConfig;
use crate::model::{Dungeon, Level, Point};

use super::{details, require, stats, QualityRule, Requires, RuleOutcome};

pub struct GeometricBalanceRule {
    symmetry_tolerance: f64,
}

impl Default for GeometricBalanceRule {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl GeometricBalanceRule {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self { symmetry_tolerance: config.symmetry_tolerance }
    }

    /// Fraction of rooms whose mirror image lands on some room center.
    fn symmetry_ratio(&self, level: &Level, centers: &[Point]) -> f64 {
        let Some(bounds) = level.room_bounds() else {
            return 0.0;
        };
        let mid_x = (bounds.min_x + bounds.max_x) / 2.0;
        let tolerance = self.symmetry_tolerance * bounds.width();

        let matched = centers
            .iter()
            .filter(|c| {
                let mirrored = Point::new(2.0 * mid_x - c.x, c.y);
                centers.iter().any(|other| other.distance(&mirrored) <= tolerance)
            })
            .count();
        matched as f64 / centers.len() as f64
    }

    /// Center distances along connections, or between every room pair when
    /// no connection resolves to two spaces with geometry.
    fn spacings(level: &Level, centers: &[Point]) -> Vec<f64> {
        let along_edges: Vec<f64> = level
            .connections
            .iter()
            .filter_map(|c| {
                let a = level.space(&c.from_room)?.center()?;
                let b = level.space(&c.to_room)?.center()?;
                Some(a.distance(&b))
            })
            .collect();
        if !along_edges.is_empty() {
            return along_edges;
        }

        let mut pairwise = Vec::new();
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                pairwise.push(a.distance(b));
            }
        }
        pairwise
    }
}

impl QualityRule for GeometricBalanceRule {
    fn name(&self) -> &'static str {
        "geometric_balance"
    }

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome {
        let level = match require(self.name(), dungeon, Requires::Rooms) {
            Ok(level) => level,
            Err(outcome) => return outcome,
        };

        let centers: Vec<Point> = level.rooms.iter().map(|r| r.center()).collect();
        let areas: Vec<f64> = level.rooms.iter().map(|r| r.area()).collect();
        let spacings = Self::spacings(level, &centers);

        let symmetry = self.symmetry_ratio(level, &centers);
        let area_uniformity = stats::cv_uniformity(&areas);
        let spacing_uniformity = stats::cv_uniformity(&spacings);

        let score = stats::geometric_mean_of_nonzero(&[symmetry, area_uniformity, spacing_uniformity]);

        RuleOutcome::scored(
            score,
            details(json!({
                "symmetry_ratio": symmetry,
                "area_uniformity": area_uniformity,
                "area_cv": stats::coefficient_of_variation(&areas),
                "spacing_uniformity": spacing_uniformity,
                "spacing_samples": spacings.len(),
            })),
        )
    }
}
