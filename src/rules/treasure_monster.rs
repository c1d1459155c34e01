//! Treasure / monster distribution.
//!
//! Every treasure, monster and boss is assigned to the room whose center is
//! nearest. Factors:
//! - uniformity of treasure counts per room,
//! - uniformity of hostile counts per room (only when hostiles exist),
//! - proximity: `1 − min(mean monster→nearest treasure distance / diagonal, 1)`.
//!
//! The score is the geometric mean of the nonzero factors. Without
//! hostiles only treasure uniformity counts; without treasure only hostile
//! uniformity counts.

use serde_json::json;

use crate::model::{Dungeon, ElementKind, Level, Point};

use super::{details, require, stats, QualityRule, Requires, RuleOutcome};

pub struct TreasureMonsterDistributionRule;

/// Per-room counts of the given entities.
fn counts_per_room(level: &Level, points: &[Point]) -> Vec<f64> {
    let mut counts = vec![0.0; level.rooms.len()];
    for p in points {
        if let Some(ix) = level.nearest_room(p) {
            counts[ix] += 1.0;
        }
    }
    counts
}

fn mean_nearest_distance(from: &[Point], to: &[Point]) -> f64 {
    let nearest: Vec<f64> = from
        .iter()
        .map(|m| to.iter().map(|t| m.distance(t)).fold(f64::INFINITY, f64::min))
        .collect();
    stats::mean(&nearest)
}

impl QualityRule for TreasureMonsterDistributionRule {
    fn name(&self) -> &'static str {
        "treasure_monster_distribution"
    }

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome {
        let level = match require(self.name(), dungeon, Requires::Rooms) {
            Ok(level) => level,
            Err(outcome) => return outcome,
        };

        let positions = |pred: fn(ElementKind) -> bool| -> Vec<Point> {
            level.game_elements.iter().filter(|e| pred(e.kind)).map(|e| e.position).collect()
        };
        let treasures = positions(|k| k == ElementKind::Treasure);
        let hostiles = positions(|k| k.is_hostile());

        if treasures.is_empty() && hostiles.is_empty() {
            return RuleOutcome::insufficient("no treasure or monsters");
        }

        if treasures.is_empty() {
            let monster_counts = counts_per_room(level, &hostiles);
            let monster_uniformity = stats::cv_uniformity(&monster_counts);
            return RuleOutcome::scored(
                stats::geometric_mean_of_nonzero(&[monster_uniformity]),
                details(json!({
                    "treasure_count": 0,
                    "monster_count": hostiles.len(),
                    "monster_per_room": monster_counts,
                    "monster_uniformity": monster_uniformity,
                })),
            );
        }

        let treasure_counts = counts_per_room(level, &treasures);
        let treasure_uniformity = stats::cv_uniformity(&treasure_counts);

        if hostiles.is_empty() {
            return RuleOutcome::scored(
                stats::geometric_mean_of_nonzero(&[treasure_uniformity]),
                details(json!({
                    "treasure_count": treasures.len(),
                    "monster_count": 0,
                    "treasure_per_room": treasure_counts,
                    "treasure_uniformity": treasure_uniformity,
                })),
            );
        }

        let monster_counts = counts_per_room(level, &hostiles);
        let monster_uniformity = stats::cv_uniformity(&monster_counts);

        let diagonal = level.map_bounds().map(|b| b.diagonal()).unwrap_or(0.0);
        let mean_distance = mean_nearest_distance(&hostiles, &treasures);
        let proximity = if diagonal > stats::EPSILON {
            1.0 - (mean_distance / diagonal).min(1.0)
        } else {
            1.0
        };

        let score = stats::geometric_mean_of_nonzero(&[treasure_uniformity, monster_uniformity, proximity]);

        RuleOutcome::scored(
            score,
            details(json!({
                "treasure_count": treasures.len(),
                "monster_count": hostiles.len(),
                "treasure_per_room": treasure_counts,
                "monster_per_room": monster_counts,
                "treasure_uniformity": treasure_uniformity,
                "monster_uniformity": monster_uniformity,
                "mean_monster_treasure_distance": mean_distance,
                "proximity": proximity,
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameElement, Room};

    fn two_rooms() -> Level {
        Level::new()
            .with_room(Room::new("a", 0.0, 0.0, 10.0, 10.0))
            .with_room(Room::new("b", 20.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_even_treasure_without_monsters() {
        let level = two_rooms()
            .with_element(GameElement::new(ElementKind::Treasure, 5.0, 5.0))
            .with_element(GameElement::new(ElementKind::Treasure, 25.0, 5.0));
        let outcome = TreasureMonsterDistributionRule.evaluate(&Dungeon::single(level));
        assert_eq!(outcome.detail_f64("treasure_uniformity"), Some(1.0));
        assert_eq!(outcome.score, 1.0);
        assert!(outcome.details.get("proximity").is_none());
    }

    #[test]
    fn test_all_treasure_in_one_room() {
        let level = two_rooms()
            .with_element(GameElement::new(ElementKind::Treasure, 5.0, 5.0))
            .with_element(GameElement::new(ElementKind::Treasure, 6.0, 5.0));
        let outcome = TreasureMonsterDistributionRule.evaluate(&Dungeon::single(level));
        assert_eq!(outcome.detail_f64("treasure_uniformity"), Some(0.0));
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_guarded_treasure() {
        let level = two_rooms()
            .with_element(GameElement::new(ElementKind::Treasure, 5.0, 5.0))
            .with_element(GameElement::new(ElementKind::Treasure, 25.0, 5.0))
            .with_element(GameElement::new(ElementKind::Monster, 5.0, 5.0))
            .with_element(GameElement::new(ElementKind::Boss, 25.0, 5.0));
        let outcome = TreasureMonsterDistributionRule.evaluate(&Dungeon::single(level));
        assert_eq!(outcome.detail_u64("monster_count"), Some(2));
        assert_eq!(outcome.detail_f64("proximity"), Some(1.0));
        assert_eq!(outcome.score, 1.0);
    }

    #[test]
    fn test_monsters_without_treasure() {
        let level = two_rooms()
            .with_element(GameElement::new(ElementKind::Monster, 5.0, 5.0))
            .with_element(GameElement::new(ElementKind::Boss, 25.0, 5.0));
        let outcome = TreasureMonsterDistributionRule.evaluate(&Dungeon::single(level));
        assert_eq!(outcome.reason(), None);
        assert_eq!(outcome.detail_f64("monster_uniformity"), Some(1.0));
        assert_eq!(outcome.score, 1.0);

        let level = two_rooms()
            .with_element(GameElement::new(ElementKind::Monster, 5.0, 5.0))
            .with_element(GameElement::new(ElementKind::Monster, 6.0, 5.0));
        let outcome = TreasureMonsterDistributionRule.evaluate(&Dungeon::single(level));
        assert_eq!(outcome.detail_f64("monster_uniformity"), Some(0.0));
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_no_entities() {
        let outcome = TreasureMonsterDistributionRule.evaluate(&Dungeon::single(two_rooms()));
        assert_eq!(outcome.reason(), Some("no treasure or monsters"));
        assert_eq!(outcome.score, 0.0);
    }
}
