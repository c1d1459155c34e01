//! # Quality Rules
//!
//! Six independent, stateless evaluators. Each reads the first level of a
//! [`Dungeon`] and returns a [`RuleOutcome`]: a score in `[0, 1]` plus a
//! JSON diagnostic payload. Rules never fail: missing data yields a zero
//! score with a `reason` entry.
//!
//! | Rule | Measures |
//! |------|----------|
//! | `loop_ratio` | independent cycles per space, through a sigmoid |
//! | `degree_variance` | uniformity of room degrees |
//! | `door_distribution` | door-count spread, door distances, door bearings |
//! | `key_path_length` | entrance→exit path relative to the level span |
//! | `geometric_balance` | mirror symmetry, area and spacing uniformity |
//! | `treasure_monster_distribution` | loot/monster spread and proximity |
//!
//! Rules share no state, so one graph can be scored by all rules in
//! parallel.

pub mod stats;
pub mod loop_ratio;
pub mod degree_variance;
pub mod door_distribution;
pub mod key_path;
pub mod geometric_balance;
pub mod treasure_monster;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{Dungeon, Level};

pub use loop_ratio::LoopRatioRule;
pub use degree_variance::DegreeVarianceRule;
pub use door_distribution::DoorDistributionRule;
pub use key_path::{KeyPathLengthRule, RadialSummary, radial_path_summary};
pub use geometric_balance::GeometricBalanceRule;
pub use treasure_monster::TreasureMonsterDistributionRule;

/// Diagnostic payload attached to a score.
pub type Details = serde_json::Map<String, Value>;

/// Score plus diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub score: f64,
    pub details: Details,
}

impl RuleOutcome {
    /// A computed score, clamped into `[0, 1]`.
    pub fn scored(score: f64, details: Details) -> Self {
        Self { score: stats::clamp_unit(score), details }
    }

    /// Zero score explained by `reason`.
    pub fn insufficient(reason: impl Into<String>) -> Self {
        let mut details = Details::new();
        details.insert("reason".into(), Value::String(reason.into()));
        Self { score: 0.0, details }
    }

    pub fn reason(&self) -> Option<&str> {
        self.details.get("reason").and_then(Value::as_str)
    }

    pub fn detail_f64(&self, key: &str) -> Option<f64> {
        self.details.get(key).and_then(Value::as_f64)
    }

    pub fn detail_u64(&self, key: &str) -> Option<u64> {
        self.details.get(key).and_then(Value::as_u64)
    }
}

/// Unwrap a `json!({...})` object literal into [`Details`].
pub(crate) fn details(value: Value) -> Details {
    match value {
        Value::Object(map) => map,
        _ => Details::new(),
    }
}

/// A quality evaluator over one dungeon document.
pub trait QualityRule: Send + Sync {
    /// Stable identifier used in reports.
    fn name(&self) -> &'static str;

    fn evaluate(&self, dungeon: &Dungeon) -> RuleOutcome;
}

/// What a rule needs from the first level before it can score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Requires {
    Rooms,
    Connections,
}

/// The first level, or the zero outcome explaining what is missing.
pub(crate) fn require<'a>(rule: &str, dungeon: &'a Dungeon, needs: Requires) -> Result<&'a Level, RuleOutcome> {
    let reason = match dungeon.first_level() {
        None => "no levels",
        Some(level) if level.rooms.is_empty() => "no rooms",
        Some(level) if needs == Requires::Connections && level.connections.is_empty() => "no connections",
        Some(level) => return Ok(level),
    };
    debug!("{rule}: insufficient data ({reason})");
    Err(RuleOutcome::insufficient(reason))
}

/// Ordered collection of rules, evaluated one after another.
pub struct RuleSet {
    rules: Vec<Box<dyn QualityRule>>,
}

impl RuleSet {
    /// All six rules, configured from `config`.
    pub fn standard(config: &EngineConfig) -> Self {
        Self {
            rules: vec![
                Box::new(LoopRatioRule),
                Box::new(DegreeVarianceRule),
                Box::new(DoorDistributionRule::from_config(config)),
                Box::new(KeyPathLengthRule::from_config(config)),
                Box::new(GeometricBalanceRule::from_config(config)),
                Box::new(TreasureMonsterDistributionRule),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Box<dyn QualityRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate_all(&self, dungeon: &Dungeon) -> Vec<RuleReport> {
        self.rules
            .iter()
            .map(|rule| {
                let outcome = rule.evaluate(dungeon);
                debug!("{} scored {:.4}", rule.name(), outcome.score);
                RuleReport { rule: rule.name(), score: outcome.score, details: outcome.details }
            })
            .collect()
    }
}

/// One rule's entry in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReport {
    pub rule: &'static str,
    pub score: f64,
    pub details: Details,
}
