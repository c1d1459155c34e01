//! # dungeon-metrics — Structural Inference & Quality Metrics for Dungeon Maps
//!
//! Takes a 2-D dungeon map (rooms, corridors, connections, doors, entities),
//! recovers missing structure and scores it with a fixed set of quality
//! rules, each producing a value in `[0, 1]` plus a diagnostic payload.
//!
//! ## Design Principles
//!
//! 1. **Clean DTOs**: `Dungeon`, `Level`, `Room` cross all boundaries
//! 2. **Pure rules**: a rule reads the document and never mutates it
//! 3. **Explicit registries**: formats and rules are listed, not discovered
//! 4. **Dense graph**: topology is an index-based adjacency list built per pass
//!
//! ## Quick Start
//!
//! ```rust
//! use dungeon_metrics::{DungeonFormat, Evaluator};
//!
//! # fn example() -> dungeon_metrics::Result<()> {
//! let dungeon = DungeonFormat::Text.parse(
//!     "room a 0 0 5 5\nroom b 10 0 5 5\nconnect a b\n",
//! )?;
//!
//! let report = Evaluator::default().evaluate(&dungeon);
//! for entry in &report.rules {
//!     println!("{:<32} {:.3}", entry.rule, entry.score);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Rules
//!
//! | Rule | Measures |
//! |------|----------|
//! | `loop_ratio` | cycles relative to graph size |
//! | `degree_variance` | evenness of room degrees |
//! | `door_distribution` | door counts, placement and directions |
//! | `key_path_length` | entrance→exit route vs. level span |
//! | `geometric_balance` | symmetry, area and spacing uniformity |
//! | `treasure_monster_distribution` | spread of loot and guards |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod topology;
pub mod inference;
pub mod identify;
pub mod rules;
pub mod format;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Dungeon, Level, Room, Corridor, Connection, Door,
    GameElement, ElementKind, Point, Bounds,
};

// ============================================================================
// Re-exports: Pipeline stages
// ============================================================================

pub use config::EngineConfig;
pub use format::{DungeonFormat, FormatAdapter};
pub use identify::{EntranceExitIdentifier, Identification, identify_entrance_exit};
pub use inference::{EnhanceStats, SpatialInference};
pub use rules::{QualityRule, RuleOutcome, RuleReport, RuleSet};
pub use topology::SpaceGraph;

use serde::Serialize;
use tracing::{debug, warn};

// ============================================================================
// Top-level Evaluator handle
// ============================================================================

/// The primary entry point. An `Evaluator` owns the configured pipeline:
/// adjacency inference, entrance/exit identification and the rule set.
pub struct Evaluator {
    config: EngineConfig,
    inference: SpatialInference,
    identifier: EntranceExitIdentifier,
    rules: RuleSet,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl Evaluator {
    /// Create an evaluator after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            inference: SpatialInference::from_config(&config),
            identifier: EntranceExitIdentifier::standard(),
            rules: RuleSet::standard(&config),
            config,
        }
    }

    /// Replace the rule set (for custom or partial evaluation).
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Enhance and identify a copy of `dungeon`, leaving the input untouched.
    pub fn prepare(&self, dungeon: &Dungeon) -> Prepared {
        let mut dungeon = dungeon.clone();
        let mut inference = EnhanceStats::default();
        let mut identification = Identification::default();

        match dungeon.first_level_mut() {
            Some(level) => {
                if self.config.infer_adjacency {
                    inference = self.inference.enhance(level);
                }
                identification = self.identifier.identify(level);
            }
            None => warn!("Dungeon has no levels; rules will report insufficient data"),
        }

        Prepared { dungeon, inference, identification }
    }

    /// Run the full pipeline and every rule.
    pub fn evaluate(&self, dungeon: &Dungeon) -> QualityReport {
        let prepared = self.prepare(dungeon);
        let rules = self.rules.evaluate_all(&prepared.dungeon);
        debug!("Evaluated {} rules", rules.len());

        QualityReport {
            rules,
            identification: prepared.identification,
            connections_inferred: prepared.inference.connections_added,
            doors_inferred: prepared.inference.doors_added,
        }
    }

    /// Parse `input` in `format`, then evaluate.
    pub fn evaluate_input(&self, input: &str, format: DungeonFormat) -> Result<QualityReport> {
        let dungeon = format.parse(input)?;
        Ok(self.evaluate(&dungeon))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// A dungeon after inference and identification.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub dungeon: Dungeon,
    pub inference: EnhanceStats,
    pub identification: Identification,
}

/// Per-rule scores in registry order. Scores are never combined here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub rules: Vec<RuleReport>,
    pub identification: Identification,
    pub connections_inferred: usize,
    pub doors_inferred: usize,
}

impl QualityReport {
    pub fn score(&self, rule: &str) -> Option<f64> {
        self.get(rule).map(|r| r.score)
    }

    pub fn get(&self, rule: &str) -> Option<&RuleReport> {
        self.rules.iter().find(|r| r.rule == rule)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
