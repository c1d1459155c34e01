//! Engine configuration.
//!
//! Every tunable the inference pass and the quality rules consume lives
//! here. Defaults reproduce the reference scores; hosts may load overrides
//! from JSON.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tunables for inference, identification and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest gap between two spaces that still counts as adjacent.
    pub adjacency_threshold: f64,
    /// Inferred connections at or below this confidence are not merged.
    pub min_inference_confidence: f64,
    /// Run spatial inference before evaluating.
    pub infer_adjacency: bool,
    /// Theoretical max coefficient of variation for per-room door counts.
    pub max_door_cv: f64,
    /// Entropy (nats) credited to rooms with fewer than two neighbours.
    pub low_degree_entropy: f64,
    /// Node count above which the radial fallback samples center candidates.
    pub large_graph_cutoff: usize,
    /// Mirror-match tolerance as a fraction of map width.
    pub symmetry_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            adjacency_threshold: 2.0,
            min_inference_confidence: 0.1,
            infer_adjacency: true,
            max_door_cv: 2.0,
            low_degree_entropy: 0.1,
            large_graph_cutoff: 50,
            symmetry_tolerance: 0.01,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_adjacency_threshold(mut self, threshold: f64) -> Self {
        self.adjacency_threshold = threshold;
        self
    }

    pub fn without_inference(mut self) -> Self {
        self.infer_adjacency = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.adjacency_threshold.is_nan() || self.adjacency_threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "adjacency_threshold must be >= 0, got {}", self.adjacency_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_inference_confidence) {
            return Err(Error::InvalidConfig(format!(
                "min_inference_confidence must be in [0, 1], got {}", self.min_inference_confidence
            )));
        }
        if self.max_door_cv.is_nan() || self.max_door_cv <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_door_cv must be > 0, got {}", self.max_door_cv
            )));
        }
        if self.low_degree_entropy.is_nan() || self.low_degree_entropy < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "low_degree_entropy must be >= 0, got {}", self.low_degree_entropy
            )));
        }
        if self.symmetry_tolerance.is_nan() || self.symmetry_tolerance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "symmetry_tolerance must be > 0, got {}", self.symmetry_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.large_graph_cutoff, 50);
        assert_eq!(config.min_inference_confidence, 0.1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"adjacency_threshold": 1.0}"#).unwrap();
        assert_eq!(config.adjacency_threshold, 1.0);
        assert_eq!(config.max_door_cv, 2.0);
        assert!(config.infer_adjacency);
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let err = EngineConfig::from_json_str(r#"{"min_inference_confidence": 1.5}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let config = EngineConfig::default().with_adjacency_threshold(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_tunables() {
        assert!(EngineConfig::default().with_adjacency_threshold(f64::NAN).validate().is_err());

        let config = EngineConfig { max_door_cv: f64::NAN, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = EngineConfig { low_degree_entropy: f64::NAN, ..EngineConfig::default() };
        assert!(config.validate().is_err());

        let config = EngineConfig { symmetry_tolerance: f64::NAN, ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(EngineConfig::from_json_str("{"), Err(Error::Json(_))));
    }
}
