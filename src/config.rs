//! Engine configuration, loadable from JSON with per-field defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_CUTOFF, MOVE_DELAY_MS, SHRINK_FACTOR, TIME_CEILING_MS, TURN_WEIGHT};
use crate::error::Result;

/// Tunable search parameters. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cutoff depth before any iterative-deepening adjustment
    pub base_cutoff: u32,
    /// Wall-clock ceiling for one search
    pub time_ceiling_ms: u64,
    /// Pause after a searched move, so the reply is not instantaneous
    pub move_delay_ms: u64,
    /// Per-turn growth of the evaluation weight and of the depth allowance
    pub turn_weight: f64,
    /// Fraction of the effective cutoff kept after a timeout
    pub shrink_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_cutoff: BASE_CUTOFF,
            time_ceiling_ms: TIME_CEILING_MS,
            move_delay_ms: MOVE_DELAY_MS,
            turn_weight: TURN_WEIGHT,
            shrink_factor: SHRINK_FACTOR,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_json(&text)
    }

    pub fn time_ceiling(&self) -> Duration {
        Duration::from_millis(self.time_ceiling_ms)
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.base_cutoff, 12);
        assert_eq!(config.time_ceiling(), Duration::from_secs(55));
    }

    #[test]
    fn test_load_config_partial() {
        let json = r#"{
            "base_cutoff": 6,
            "move_delay_ms": 0
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.base_cutoff, 6);
        assert_eq!(config.move_delay(), Duration::ZERO);
        assert_eq!(config.time_ceiling_ms, TIME_CEILING_MS);
        assert_eq!(config.shrink_factor, SHRINK_FACTOR);
    }

    #[test]
    fn test_load_config_rejects_bad_json() {
        assert!(EngineConfig::load_from_json(r#"{"base_cutoff": "deep"}"#).is_err());
        assert!(EngineConfig::load_from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(EngineConfig::from_file("/nonexistent/engine.json").is_err());
    }
}
