//! Experience configuration.
//!
//! Every field has a default matching the shipped experience, so an empty
//! document is a valid configuration.

use keepsake_capture::application::photo_booth::CaptureConfig;
use keepsake_core::error::DomainError;
use keepsake_gate::domain::aggregates::GateConfig;
use keepsake_hunt::domain::aggregates::HuntConfig;
use keepsake_puzzle::domain::aggregates::PuzzleConfig;
use serde::{Deserialize, Serialize};

use crate::domain::supporting::MotivationConfig;

/// Settings for the process that drives the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Interval between ticks.
    pub tick_interval_ms: u64,
    /// Clock speed relative to real time.
    pub time_scale: f64,
    /// RNG seed; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            time_scale: 1.0,
            seed: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Passcode gate.
    pub gate: GateConfig,
    /// Intro puzzle.
    pub puzzle: PuzzleConfig,
    /// Collectible hunt.
    pub hunt: HuntConfig,
    /// Photo booth.
    pub capture: CaptureConfig,
    /// Motivation scene.
    pub motivation: MotivationConfig,
    /// Tick driver.
    pub runner: RunnerConfig,
}

impl ExperienceConfig {
    /// Parses a YAML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the document does not parse
    /// or fails [`ExperienceConfig::validate`].
    pub fn from_yaml(document: &str) -> Result<Self, DomainError> {
        let config: Self = if document.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(document)
                .map_err(|e| DomainError::Configuration(format!("invalid config: {e}")))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` naming the first bad value.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.gate.validate()?;
        self.capture.validate()?;
        if self.puzzle.target.is_empty() {
            return Err(DomainError::Configuration(
                "puzzle target must not be empty".to_owned(),
            ));
        }
        if self.puzzle.tile_size.width <= 0.0 || self.puzzle.tile_size.height <= 0.0 {
            return Err(DomainError::Configuration(
                "puzzle tile size must be positive".to_owned(),
            ));
        }
        if self.hunt.winning_count == 0 {
            return Err(DomainError::Configuration(
                "hunt needs at least one winning collectible".to_owned(),
            ));
        }
        if self.runner.tick_interval_ms == 0 {
            return Err(DomainError::Configuration(
                "tick interval must be non-zero".to_owned(),
            ));
        }
        if !(self.runner.time_scale.is_finite() && self.runner.time_scale > 0.0) {
            return Err(DomainError::Configuration(
                "time scale must be a positive number".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExperienceConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.gate.access_code, "010507");
        assert_eq!(config.hunt.winning_count, 7);
        assert_eq!(config.capture.download_name, "clover-photobooth.png");
    }

    #[test]
    fn test_from_yaml_overrides_only_given_fields() {
        let yaml = "
gate:
  access_code: '123456'
runner:
  time_scale: 4.0
  seed: 7
";

        let config = ExperienceConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.gate.access_code, "123456");
        assert_eq!(config.gate.max_hint_stage, 4);
        assert_eq!(config.runner.seed, Some(7));
        assert!((config.runner.time_scale - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.hunt, HuntConfig::default());
    }

    #[test]
    fn test_from_yaml_empty_document_is_default() {
        assert_eq!(
            ExperienceConfig::from_yaml("  \n").unwrap(),
            ExperienceConfig::default()
        );
    }

    #[test]
    fn test_from_yaml_rejects_invalid_values() {
        let result = ExperienceConfig::from_yaml("runner:\n  tick_interval_ms: 0\n");

        match result {
            Err(DomainError::Configuration(msg)) => {
                assert_eq!(msg, "tick interval must be non-zero");
            }
            other => panic!("expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_rejects_malformed_document() {
        let result = ExperienceConfig::from_yaml("gate: [1, 2");

        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
