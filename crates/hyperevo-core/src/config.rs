//! Engine configuration.
//!
//! One `EvolutionConfig` is handed to the engine at construction and read
//! by every component from there. Nothing is global, and nothing changes
//! once a run has started.

use crate::error::{HyperevoError, Result};
use crate::types::ValueRange;
use serde::{Deserialize, Serialize};

/// How mutation and interaction are ordered inside one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrder {
    /// Each node mutates, regenerates and interacts before the next node
    /// starts. Later nodes see the updated state of earlier ones.
    #[default]
    Interleaved,
    /// Every node mutates and regenerates first, then all nodes interact
    /// against one snapshot of interaction strengths.
    Phased,
}

/// When nodes draw from their associated energy sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySchedule {
    /// Only when `EvolutionEngine::drain_energy_sources` is called.
    #[default]
    Manual,
    /// Once per node per generation, right after regeneration.
    EveryGeneration,
}

/// Optional clamps for the two places mutation_rate can leave its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClampPolicy {
    /// Clamp mutation_rate after feedback is applied.
    #[serde(default)]
    pub feedback: bool,
    /// Clamp mutation_rate on the oscillation step that triggers a flip.
    #[serde(default)]
    pub oscillation: bool,
}

/// Configuration for an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Starting mutation rate for every node (default: 0.1).
    pub global_mutation_rate: f64,
    /// Range for initial interaction strengths and hyperedge weights (default: 0.1-1.0).
    pub interaction_strength_range: ValueRange,
    /// Nominal range for mutation rates (default: 0.01-0.6).
    pub mutation_rate_range: ValueRange,
    /// Energy spent per interaction; also the minimum energy to interact (default: 10).
    pub energy_threshold: f64,
    /// Energy regenerated per generation (default: 5).
    pub environment_energy: f64,
    /// Species A oscillates its mutation rate when set (default: true).
    pub oscillatory_mutation: bool,
    /// Mutation rate above which a member forces its hyperedge to reform (default: 0.5).
    pub drift_threshold: f64,
    /// Upper bound applied by regeneration (default: 100).
    pub energy_cap: f64,
    /// Energy a freshly created node starts with (default: 100).
    pub initial_energy: f64,
    /// Fitness a freshly created node starts with (default: 1.0).
    pub initial_fitness: f64,
    /// Mutation/interaction ordering (default: interleaved).
    pub update_order: UpdateOrder,
    /// Energy source draining schedule (default: manual).
    pub energy_sources: EnergySchedule,
    /// Optional mutation-rate clamps (default: none).
    pub clamp: ClampPolicy,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            global_mutation_rate: 0.1,
            interaction_strength_range: ValueRange::new(0.1, 1.0),
            mutation_rate_range: ValueRange::new(0.01, 0.6),
            energy_threshold: 10.0,
            environment_energy: 5.0,
            oscillatory_mutation: true,
            drift_threshold: 0.5,
            energy_cap: 100.0,
            initial_energy: 100.0,
            initial_fitness: 1.0,
            update_order: UpdateOrder::Interleaved,
            energy_sources: EnergySchedule::Manual,
            clamp: ClampPolicy::default(),
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_update_order(mut self, order: UpdateOrder) -> Self {
        self.update_order = order;
        self
    }

    pub fn with_energy_schedule(mut self, schedule: EnergySchedule) -> Self {
        self.energy_sources = schedule;
        self
    }

    pub fn with_clamp(mut self, clamp: ClampPolicy) -> Self {
        self.clamp = clamp;
        self
    }

    /// Check every field before a run starts.
    pub fn validate(&self) -> Result<()> {
        check_range("interaction_strength_range", &self.interaction_strength_range)?;
        check_range("mutation_rate_range", &self.mutation_rate_range)?;

        if self.mutation_rate_range.min < 0.0 || self.mutation_rate_range.max > 1.0 {
            return Err(HyperevoError::invalid_config(
                "mutation_rate_range",
                format!(
                    "{}-{}",
                    self.mutation_rate_range.min, self.mutation_rate_range.max
                ),
                "mutation rates are probabilities and must lie in 0-1",
            ));
        }

        check_finite_non_negative("global_mutation_rate", self.global_mutation_rate)?;
        check_finite_non_negative("energy_threshold", self.energy_threshold)?;
        check_finite_non_negative("environment_energy", self.environment_energy)?;
        check_finite_non_negative("drift_threshold", self.drift_threshold)?;
        check_finite_non_negative("initial_fitness", self.initial_fitness)?;

        if !self.energy_cap.is_finite() || self.energy_cap <= 0.0 {
            return Err(HyperevoError::invalid_config(
                "energy_cap",
                self.energy_cap.to_string(),
                "must be a positive number",
            ));
        }

        if !self.initial_energy.is_finite()
            || self.initial_energy < 0.0
            || self.initial_energy > self.energy_cap
        {
            return Err(HyperevoError::out_of_range(
                "initial_energy",
                0.0,
                self.energy_cap,
                self.initial_energy,
            ));
        }

        Ok(())
    }
}

fn check_range(field: &str, range: &ValueRange) -> Result<()> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(HyperevoError::invalid_config(
            field,
            format!("{}-{}", range.min, range.max),
            "bounds must be finite",
        ));
    }
    if range.min > range.max {
        return Err(HyperevoError::inverted_range(field, range.min, range.max));
    }
    Ok(())
}

fn check_finite_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(HyperevoError::invalid_config(
            field,
            value.to_string(),
            "must be a finite, non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn default_config_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut config = EvolutionConfig::default();
        config.mutation_rate_range = ValueRange::new(0.9, 0.1);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            HyperevoError::Config(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn initial_energy_above_cap_is_rejected() {
        let mut config = EvolutionConfig::default();
        config.initial_energy = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let mut config = EvolutionConfig::default();
        config.energy_threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EvolutionConfig =
            serde_json::from_str(r#"{"energy_threshold": 12.5, "update_order": "phased"}"#)
                .unwrap();
        assert_eq!(config.energy_threshold, 12.5);
        assert_eq!(config.update_order, UpdateOrder::Phased);
        assert_eq!(config.environment_energy, 5.0);
        assert!(!config.clamp.feedback);
    }
}
