//! Error types for hyperevo operations.
//!
//! Numeric guards (insufficient energy, out-of-range rates) are not errors;
//! they are no-ops or silent clamps. Errors cover broken preconditions,
//! bad configuration and I/O on the log sink.

use crate::types::{EnergySourceId, NodeId};
use thiserror::Error;

/// Result type for hyperevo operations.
pub type Result<T> = std::result::Result<T, HyperevoError>;

/// Errors that can occur during hyperevo operations.
#[derive(Debug, Clone, Error)]
pub enum HyperevoError {
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A node was asked to interact with no neighbors.
    #[error("Node {node} has no neighbors to interact with")]
    EmptyNeighborhood { node: NodeId },

    /// A hyperedge was requested with no members.
    #[error("Hyperedge must have at least one member")]
    EmptyHyperedge,

    /// Node not found in the population.
    #[error("Node not found: {0}")]
    UnknownNode(NodeId),

    /// Energy source not found in the arena.
    #[error("Energy source not found: {0}")]
    UnknownEnergySource(EnergySourceId),

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for HyperevoError {
    fn from(e: std::io::Error) -> Self {
        HyperevoError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for HyperevoError {
    fn from(e: serde_json::Error) -> Self {
        HyperevoError::Serialization(e.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// A `[min, max]` pair with min above max.
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange { field: String, min: f64, max: f64 },
}

// Convenience constructors
impl HyperevoError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HyperevoError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        HyperevoError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    pub fn inverted_range(field: impl Into<String>, min: f64, max: f64) -> Self {
        HyperevoError::Config(ConfigError::InvertedRange {
            field: field.into(),
            min,
            max,
        })
    }
}
