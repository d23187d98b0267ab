//! Shared types used across all hyperevo crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation counter. Starts at 0 and advances once per engine step.
pub type Generation = u64;

/// Unique identifier for a node in the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Index of an energy source in the shared [`EnergyArena`](crate::energy::EnergyArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnergySourceId(pub u32);

impl EnergySourceId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EnergySourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source-{}", self.0)
    }
}

/// The species a node belongs to. Selects the mutation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Oscillating mutation rate, expensive mutations.
    A,
    /// Energy-adaptive mutation rate, cheap mutations.
    B,
}

impl Species {
    /// Single-letter tag used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Species::A => "A",
            Species::B => "B",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "A" | "a" => Some(Species::A),
            "B" | "b" => Some(Species::B),
            _ => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Interaction type a hyperedge is bucketed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Cooperative,
    Competitive,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Cooperative => "cooperative",
            InteractionType::Competitive => "competitive",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction the oscillatory mutation rate is currently travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationDirection {
    Up,
    Down,
}

impl MutationDirection {
    /// +1.0 or -1.0.
    pub fn sign(&self) -> f64 {
        match self {
            MutationDirection::Up => 1.0,
            MutationDirection::Down => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            MutationDirection::Up => MutationDirection::Down,
            MutationDirection::Down => MutationDirection::Up,
        }
    }
}

/// A closed numeric range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// True when `value` sits on or beyond either bound.
    pub fn at_or_beyond_bound(&self, value: f64) -> bool {
        value >= self.max || value <= self.min
    }
}
