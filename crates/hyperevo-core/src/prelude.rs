//! Hyperevo Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use hyperevo_core::prelude::*;
//! ```

pub use crate::types::{
    EnergySourceId, Generation, InteractionType, MutationDirection, NodeId, Species, ValueRange,
};

pub use crate::activation::ActivationModel;
pub use crate::config::{ClampPolicy, EnergySchedule, EvolutionConfig, UpdateOrder};
pub use crate::dna::Dna;
pub use crate::energy::{EnergyArena, EnergySource};
pub use crate::species::Mutation;

pub use crate::error::{ConfigError, HyperevoError, Result};
