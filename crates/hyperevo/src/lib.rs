//! # Hyperevo
//!
//! Evolving node populations with energy budgets, species-specific
//! mutation policies and self-reforming hyperedges.
//!
//! Every node carries DNA (interaction strength, mutation rate, binary
//! state, activation threshold, energy). Each generation the engine lets
//! every node mutate under its species policy, regenerate energy, and
//! interact with the population through weighted hyperedges, producing a
//! logistic activation. A coin-flip feedback signal then scales fitness and
//! mutation rate, and any hyperedge with a member whose mutation rate has
//! drifted past the threshold is formed again with fresh weights.
//!
//! ## Quick Start
//!
//! ```rust
//! use hyperevo::prelude::*;
//!
//! let config = EvolutionConfig::default().with_seed(42);
//! let mut engine = EvolutionEngine::new(config, MemoryLog::new()).unwrap();
//! engine.populate(&PopulationPlan::default()).unwrap();
//!
//! let summaries = engine.evolve(20).unwrap();
//! let last = summaries.last().unwrap();
//! println!("mean fitness after 20 generations: {:.3}", last.mean_fitness);
//!
//! assert_eq!(engine.sink().records().len(), 10 * 20);
//! ```
//!
//! ## Architecture
//!
//! - [`hyperevo_core`] - DNA, species policies, activation, energy sources, config
//! - [`hyperevo_runtime`] - Nodes, hyperedge registry, evolution engine, log sinks
//!
//! ## Species
//!
//! | Species | Mutation rate | Mutation cost | Mutates |
//! |---------|---------------|---------------|---------|
//! | A | Oscillates ±0.02, flips at the range bounds | 15 | strength, state, threshold |
//! | B | +0.01 below 50 energy, -0.01 above, clamped | 5 | strength, state |
//!
//! ## Update Order
//!
//! `UpdateOrder::Interleaved` (default) lets each node interact right after
//! its own mutation, so later nodes see earlier nodes' new strengths.
//! `UpdateOrder::Phased` mutates everyone first and interacts against one
//! snapshot.

pub use hyperevo_core as core;
pub use hyperevo_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hyperevo::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use hyperevo_core::types::{
        EnergySourceId, Generation, InteractionType, MutationDirection, NodeId, Species, ValueRange,
    };
    pub use hyperevo_core::activation::ActivationModel;
    pub use hyperevo_core::config::{ClampPolicy, EnergySchedule, EvolutionConfig, UpdateOrder};
    pub use hyperevo_core::dna::Dna;
    pub use hyperevo_core::energy::{EnergyArena, EnergySource};

    // Error types
    pub use hyperevo_core::error::{HyperevoError, Result};

    // Runtime
    pub use hyperevo_runtime::engine::{EngineEvent, EngineSnapshot, EngineStats, EvolutionEngine};
    pub use hyperevo_runtime::hyperedge::{Hyperedge, HyperedgeKey, HyperedgeRegistry};
    pub use hyperevo_runtime::node::Node;
    pub use hyperevo_runtime::population::PopulationPlan;

    // Logging, metrics and export
    pub use hyperevo_runtime::log::{read_log, FixedWidthLog, GenerationSink, MemoryLog, NodeRecord, NullLog};
    pub use hyperevo_runtime::metrics::{summarize_records, GenerationSummary};
    pub use hyperevo_runtime::export::{snapshot_json, write_snapshot};
}
