//! # Hyperevo Core
//!
//! Core types and policies for hyperevo populations.
//!
//! A population is a set of nodes, each carrying [`Dna`](dna::Dna) that its
//! species policy rewrites every generation. This crate holds the pieces
//! that have no I/O and no population-wide state:
//!
//! - **Species** - closed set of mutation policies (A: oscillatory, B: adaptive)
//! - **ActivationModel** - logistic activation of a weighted neighbor signal
//! - **EnergyArena** - shared, depletable energy sources
//! - **EvolutionConfig** - the parameter table handed to the engine
//!
//! ## Quick Start
//!
//! ```rust
//! use hyperevo_core::prelude::*;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = EvolutionConfig::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let dna = Dna::seeded(Species::A, &config, &mut rng);
//! let step = Species::A.mutate(&dna, &config, &mut rng);
//! assert!(step.energy_delta <= 0.0);
//! ```

pub mod activation;
pub mod config;
pub mod dna;
pub mod energy;
pub mod error;
pub mod species;
pub mod types;
pub mod prelude;
