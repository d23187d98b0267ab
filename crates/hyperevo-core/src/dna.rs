//! Node DNA - the mutable parameter bundle a node carries.
//!
//! DNA is owned by exactly one node and rewritten in place by that node's
//! species policy every generation. The energy reserve lives here too: the
//! policy reads it to decide whether a mutation is affordable, and the node
//! spends it on interactions and refills it through regeneration.

use crate::config::EvolutionConfig;
use crate::types::{MutationDirection, Species};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Evolvable parameters for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dna {
    /// Signal strength shared with neighbors during interaction.
    pub interaction_strength: f64,
    /// Probability scale for mutation events. Nominally inside
    /// `mutation_rate_range`, but feedback can push it outside.
    pub mutation_rate: f64,
    /// Binary state, 0 or 1.
    pub state: u8,
    /// Bias subtracted from the weighted neighbor signal before activation.
    pub activation_threshold: f64,
    /// Energy reserve.
    pub energy: f64,
    /// Direction of the oscillatory mutation-rate walk.
    pub mutation_direction: MutationDirection,
    pub species: Species,
}

impl Dna {
    /// Fresh DNA for a new node, drawn from the configured ranges.
    pub fn seeded<R: Rng + ?Sized>(species: Species, config: &EvolutionConfig, rng: &mut R) -> Self {
        let strength = config.interaction_strength_range;
        Self {
            interaction_strength: rng.gen_range(strength.min..=strength.max),
            mutation_rate: config.mutation_rate_range.clamp(config.global_mutation_rate),
            state: rng.gen_range(0..=1),
            activation_threshold: rng.gen::<f64>(),
            energy: config.initial_energy,
            mutation_direction: MutationDirection::Up,
            species,
        }
    }

    /// Flip the binary state: `(state + ±1) mod 2` always lands on the other value.
    pub fn flip_state<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let step: i8 = if rng.gen_bool(0.5) { 1 } else { -1 };
        self.state = (self.state as i8 + step).rem_euclid(2) as u8;
    }
}
