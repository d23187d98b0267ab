//! Species mutation policies.
//!
//! The policy set is closed: every node is either species A or species B,
//! and `Species::mutate` dispatches on the tag. A policy is a pure function
//! of the current DNA (plus the RNG): it returns the rewritten DNA and the
//! energy the mutation cost. The caller applies the cost.
//!
//! - **A** walks its mutation rate up and down in fixed steps when
//!   oscillation is enabled, and pays a high price for each mutation.
//! - **B** raises its mutation rate when starving and lowers it when well
//!   fed, mutates half as often, and pays a small price.

use crate::config::EvolutionConfig;
use crate::dna::Dna;
use crate::types::Species;
use rand::Rng;
use tracing::trace;

/// Species A oscillation step.
pub const OSCILLATION_STEP: f64 = 0.02;
/// Species A perturbation half-width for strength and threshold.
pub const A_PERTURBATION: f64 = 0.2;
/// Species A energy cost per mutation; also the minimum energy to mutate.
pub const A_MUTATION_COST: f64 = 15.0;

/// Species B drift applied to the mutation rate each generation.
pub const ADAPTIVE_STEP: f64 = 0.01;
/// Species B switches drift direction at this energy level.
pub const ADAPTIVE_ENERGY_PIVOT: f64 = 50.0;
/// Species B perturbation half-width for strength.
pub const B_PERTURBATION: f64 = 0.05;
/// Species B energy cost per mutation; also the minimum energy to mutate.
pub const B_MUTATION_COST: f64 = 5.0;

/// Result of one mutation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// The rewritten DNA. Its `energy` field is untouched.
    pub dna: Dna,
    /// Energy to add to the reserve (zero or negative).
    pub energy_delta: f64,
    /// Whether a mutation event fired.
    pub mutated: bool,
    /// Whether a clamp corrected the mutation rate.
    pub clamped: bool,
}

impl Species {
    /// Run this species' mutation policy against `dna`.
    pub fn mutate<R: Rng + ?Sized>(&self, dna: &Dna, config: &EvolutionConfig, rng: &mut R) -> Mutation {
        let mutation = match self {
            Species::A => mutate_oscillatory(dna, config, rng),
            Species::B => mutate_adaptive(dna, config, rng),
        };
        trace!(
            species = self.tag(),
            energy = dna.energy,
            mutation_rate = mutation.dna.mutation_rate,
            mutated = mutation.mutated,
            "mutation step"
        );
        mutation
    }
}

fn mutate_oscillatory<R: Rng + ?Sized>(dna: &Dna, config: &EvolutionConfig, rng: &mut R) -> Mutation {
    let range = config.mutation_rate_range;
    let mut next = dna.clone();
    let mut clamped = false;

    if config.oscillatory_mutation {
        next.mutation_rate += OSCILLATION_STEP * next.mutation_direction.sign();
        if range.at_or_beyond_bound(next.mutation_rate) {
            next.mutation_direction = next.mutation_direction.flipped();
            if config.clamp.oscillation {
                let bounded = range.clamp(next.mutation_rate);
                clamped = bounded != next.mutation_rate;
                next.mutation_rate = bounded;
            }
        }
    }

    let mut energy_delta = 0.0;
    let mut mutated = false;
    if dna.energy > A_MUTATION_COST && rng.gen::<f64>() < next.mutation_rate {
        next.interaction_strength += rng.gen_range(-A_PERTURBATION..A_PERTURBATION);
        next.flip_state(rng);
        next.activation_threshold += rng.gen_range(-A_PERTURBATION..A_PERTURBATION);
        energy_delta = -A_MUTATION_COST;
        mutated = true;
    }

    Mutation {
        dna: next,
        energy_delta,
        mutated,
        clamped,
    }
}

fn mutate_adaptive<R: Rng + ?Sized>(dna: &Dna, config: &EvolutionConfig, rng: &mut R) -> Mutation {
    let range = config.mutation_rate_range;
    let mut next = dna.clone();

    let drifted = if dna.energy < ADAPTIVE_ENERGY_PIVOT {
        next.mutation_rate + ADAPTIVE_STEP
    } else {
        next.mutation_rate - ADAPTIVE_STEP
    };
    let bounded = range.clamp(drifted);
    let clamped = bounded != drifted;
    next.mutation_rate = bounded;

    let mut energy_delta = 0.0;
    let mut mutated = false;
    if dna.energy > B_MUTATION_COST && rng.gen::<f64>() < next.mutation_rate / 2.0 {
        next.interaction_strength += rng.gen_range(-B_PERTURBATION..B_PERTURBATION);
        next.flip_state(rng);
        energy_delta = -B_MUTATION_COST;
        mutated = true;
    }

    Mutation {
        dna: next,
        energy_delta,
        mutated,
        clamped,
    }
}
