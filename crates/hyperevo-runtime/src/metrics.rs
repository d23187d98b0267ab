//! Population metrics per generation.
//!
//! Summaries are computed from node state after a generation finishes, and
//! can also be rebuilt from a log (where they describe the state at the
//! start of each generation instead).

use crate::log::NodeRecord;
use crate::node::Node;
use hyperevo_core::types::{Generation, Species};
use serde::Serialize;
use std::collections::BTreeMap;

/// Metrics for one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: Generation,
    pub population: usize,
    pub species_a: usize,
    pub species_b: usize,
    pub mean_fitness: f64,
    pub max_fitness: f64,
    pub mean_mutation_rate: f64,
    /// Standard deviation of mutation rates (divergence across the population).
    pub mutation_rate_spread: f64,
    pub mean_energy: f64,
    pub mean_activation: f64,
    pub mean_interaction_strength: f64,
    /// Nodes that interacted this generation.
    pub interactions: usize,
    /// Nodes too starved to interact this generation.
    pub starved: usize,
    /// Mutation events that fired this generation.
    pub mutations: usize,
    pub hyperedges_reformed: usize,
}

/// Per-generation counts gathered by the engine while stepping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounts {
    pub interactions: usize,
    pub starved: usize,
    pub mutations: usize,
    pub hyperedges_reformed: usize,
}

/// Summarize the population as it stands.
pub fn summarize(generation: Generation, nodes: &[Node], counts: StepCounts) -> GenerationSummary {
    let samples: Vec<Sample> = nodes
        .iter()
        .map(|n| Sample {
            species: n.species(),
            fitness: n.fitness(),
            mutation_rate: n.mutation_rate(),
            energy: n.energy(),
            activation: n.activation_level(),
            strength: n.interaction_strength(),
        })
        .collect();

    let mut summary = summarize_samples(generation, &samples);
    summary.interactions = counts.interactions;
    summary.starved = counts.starved;
    summary.mutations = counts.mutations;
    summary.hyperedges_reformed = counts.hyperedges_reformed;
    summary
}

/// Rebuild one summary per generation from logged records.
pub fn summarize_records(records: &[NodeRecord]) -> Vec<GenerationSummary> {
    let mut by_generation: BTreeMap<Generation, Vec<Sample>> = BTreeMap::new();
    for r in records {
        by_generation.entry(r.generation).or_default().push(Sample {
            species: r.species,
            fitness: r.fitness,
            mutation_rate: r.mutation_rate,
            energy: r.energy,
            activation: r.activation_level,
            strength: r.interaction_strength,
        });
    }

    by_generation
        .into_iter()
        .map(|(generation, samples)| summarize_samples(generation, &samples))
        .collect()
}

struct Sample {
    species: Species,
    fitness: f64,
    mutation_rate: f64,
    energy: f64,
    activation: f64,
    strength: f64,
}

fn summarize_samples(generation: Generation, samples: &[Sample]) -> GenerationSummary {
    if samples.is_empty() {
        return GenerationSummary {
            generation,
            ..GenerationSummary::default()
        };
    }

    let rates: Vec<f64> = samples.iter().map(|s| s.mutation_rate).collect();

    GenerationSummary {
        generation,
        population: samples.len(),
        species_a: samples.iter().filter(|s| s.species == Species::A).count(),
        species_b: samples.iter().filter(|s| s.species == Species::B).count(),
        mean_fitness: mean(samples.iter().map(|s| s.fitness)),
        max_fitness: samples.iter().map(|s| s.fitness).fold(f64::MIN, f64::max),
        mean_mutation_rate: mean(rates.iter().copied()),
        mutation_rate_spread: std_dev(&rates),
        mean_energy: mean(samples.iter().map(|s| s.energy)),
        mean_activation: mean(samples.iter().map(|s| s.activation)),
        mean_interaction_strength: mean(samples.iter().map(|s| s.strength)),
        ..GenerationSummary::default()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}
