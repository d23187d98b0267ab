//! Population seeding.
//!
//! A `PopulationPlan` describes the starting population declaratively:
//! how many nodes of each species, how they are grouped into hyperedges,
//! and which shared energy pools they can draw from.

use crate::engine::EvolutionEngine;
use crate::log::GenerationSink;
use hyperevo_core::error::{HyperevoError, Result};
use hyperevo_core::types::{InteractionType, NodeId, Species};
use serde::{Deserialize, Serialize};

/// Starting population layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationPlan {
    /// Number of species A nodes (default: 5).
    pub species_a: usize,
    /// Number of species B nodes (default: 5).
    pub species_b: usize,
    /// Members per hyperedge; consecutive nodes are grouped (default: 3).
    pub hyperedge_size: usize,
    /// Number of shared energy sources (default: 2).
    pub energy_sources: usize,
    /// Starting energy of each source (default: 100).
    pub source_energy: f64,
    /// Energy handed out per draw (default: 10).
    pub source_replenishment: f64,
}

impl Default for PopulationPlan {
    fn default() -> Self {
        Self {
            species_a: 5,
            species_b: 5,
            hyperedge_size: 3,
            energy_sources: 2,
            source_energy: 100.0,
            source_replenishment: 10.0,
        }
    }
}

impl PopulationPlan {
    pub fn total_nodes(&self) -> usize {
        self.species_a + self.species_b
    }
}

impl<S: GenerationSink> EvolutionEngine<S> {
    /// Seed the population from a plan.
    ///
    /// Species A nodes are created first, then species B. Nodes are grouped
    /// into hyperedges of `hyperedge_size` consecutive members, alternating
    /// cooperative and competitive; a short final group is kept. Energy
    /// sources are attached round-robin.
    pub fn populate(&mut self, plan: &PopulationPlan) -> Result<Vec<NodeId>> {
        if plan.hyperedge_size == 0 {
            return Err(HyperevoError::invalid_config(
                "hyperedge_size",
                "0",
                "hyperedges need at least one member",
            ));
        }

        let mut ids = Vec::with_capacity(plan.total_nodes());
        for _ in 0..plan.species_a {
            ids.push(self.add_node(Species::A));
        }
        for _ in 0..plan.species_b {
            ids.push(self.add_node(Species::B));
        }

        let sources: Vec<_> = (0..plan.energy_sources)
            .map(|_| self.add_energy_source(plan.source_energy, plan.source_replenishment))
            .collect();
        if !sources.is_empty() {
            for (i, id) in ids.iter().enumerate() {
                self.attach_energy_source(*id, sources[i % sources.len()])?;
            }
        }

        for (i, group) in ids.chunks(plan.hyperedge_size).enumerate() {
            let interaction_type = if i % 2 == 0 {
                InteractionType::Cooperative
            } else {
                InteractionType::Competitive
            };
            self.form_hyperedge(group, interaction_type)?;
        }

        Ok(ids)
    }
}
