//! Depletable energy sources shared across the population.
//!
//! Sources live in an arena owned by the engine. Nodes hold
//! [`EnergySourceId`]s into it rather than references, so a node never
//! owns a source and several nodes can draw from the same one. Draining
//! is order-sensitive: whichever node reaches a source first takes from it.

use crate::error::{HyperevoError, Result};
use crate::types::EnergySourceId;
use serde::{Deserialize, Serialize};

/// A finite energy pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySource {
    pub id: EnergySourceId,
    /// Remaining energy. Never negative, only decreases.
    pub energy: f64,
    /// Amount handed to a node per draw.
    pub replenishment: f64,
}

impl EnergySource {
    pub fn new(id: EnergySourceId, energy: f64, replenishment: f64) -> Self {
        Self {
            id,
            energy: energy.max(0.0),
            replenishment: replenishment.max(0.0),
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.energy <= 0.0
    }

    /// Take one replenishment from the pool. Returns the amount transferred,
    /// which is less than `replenishment` only when the pool runs dry, and
    /// zero once it is empty.
    pub fn draw(&mut self) -> f64 {
        if self.is_depleted() {
            return 0.0;
        }
        let amount = self.replenishment.min(self.energy);
        self.energy -= amount;
        amount
    }
}

/// Owns every energy source in a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergyArena {
    sources: Vec<EnergySource>,
}

impl EnergyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, energy: f64, replenishment: f64) -> EnergySourceId {
        let id = EnergySourceId::new(self.sources.len() as u32);
        self.sources.push(EnergySource::new(id, energy, replenishment));
        id
    }

    pub fn get(&self, id: EnergySourceId) -> Option<&EnergySource> {
        self.sources.get(id.index())
    }

    pub fn contains(&self, id: EnergySourceId) -> bool {
        id.index() < self.sources.len()
    }

    /// Draw once from a source.
    pub fn draw(&mut self, id: EnergySourceId) -> Result<f64> {
        self.sources
            .get_mut(id.index())
            .map(EnergySource::draw)
            .ok_or(HyperevoError::UnknownEnergySource(id))
    }

    pub fn sources(&self) -> &[EnergySource] {
        &self.sources
    }

    pub fn total_energy(&self) -> f64 {
        self.sources.iter().map(|s| s.energy).sum()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
