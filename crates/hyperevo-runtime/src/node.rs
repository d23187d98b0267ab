//! Node - one member of the population.
//!
//! A node owns its DNA and keeps the two values the engine computes for it:
//! the activation level from its last interaction and a fitness score
//! driven by feedback. Each generation the engine calls, in order:
//!
//! 1. `mutate` - species policy rewrites the DNA and charges its cost
//! 2. `regenerate_energy` - capped additive refill
//! 3. `interact` - pull strength toward the neighborhood, recompute activation
//! 4. `receive_feedback` - multiplicative fitness/rate update, additive energy

use hyperevo_core::activation::ActivationModel;
use hyperevo_core::config::EvolutionConfig;
use hyperevo_core::dna::Dna;
use hyperevo_core::energy::EnergyArena;
use hyperevo_core::error::{HyperevoError, Result};
use hyperevo_core::species::Mutation;
use hyperevo_core::types::{EnergySourceId, NodeId, Species};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Multiplier applied to mutation rate and fitness on success.
pub const SUCCESS_FACTOR: f64 = 1.1;
/// Multiplier applied to mutation rate and fitness on failure.
pub const FAILURE_FACTOR: f64 = 0.9;
/// Energy granted on success.
pub const SUCCESS_ENERGY: f64 = 20.0;
/// Energy removed on failure.
pub const FAILURE_ENERGY: f64 = -10.0;

/// What a neighbor contributes to an interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSignal {
    pub id: NodeId,
    pub interaction_strength: f64,
}

/// Neighbor weights for one interacting node. Missing neighbors weigh 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightLookup {
    weights: HashMap<NodeId, f64>,
}

impl WeightLookup {
    pub fn new(weights: HashMap<NodeId, f64>) -> Self {
        Self { weights }
    }

    pub fn weight(&self, id: &NodeId) -> f64 {
        self.weights.get(id).copied().unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Outcome of `Node::interact`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// The node had enough energy and updated its strength and activation.
    Interacted { weighted_sum: f64, activation: f64 },
    /// Energy was at or below the threshold; nothing changed.
    Starved { energy: f64 },
}

/// A population member.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    id: NodeId,
    dna: Dna,
    activation_level: f64,
    fitness: f64,
    energy_sources: Vec<EnergySourceId>,
}

impl Node {
    pub fn new(id: NodeId, dna: Dna, fitness: f64) -> Self {
        Self {
            id,
            dna,
            activation_level: 0.0,
            fitness,
            energy_sources: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn dna(&self) -> &Dna {
        &self.dna
    }

    pub fn dna_mut(&mut self) -> &mut Dna {
        &mut self.dna
    }

    pub fn species(&self) -> Species {
        self.dna.species
    }

    pub fn energy(&self) -> f64 {
        self.dna.energy
    }

    pub fn mutation_rate(&self) -> f64 {
        self.dna.mutation_rate
    }

    pub fn interaction_strength(&self) -> f64 {
        self.dna.interaction_strength
    }

    pub fn activation_level(&self) -> f64 {
        self.activation_level
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn energy_sources(&self) -> &[EnergySourceId] {
        &self.energy_sources
    }

    pub fn signal(&self) -> NeighborSignal {
        NeighborSignal {
            id: self.id,
            interaction_strength: self.dna.interaction_strength,
        }
    }

    /// Associate an energy source. Duplicates are ignored. The engine checks
    /// the id against its arena first.
    pub(crate) fn attach_energy_source(&mut self, source: EnergySourceId) {
        if !self.energy_sources.contains(&source) {
            self.energy_sources.push(source);
        }
    }

    /// Run the species policy and charge its energy cost.
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &EvolutionConfig, rng: &mut R) -> Mutation {
        let mutation = self.dna.species.mutate(&self.dna, config, rng);
        let energy = self.dna.energy + mutation.energy_delta;
        self.dna = mutation.dna.clone();
        self.dna.energy = energy;
        mutation
    }

    /// Add the environment's energy, capped at `energy_cap`.
    pub fn regenerate_energy(&mut self, config: &EvolutionConfig) {
        self.dna.energy = (self.dna.energy + config.environment_energy).min(config.energy_cap);
    }

    /// Move interaction strength halfway toward the neighborhood mean and
    /// recompute activation from the weighted neighbor sum.
    ///
    /// Requires at least one neighbor. When energy is at or below
    /// `energy_threshold` the node keeps last generation's strength and
    /// activation.
    pub fn interact(
        &mut self,
        neighbors: &[NeighborSignal],
        weights: &WeightLookup,
        model: &ActivationModel,
        config: &EvolutionConfig,
    ) -> Result<Interaction> {
        if neighbors.is_empty() {
            return Err(HyperevoError::EmptyNeighborhood { node: self.id });
        }

        if self.dna.energy <= config.energy_threshold {
            debug!(node = %self.id, energy = self.dna.energy, "interaction skipped: starved");
            return Ok(Interaction::Starved {
                energy: self.dna.energy,
            });
        }

        let mean = neighbors.iter().map(|n| n.interaction_strength).sum::<f64>()
            / neighbors.len() as f64;
        let weighted_sum: f64 = neighbors
            .iter()
            .map(|n| n.interaction_strength * weights.weight(&n.id))
            .sum();

        self.dna.interaction_strength = (self.dna.interaction_strength + mean) / 2.0;
        self.activation_level = model.activate(weighted_sum, self.dna.activation_threshold);
        self.dna.energy -= config.energy_threshold;

        Ok(Interaction::Interacted {
            weighted_sum,
            activation: self.activation_level,
        })
    }

    /// Apply a success/failure signal. Returns true when the optional
    /// feedback clamp corrected the mutation rate.
    pub fn receive_feedback(&mut self, success: bool, config: &EvolutionConfig) -> bool {
        let (factor, energy) = if success {
            (SUCCESS_FACTOR, SUCCESS_ENERGY)
        } else {
            (FAILURE_FACTOR, FAILURE_ENERGY)
        };
        self.dna.mutation_rate *= factor;
        self.fitness *= factor;
        self.dna.energy += energy;

        if config.clamp.feedback {
            let bounded = config.mutation_rate_range.clamp(self.dna.mutation_rate);
            let clamped = bounded != self.dna.mutation_rate;
            self.dna.mutation_rate = bounded;
            return clamped;
        }
        false
    }

    /// Draw once from every associated source that still has energy.
    /// Returns the total energy received. Nothing is drawn if any
    /// associated source is missing from `arena`.
    pub fn interact_with_energy_sources(&mut self, arena: &mut EnergyArena) -> Result<f64> {
        if let Some(&missing) = self.energy_sources.iter().find(|id| !arena.contains(**id)) {
            return Err(HyperevoError::UnknownEnergySource(missing));
        }
        let mut received = 0.0;
        for &source in &self.energy_sources {
            received += arena.draw(source)?;
        }
        self.dna.energy += received;
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperevo_core::types::MutationDirection;
    use rand::SeedableRng;

    fn node(id: u64, strength: f64, energy: f64) -> Node {
        Node::new(
            NodeId(id),
            Dna {
                interaction_strength: strength,
                mutation_rate: 0.2,
                state: 1,
                activation_threshold: 0.0,
                energy,
                mutation_direction: MutationDirection::Up,
                species: Species::B,
            },
            1.0,
        )
    }

    #[test]
    fn regeneration_is_capped() {
        let config = EvolutionConfig::default();
        let mut n = node(0, 0.5, 98.0);
        n.regenerate_energy(&config);
        assert_eq!(n.energy(), 100.0);
        n.regenerate_energy(&config);
        assert_eq!(n.energy(), 100.0);

        let mut low = node(1, 0.5, 40.0);
        low.regenerate_energy(&config);
        assert_eq!(low.energy(), 45.0);
    }

    #[test]
    fn interaction_averages_and_pays_threshold() {
        let config = EvolutionConfig::default();
        let model = ActivationModel::new();
        let mut n = node(0, 0.2, 50.0);
        let neighbors = [
            NeighborSignal { id: NodeId(1), interaction_strength: 0.4 },
            NeighborSignal { id: NodeId(2), interaction_strength: 0.8 },
        ];
        let mut weights = HashMap::new();
        weights.insert(NodeId(1), 0.5);
        let lookup = WeightLookup::new(weights);

        let outcome = n.interact(&neighbors, &lookup, &model, &config).unwrap();
        // mean 0.6 -> (0.2 + 0.6) / 2; weighted 0.4*0.5 + 0.8*1.0
        assert!((n.interaction_strength() - 0.4).abs() < 1e-12);
        match outcome {
            Interaction::Interacted { weighted_sum, activation } => {
                assert!((weighted_sum - 1.0).abs() < 1e-12);
                assert!((activation - model.activate(1.0, 0.0)).abs() < 1e-12);
            }
            other => panic!("expected interaction, got {:?}", other),
        }
        assert_eq!(n.energy(), 40.0);
    }

    #[test]
    fn starved_node_keeps_previous_values() {
        let config = EvolutionConfig::default();
        let model = ActivationModel::new();
        let mut n = node(0, 0.3, 5.0);
        let neighbors = [NeighborSignal { id: NodeId(1), interaction_strength: 0.9 }];

        let outcome = n
            .interact(&neighbors, &WeightLookup::default(), &model, &config)
            .unwrap();
        assert_eq!(outcome, Interaction::Starved { energy: 5.0 });
        assert_eq!(n.interaction_strength(), 0.3);
        assert_eq!(n.activation_level(), 0.0);
        assert_eq!(n.energy(), 5.0);
    }

    #[test]
    fn empty_neighborhood_is_an_error() {
        let config = EvolutionConfig::default();
        let mut n = node(4, 0.3, 50.0);
        let err = n
            .interact(&[], &WeightLookup::default(), &ActivationModel::new(), &config)
            .unwrap_err();
        assert!(matches!(err, HyperevoError::EmptyNeighborhood { node } if node == NodeId(4)));
    }

    #[test]
    fn feedback_scales_rate_and_fitness() {
        let config = EvolutionConfig::default();
        let mut n = node(0, 0.3, 50.0);
        n.receive_feedback(true, &config);
        assert!((n.mutation_rate() - 0.22).abs() < 1e-12);
        assert!((n.fitness() - 1.1).abs() < 1e-12);
        assert_eq!(n.energy(), 70.0);

        n.receive_feedback(false, &config);
        assert!((n.mutation_rate() - 0.198).abs() < 1e-12);
        assert!((n.fitness() - 0.99).abs() < 1e-12);
        assert_eq!(n.energy(), 60.0);
    }

    #[test]
    fn feedback_drift_is_unclamped_by_default() {
        let config = EvolutionConfig::default();
        let mut n = node(0, 0.3, 50.0);
        n.dna_mut().mutation_rate = 0.59;
        assert!(!n.receive_feedback(true, &config));
        assert!(n.mutation_rate() > config.mutation_rate_range.max);
    }

    #[test]
    fn feedback_clamp_option_corrects_drift() {
        let mut config = EvolutionConfig::default();
        config.clamp.feedback = true;
        let mut n = node(0, 0.3, 50.0);
        n.dna_mut().mutation_rate = 0.59;
        assert!(n.receive_feedback(true, &config));
        assert_eq!(n.mutation_rate(), config.mutation_rate_range.max);
    }

    #[test]
    fn energy_sources_feed_the_node() {
        let mut arena = EnergyArena::new();
        let a = arena.add(100.0, 10.0);
        let b = arena.add(3.0, 10.0);
        let mut n = node(0, 0.3, 20.0);
        n.attach_energy_source(a);
        n.attach_energy_source(b);
        n.attach_energy_source(a);
        assert_eq!(n.energy_sources().len(), 2);

        assert_eq!(n.interact_with_energy_sources(&mut arena).unwrap(), 13.0);
        assert_eq!(n.energy(), 33.0);
        assert_eq!(n.interact_with_energy_sources(&mut arena).unwrap(), 10.0);
        assert_eq!(arena.get(b).unwrap().energy, 0.0);
    }

    #[test]
    fn unknown_source_aborts_before_any_draw() {
        let mut arena = EnergyArena::new();
        let a = arena.add(100.0, 10.0);
        let mut n = node(0, 0.3, 100.0);
        n.attach_energy_source(a);
        n.attach_energy_source(EnergySourceId(9));

        let err = n.interact_with_energy_sources(&mut arena).unwrap_err();
        assert!(matches!(err, HyperevoError::UnknownEnergySource(EnergySourceId(9))));
        assert_eq!(arena.get(a).unwrap().energy, 100.0);
        assert_eq!(n.energy(), 100.0);
    }

    #[test]
    fn feedback_drift_survives_species_a_step_without_oscillation() {
        let mut config = EvolutionConfig::default();
        config.oscillatory_mutation = false;
        let mut n = node(0, 0.3, 0.0);
        n.dna_mut().species = Species::A;
        n.dna_mut().mutation_rate = 0.59;

        assert!(!n.receive_feedback(true, &config));
        let drifted = n.mutation_rate();
        assert!(drifted > config.mutation_rate_range.max);

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        let m = n.mutate(&config, &mut rng);
        assert!(!m.clamped);
        assert_eq!(n.mutation_rate(), drifted);
    }
}
