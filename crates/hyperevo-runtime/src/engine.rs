//! Evolution engine - the generation loop.
//!
//! The engine owns the population, the hyperedge registry, the energy
//! arena, the RNG and the log sink. Each generation:
//! 1. Every node's pre-mutation state is written to the sink
//! 2. Every node mutates, regenerates energy and interacts with the whole
//!    population, in the configured [`UpdateOrder`]
//! 3. Every node receives a coin-flip success/failure signal
//! 4. Hyperedges with a drifted member are reformed
//!
//! Runs are strictly sequential and always last exactly the requested
//! number of generations. With `config.seed` set, a run is reproducible.
//!
//! Under [`UpdateOrder::Interleaved`] a node interacts right after its own
//! mutation, so it sees the already-updated strengths of every node before
//! it and the stale strengths of every node after it. Energy sources are
//! drained in node order, so earlier nodes get first claim on shared pools.

use crate::hyperedge::{Hyperedge, HyperedgeKey, HyperedgeRegistry};
use crate::log::{GenerationSink, NodeRecord, NullLog};
use crate::metrics::{self, GenerationSummary, StepCounts};
use crate::node::{Interaction, NeighborSignal, Node};
use hyperevo_core::activation::ActivationModel;
use hyperevo_core::config::{EnergySchedule, EvolutionConfig, UpdateOrder};
use hyperevo_core::dna::Dna;
use hyperevo_core::energy::{EnergyArena, EnergySource};
use hyperevo_core::error::{HyperevoError, Result};
use hyperevo_core::types::{EnergySourceId, Generation, InteractionType, NodeId, Species};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Event emitted by the engine during a generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineEvent {
    /// A mutation event fired and its cost was paid.
    Mutated { node: NodeId, energy_cost: f64 },
    /// A node drew energy from its sources.
    EnergyDrawn { node: NodeId, amount: f64 },
    /// A node interacted with the population.
    Interacted { node: NodeId, activation: f64 },
    /// A node was too starved to interact.
    Starved { node: NodeId, energy: f64 },
    /// A node received feedback.
    Feedback { node: NodeId, success: bool },
    /// A hyperedge was replaced with freshly weighted members.
    HyperedgeReformed {
        interaction_type: InteractionType,
        members: Vec<NodeId>,
        trigger: NodeId,
    },
    /// A generation finished.
    GenerationComplete { generation: Generation, mean_fitness: f64 },
}

/// Running diagnostic counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineStats {
    pub generations: u64,
    pub mutations_applied: u64,
    /// Mutation rates silently pulled back into range.
    pub clamp_corrections: u64,
    pub interactions: u64,
    pub skipped_interactions: u64,
    pub hyperedges_reformed: u64,
    pub energy_drawn: f64,
}

/// A serializable picture of the whole engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub generation: Generation,
    pub config: EvolutionConfig,
    pub nodes: Vec<Node>,
    pub hyperedges: Vec<Hyperedge>,
    pub energy_sources: Vec<EnergySource>,
    pub stats: EngineStats,
}

/// The evolution engine.
pub struct EvolutionEngine<S: GenerationSink = NullLog> {
    config: EvolutionConfig,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    registry: HyperedgeRegistry,
    energy: EnergyArena,
    activation: ActivationModel,
    rng: ChaCha8Rng,
    sink: S,
    generation: Generation,
    next_node_id: u64,
    stats: EngineStats,
    event_history: Vec<(Generation, EngineEvent)>,
    summaries: Vec<GenerationSummary>,
}

impl EvolutionEngine<NullLog> {
    /// Create an engine that logs nowhere.
    pub fn unlogged(config: EvolutionConfig) -> Result<Self> {
        Self::new(config, NullLog)
    }
}

impl<S: GenerationSink> EvolutionEngine<S> {
    /// Create an engine with the given configuration and log sink.
    ///
    /// The configuration is validated here; nothing is read from anywhere
    /// else for the rest of the run.
    pub fn new(config: EvolutionConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            registry: HyperedgeRegistry::new(config.interaction_strength_range, config.drift_threshold),
            config,
            nodes: Vec::new(),
            index: HashMap::new(),
            energy: EnergyArena::new(),
            activation: ActivationModel::new(),
            rng,
            sink,
            generation: 0,
            next_node_id: 0,
            stats: EngineStats::default(),
            event_history: Vec::new(),
            summaries: Vec::new(),
        })
    }

    /// Add a node with freshly seeded DNA.
    pub fn add_node(&mut self, species: Species) -> NodeId {
        let dna = Dna::seeded(species, &self.config, &mut self.rng);
        self.add_node_with_dna(dna)
    }

    /// Add a node with the given DNA.
    pub fn add_node_with_dna(&mut self, dna: Dna) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node::new(id, dna, self.config.initial_fitness));
        id
    }

    pub fn add_energy_source(&mut self, energy: f64, replenishment: f64) -> EnergySourceId {
        self.energy.add(energy, replenishment)
    }

    pub fn attach_energy_source(&mut self, node: NodeId, source: EnergySourceId) -> Result<()> {
        if !self.energy.contains(source) {
            return Err(HyperevoError::UnknownEnergySource(source));
        }
        self.node_mut(node)
            .ok_or(HyperevoError::UnknownNode(node))?
            .attach_energy_source(source);
        Ok(())
    }

    /// Group existing nodes into a hyperedge.
    pub fn form_hyperedge(
        &mut self,
        members: &[NodeId],
        interaction_type: InteractionType,
    ) -> Result<HyperedgeKey> {
        if let Some(missing) = members.iter().find(|id| !self.index.contains_key(id)) {
            return Err(HyperevoError::UnknownNode(*missing));
        }
        self.registry
            .form_new_hyperedge(members, interaction_type, &mut self.rng)
    }

    /// Run exactly `generations` generations and return their summaries.
    pub fn evolve(&mut self, generations: u64) -> Result<Vec<GenerationSummary>> {
        let first = self.summaries.len();
        for _ in 0..generations {
            self.step()?;
        }
        Ok(self.summaries[first..].to_vec())
    }

    /// Run a single generation.
    pub fn step(&mut self) -> Result<Vec<EngineEvent>> {
        let generation = self.generation;
        let mut events = Vec::new();
        let mut counts = StepCounts::default();

        // Phase 1: log pre-mutation state
        for node in &self.nodes {
            self.sink.record(&NodeRecord::capture(generation, node))?;
        }

        // Phase 2: mutate, regenerate, interact
        match self.config.update_order {
            UpdateOrder::Interleaved => {
                for idx in 0..self.nodes.len() {
                    self.prepare_node(idx, &mut events, &mut counts)?;
                    let signals = self.signals();
                    self.interact_node(idx, &signals, &mut events, &mut counts)?;
                }
            }
            UpdateOrder::Phased => {
                for idx in 0..self.nodes.len() {
                    self.prepare_node(idx, &mut events, &mut counts)?;
                }
                let signals = self.signals();
                for idx in 0..self.nodes.len() {
                    self.interact_node(idx, &signals, &mut events, &mut counts)?;
                }
            }
        }

        // Phase 3: feedback
        for node in self.nodes.iter_mut() {
            let success = self.rng.gen_bool(0.5);
            if node.receive_feedback(success, &self.config) {
                self.stats.clamp_corrections += 1;
            }
            events.push(EngineEvent::Feedback {
                node: node.id(),
                success,
            });
        }

        // Phase 4: reform drifted hyperedges
        let rates: HashMap<NodeId, f64> = self
            .nodes
            .iter()
            .map(|n| (n.id(), n.mutation_rate()))
            .collect();
        let reformed = self
            .registry
            .evolve_hyperedges(|id| rates.get(&id).copied(), &mut self.rng)?;
        counts.hyperedges_reformed = reformed.len();
        self.stats.hyperedges_reformed += reformed.len() as u64;
        events.extend(reformed.into_iter().map(|r| EngineEvent::HyperedgeReformed {
            interaction_type: r.interaction_type,
            members: r.key.0,
            trigger: r.trigger,
        }));

        self.sink.flush()?;

        let summary = metrics::summarize(generation, &self.nodes, counts);
        info!(
            generation,
            population = summary.population,
            mean_fitness = summary.mean_fitness,
            mean_mutation_rate = summary.mean_mutation_rate,
            reformed = summary.hyperedges_reformed,
            "generation complete"
        );
        events.push(EngineEvent::GenerationComplete {
            generation,
            mean_fitness: summary.mean_fitness,
        });
        self.summaries.push(summary);

        self.generation += 1;
        self.stats.generations += 1;
        self.event_history
            .extend(events.iter().cloned().map(|e| (generation, e)));

        Ok(events)
    }

    /// Let every node draw once from each of its energy sources, in node
    /// order. Returns the total energy transferred. Draws are recorded in
    /// the event history under the upcoming generation.
    pub fn drain_energy_sources(&mut self) -> Result<f64> {
        let mut total = 0.0;
        for node in self.nodes.iter_mut() {
            let amount = node.interact_with_energy_sources(&mut self.energy)?;
            if amount > 0.0 {
                total += amount;
                self.stats.energy_drawn += amount;
                self.event_history.push((
                    self.generation,
                    EngineEvent::EnergyDrawn {
                        node: node.id(),
                        amount,
                    },
                ));
            }
        }
        Ok(total)
    }

    fn prepare_node(
        &mut self,
        idx: usize,
        events: &mut Vec<EngineEvent>,
        counts: &mut StepCounts,
    ) -> Result<()> {
        let node = &mut self.nodes[idx];
        let id = node.id();

        let mutation = node.mutate(&self.config, &mut self.rng);
        if mutation.clamped {
            self.stats.clamp_corrections += 1;
            debug!(node = %id, rate = mutation.dna.mutation_rate, "mutation rate clamped");
        }
        if mutation.mutated {
            counts.mutations += 1;
            self.stats.mutations_applied += 1;
            events.push(EngineEvent::Mutated {
                node: id,
                energy_cost: -mutation.energy_delta,
            });
        }

        node.regenerate_energy(&self.config);

        if self.config.energy_sources == EnergySchedule::EveryGeneration {
            let amount = node.interact_with_energy_sources(&mut self.energy)?;
            if amount > 0.0 {
                self.stats.energy_drawn += amount;
                events.push(EngineEvent::EnergyDrawn { node: id, amount });
            }
        }
        Ok(())
    }

    fn interact_node(
        &mut self,
        idx: usize,
        signals: &[NeighborSignal],
        events: &mut Vec<EngineEvent>,
        counts: &mut StepCounts,
    ) -> Result<()> {
        let id = self.nodes[idx].id();
        let weights = self.registry.weights_for(id);
        let outcome = self.nodes[idx].interact(signals, &weights, &self.activation, &self.config)?;
        match outcome {
            Interaction::Interacted { activation, .. } => {
                counts.interactions += 1;
                self.stats.interactions += 1;
                events.push(EngineEvent::Interacted { node: id, activation });
            }
            Interaction::Starved { energy } => {
                counts.starved += 1;
                self.stats.skipped_interactions += 1;
                events.push(EngineEvent::Starved { node: id, energy });
            }
        }
        Ok(())
    }

    fn signals(&self) -> Vec<NeighborSignal> {
        self.nodes.iter().map(Node::signal).collect()
    }

    /// A serializable picture of the current state.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            generation: self.generation,
            config: self.config.clone(),
            nodes: self.nodes.clone(),
            hyperedges: self.registry.iter().cloned().collect(),
            energy_sources: self.energy.sources().to_vec(),
            stats: self.stats.clone(),
        }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = *self.index.get(&id)?;
        self.nodes.get_mut(idx)
    }

    pub fn registry(&self) -> &HyperedgeRegistry {
        &self.registry
    }

    pub fn energy_sources(&self) -> &EnergyArena {
        &self.energy
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn event_history(&self) -> &[(Generation, EngineEvent)] {
        &self.event_history
    }

    pub fn summaries(&self) -> &[GenerationSummary] {
        &self.summaries
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flush and hand back the sink.
    pub fn into_sink(mut self) -> Result<S> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use hyperevo_core::types::MutationDirection;

    fn seeded(seed: u64) -> EvolutionConfig {
        EvolutionConfig::default().with_seed(seed)
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut config = seeded(1);
        config.energy_threshold = f64::NAN;
        assert!(EvolutionEngine::unlogged(config).is_err());
    }

    #[test]
    fn node_ids_are_sequential() {
        let mut engine = EvolutionEngine::unlogged(seeded(1)).unwrap();
        let a = engine.add_node(Species::A);
        let b = engine.add_node(Species::B);
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(engine.node(b).unwrap().species(), Species::B);
        assert_eq!(engine.node(b).unwrap().fitness(), 1.0);
    }

    #[test]
    fn hyperedge_with_unknown_member_is_rejected() {
        let mut engine = EvolutionEngine::unlogged(seeded(1)).unwrap();
        let a = engine.add_node(Species::A);
        let err = engine
            .form_hyperedge(&[a, NodeId(42)], InteractionType::Cooperative)
            .unwrap_err();
        assert!(matches!(err, HyperevoError::UnknownNode(NodeId(42))));
    }

    #[test]
    fn logs_pre_mutation_state_once_per_node_per_generation() {
        let mut engine = EvolutionEngine::new(seeded(3), MemoryLog::new()).unwrap();
        let ids: Vec<NodeId> = (0..4)
            .map(|i| engine.add_node(if i % 2 == 0 { Species::A } else { Species::B }))
            .collect();
        let initial = engine.node(ids[0]).unwrap().clone();

        engine.evolve(5).unwrap();

        let log = engine.sink();
        assert_eq!(log.records().len(), 20);
        for g in 0..5 {
            assert_eq!(log.for_generation(g).count(), 4);
        }
        let first = log.for_node(ids[0]).next().unwrap();
        assert_eq!(first.generation, 0);
        assert_eq!(first.mutation_rate, initial.mutation_rate());
        assert_eq!(first.energy, initial.energy());
        assert_eq!(first.activation_level, 0.0);
    }

    #[test]
    fn evolve_runs_exact_generation_count() {
        let mut engine = EvolutionEngine::unlogged(seeded(4)).unwrap();
        for _ in 0..3 {
            engine.add_node(Species::B);
        }
        let summaries = engine.evolve(7).unwrap();
        assert_eq!(summaries.len(), 7);
        assert_eq!(engine.generation(), 7);
        assert_eq!(engine.stats().generations, 7);
        let more = engine.evolve(2).unwrap();
        assert_eq!(more[0].generation, 7);
        assert_eq!(engine.summaries().len(), 9);
    }

    #[test]
    fn starved_node_is_skipped_in_the_loop() {
        let mut config = seeded(5);
        config.environment_energy = 0.0;
        config.oscillatory_mutation = false;
        let mut engine = EvolutionEngine::unlogged(config).unwrap();
        let id = engine.add_node_with_dna(Dna {
            interaction_strength: 0.4,
            mutation_rate: 0.01,
            state: 0,
            activation_threshold: 0.5,
            energy: 5.0,
            mutation_direction: MutationDirection::Up,
            species: Species::A,
        });

        let events = engine.step().unwrap();
        assert!(events.contains(&EngineEvent::Starved { node: id, energy: 5.0 }));
        assert_eq!(engine.stats().skipped_interactions, 1);
        assert_eq!(engine.node(id).unwrap().interaction_strength(), 0.4);
        assert_eq!(engine.node(id).unwrap().activation_level(), 0.0);
    }

    #[test]
    fn manual_drain_records_energy_events() {
        let mut engine = EvolutionEngine::unlogged(seeded(7)).unwrap();
        let source = engine.add_energy_source(15.0, 10.0);
        let a = engine.add_node(Species::B);
        let b = engine.add_node(Species::B);
        let c = engine.add_node(Species::B);
        for id in [a, b, c] {
            engine.attach_energy_source(id, source).unwrap();
        }

        assert_eq!(engine.drain_energy_sources().unwrap(), 15.0);
        assert_eq!(
            engine.event_history(),
            &[
                (0, EngineEvent::EnergyDrawn { node: a, amount: 10.0 }),
                (0, EngineEvent::EnergyDrawn { node: b, amount: 5.0 }),
            ]
        );
        assert_eq!(engine.stats().energy_drawn, 15.0);
    }

    #[test]
    fn empty_population_still_counts_generations() {
        let mut engine = EvolutionEngine::new(seeded(6), MemoryLog::new()).unwrap();
        engine.evolve(3).unwrap();
        assert_eq!(engine.generation(), 3);
        assert!(engine.sink().records().is_empty());
    }
}
