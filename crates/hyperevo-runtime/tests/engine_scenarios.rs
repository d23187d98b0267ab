//! Engine scenarios
//!
//! Whole-loop behavior of the evolution engine:
//! 1. Update order (interleaved vs phased) changes what later nodes see
//! 2. Drifted members force hyperedge reformation during a run
//! 3. Shared energy sources drain in node order and never go negative
//! 4. Seeded runs are reproducible

use hyperevo_core::prelude::*;
use hyperevo_runtime::engine::{EngineEvent, EvolutionEngine};
use hyperevo_runtime::log::MemoryLog;
use hyperevo_runtime::population::PopulationPlan;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// DNA that cannot mutate this generation (energy at or below species A's
/// cost) but can still interact after regeneration.
fn frozen(strength: f64) -> Dna {
    Dna {
        interaction_strength: strength,
        mutation_rate: 0.01,
        state: 0,
        activation_threshold: 0.0,
        energy: 12.0,
        mutation_direction: MutationDirection::Up,
        species: Species::A,
    }
}

fn frozen_config(order: UpdateOrder) -> EvolutionConfig {
    let mut config = EvolutionConfig::default()
        .with_seed(11)
        .with_update_order(order);
    config.oscillatory_mutation = false;
    config
}

#[test]
fn phased_order_interacts_against_one_snapshot() {
    let mut engine = EvolutionEngine::unlogged(frozen_config(UpdateOrder::Phased)).unwrap();
    let a = engine.add_node_with_dna(frozen(0.2));
    let b = engine.add_node_with_dna(frozen(0.8));

    engine.step().unwrap();

    // Both see the mean 0.5 of the pre-interaction strengths.
    let sa = engine.node(a).unwrap().interaction_strength();
    let sb = engine.node(b).unwrap().interaction_strength();
    assert!((sa - 0.35).abs() < 1e-12, "got {}", sa);
    assert!((sb - 0.65).abs() < 1e-12, "got {}", sb);
}

#[test]
fn interleaved_order_exposes_earlier_updates() {
    let mut engine = EvolutionEngine::unlogged(frozen_config(UpdateOrder::Interleaved)).unwrap();
    let a = engine.add_node_with_dna(frozen(0.2));
    let b = engine.add_node_with_dna(frozen(0.8));

    engine.step().unwrap();

    // a moves first to 0.35; b then averages over [0.35, 0.8].
    let sa = engine.node(a).unwrap().interaction_strength();
    let sb = engine.node(b).unwrap().interaction_strength();
    assert!((sa - 0.35).abs() < 1e-12, "got {}", sa);
    assert!((sb - 0.6875).abs() < 1e-12, "got {}", sb);
}

#[test]
fn interaction_spends_threshold_after_regeneration() {
    let mut engine = EvolutionEngine::unlogged(frozen_config(UpdateOrder::Phased)).unwrap();
    let a = engine.add_node_with_dna(frozen(0.5));
    let events = engine.step().unwrap();

    assert!(events
        .iter()
        .any(|e| matches!(e, EngineEvent::Interacted { node, .. } if *node == a)));
    // 12 + 5 regenerated - 10 interaction, then +20 or -10 feedback
    let energy = engine.node(a).unwrap().energy();
    assert!(energy == 27.0 || energy == -3.0, "got {}", energy);
}

#[test]
fn drifted_member_reforms_its_hyperedge_during_a_run() {
    let mut config = EvolutionConfig::default().with_seed(21);
    config.oscillatory_mutation = false;
    config.mutation_rate_range = ValueRange::new(0.01, 0.9);
    let mut engine = EvolutionEngine::unlogged(config).unwrap();
    let a = engine.add_node(Species::A);
    let b = engine.add_node(Species::A);
    let key = engine.form_hyperedge(&[a, b], InteractionType::Cooperative).unwrap();
    let before = engine
        .registry()
        .get(InteractionType::Cooperative, &key)
        .unwrap()
        .clone();

    engine.node_mut(b).unwrap().dna_mut().mutation_rate = 0.6;
    let events = engine.step().unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::HyperedgeReformed { members, .. } if members == &vec![a, b]
    )));
    let after = engine
        .registry()
        .get(InteractionType::Cooperative, &key)
        .unwrap();
    assert_eq!(after.members(), before.members());
    assert_ne!(after.weights(), before.weights());
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(engine.stats().hyperedges_reformed, 1);
}

#[test]
fn shared_source_drains_in_node_order() {
    let mut engine = EvolutionEngine::unlogged(EvolutionConfig::default().with_seed(5)).unwrap();
    let source = engine.add_energy_source(100.0, 10.0);
    let ids: Vec<NodeId> = (0..11).map(|_| engine.add_node(Species::B)).collect();
    for id in &ids {
        engine.attach_energy_source(*id, source).unwrap();
    }
    let before: Vec<f64> = ids.iter().map(|id| engine.node(*id).unwrap().energy()).collect();

    let total = engine.drain_energy_sources().unwrap();

    assert_eq!(total, 100.0);
    assert_eq!(engine.energy_sources().get(source).unwrap().energy, 0.0);
    for (i, id) in ids.iter().enumerate() {
        let gained = engine.node(*id).unwrap().energy() - before[i];
        let expected = if i < 10 { 10.0 } else { 0.0 };
        assert_eq!(gained, expected, "node {} gained {}", i, gained);
    }

    // Nothing left to hand out.
    assert_eq!(engine.drain_energy_sources().unwrap(), 0.0);
    assert_eq!(engine.stats().energy_drawn, 100.0);
}

#[test]
fn manual_schedule_leaves_sources_untouched() {
    let mut engine = EvolutionEngine::unlogged(EvolutionConfig::default().with_seed(8)).unwrap();
    engine.populate(&PopulationPlan::default()).unwrap();
    let before = engine.energy_sources().total_energy();
    engine.evolve(10).unwrap();
    assert_eq!(engine.energy_sources().total_energy(), before);
}

#[test]
fn scheduled_draining_depletes_sources_over_generations() {
    let config = EvolutionConfig::default()
        .with_seed(8)
        .with_energy_schedule(EnergySchedule::EveryGeneration);
    let mut engine = EvolutionEngine::unlogged(config).unwrap();
    let plan = PopulationPlan {
        energy_sources: 1,
        source_energy: 50.0,
        source_replenishment: 10.0,
        ..PopulationPlan::default()
    };
    engine.populate(&plan).unwrap();

    let events = engine.step().unwrap();
    let draws = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::EnergyDrawn { .. }))
        .count();
    assert_eq!(draws, 5, "50 energy in steps of 10 feeds five nodes");

    engine.evolve(5).unwrap();
    assert_eq!(engine.energy_sources().total_energy(), 0.0);
    assert_eq!(engine.stats().energy_drawn, 50.0);
}

#[test]
fn seeded_runs_are_reproducible() {
    for order in [UpdateOrder::Interleaved, UpdateOrder::Phased] {
        let run = || {
            let config = EvolutionConfig::default().with_seed(99).with_update_order(order);
            let mut engine = EvolutionEngine::new(config, MemoryLog::new()).unwrap();
            engine.populate(&PopulationPlan::default()).unwrap();
            engine.evolve(25).unwrap();
            engine.into_sink().unwrap().records().to_vec()
        };
        assert_eq!(run(), run(), "{:?} run diverged", order);
    }
}

#[test]
fn species_b_rates_stay_in_range_until_feedback() {
    let config = EvolutionConfig::default().with_seed(31);
    let range = config.mutation_rate_range;
    let mut engine = EvolutionEngine::unlogged(config).unwrap();
    let plan = PopulationPlan {
        species_a: 0,
        species_b: 6,
        ..PopulationPlan::default()
    };
    engine.populate(&plan).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(31);
    for _ in 0..30 {
        engine.step().unwrap();
        // Feedback may push a rate out; the next species B step pulls it back in.
        for node in engine.nodes() {
            let m = node.species().mutate(node.dna(), engine.config(), &mut rng);
            assert!(range.contains(m.dna.mutation_rate));
        }
    }
}

#[test]
fn clamped_feedback_keeps_every_rate_in_range() {
    let config = EvolutionConfig::default().with_seed(41).with_clamp(ClampPolicy {
        feedback: true,
        oscillation: true,
    });
    let range = config.mutation_rate_range;
    let mut engine = EvolutionEngine::unlogged(config).unwrap();
    engine.populate(&PopulationPlan::default()).unwrap();

    for _ in 0..50 {
        engine.step().unwrap();
        for node in engine.nodes() {
            assert!(
                range.contains(node.mutation_rate()),
                "rate {} escaped with clamping on",
                node.mutation_rate()
            );
        }
    }
}
