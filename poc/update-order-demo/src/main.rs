//! Update Order Demo: Interleaved vs Phased Generations
//!
//! Shows how much the order of updates inside a generation shapes the
//! population, with everything else held fixed.
//!
//! Protocol:
//! 1. Seed two engines with the same config, seed and population plan
//! 2. Run one with interleaved updates (each node interacts right after mutating)
//! 3. Run the other phased (everyone mutates, then everyone interacts)
//! 4. Compare fitness, mutation-rate divergence and hyperedge churn at checkpoints
//! 5. Write both final snapshots as JSON

use hyperevo_core::prelude::*;
use hyperevo_runtime::engine::EvolutionEngine;
use hyperevo_runtime::export::snapshot_json;
use hyperevo_runtime::metrics::GenerationSummary;
use hyperevo_runtime::population::PopulationPlan;
use serde::Serialize;

const SEED: u64 = 42;
const GENERATIONS: u64 = 300;
const CHECKPOINTS: [u64; 4] = [50, 100, 200, 300];

#[derive(Serialize)]
struct ConditionReport {
    order: UpdateOrder,
    checkpoints: Vec<GenerationSummary>,
    mutations: u64,
    clamp_corrections: u64,
    starved: u64,
    hyperedges_reformed: u64,
}

fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  Update Order: Interleaved vs Phased Generations    ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let plan = PopulationPlan {
        species_a: 8,
        species_b: 8,
        hyperedge_size: 4,
        energy_sources: 2,
        source_energy: 400.0,
        source_replenishment: 10.0,
    };

    println!("── Condition 1: Interleaved ──────────────────────────");
    let (interleaved, interleaved_json) = run_condition(UpdateOrder::Interleaved, &plan)?;
    println!("── Condition 2: Phased ───────────────────────────────");
    let (phased, phased_json) = run_condition(UpdateOrder::Phased, &plan)?;

    println!();
    println!("── Comparison at Checkpoints ──────────────────────────");
    println!();
    println!("  {:>12} │ {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Condition", "Fitness", "Max", "Rate", "Spread", "Reform");
    println!("  {:─>12}─┼─{:─>8}─{:─>8}─{:─>8}─{:─>8}─{:─>8}",
        "", "", "", "", "", "");

    for (i, generation) in CHECKPOINTS.iter().enumerate() {
        println!("  Gen {}:", generation);
        for (name, report) in [("Interleaved", &interleaved), ("Phased", &phased)] {
            if let Some(s) = report.checkpoints.get(i) {
                println!("    {:>10} │ {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8}",
                    name,
                    s.mean_fitness,
                    s.max_fitness,
                    s.mean_mutation_rate,
                    s.mutation_rate_spread,
                    s.hyperedges_reformed);
            }
        }
    }

    println!();
    println!("── Totals ────────────────────────────────────────────");
    for (name, report) in [("Interleaved", &interleaved), ("Phased", &phased)] {
        println!("  {:>11}: {} mutations, {} clamped, {} starved, {} reformations",
            name,
            report.mutations,
            report.clamp_corrections,
            report.starved,
            report.hyperedges_reformed);
    }

    let out_dir = std::path::Path::new("poc/update-order-demo/output");
    std::fs::create_dir_all(out_dir)?;
    std::fs::write(out_dir.join("interleaved_snapshot.json"), interleaved_json)?;
    std::fs::write(out_dir.join("phased_snapshot.json"), phased_json)?;
    let report = serde_json::to_string_pretty(&[&interleaved, &phased])?;
    std::fs::write(out_dir.join("comparison.json"), report)?;

    println!();
    println!("  Output written to {}", out_dir.display());
    Ok(())
}

fn run_condition(order: UpdateOrder, plan: &PopulationPlan) -> Result<(ConditionReport, String)> {
    let config = EvolutionConfig::default()
        .with_seed(SEED)
        .with_update_order(order)
        .with_energy_schedule(EnergySchedule::EveryGeneration);
    let mut engine = EvolutionEngine::unlogged(config)?;
    engine.populate(plan)?;

    let summaries = engine.evolve(GENERATIONS)?;
    let checkpoints: Vec<GenerationSummary> = CHECKPOINTS
        .iter()
        .filter_map(|g| summaries.iter().find(|s| s.generation + 1 == *g).cloned())
        .collect();

    let stats = engine.stats();
    println!("  {} generations, {} nodes, {} hyperedges, {:.1} energy drawn",
        engine.generation(),
        engine.nodes().len(),
        engine.registry().len(),
        stats.energy_drawn);

    let report = ConditionReport {
        order,
        checkpoints,
        mutations: stats.mutations_applied,
        clamp_corrections: stats.clamp_corrections,
        starved: stats.skipped_interactions,
        hyperedges_reformed: stats.hyperedges_reformed,
    };
    Ok((report, snapshot_json(&engine)?))
}
