//! Fixed-width log file tests.

use hyperevo_core::prelude::*;
use hyperevo_runtime::engine::EvolutionEngine;
use hyperevo_runtime::log::{header_line, read_log, FixedWidthLog};
use hyperevo_runtime::metrics::summarize_records;
use hyperevo_runtime::population::PopulationPlan;

#[test]
fn run_writes_one_record_per_node_per_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("run.csv");

    let log = FixedWidthLog::create(&path).unwrap();
    let mut engine = EvolutionEngine::new(EvolutionConfig::default().with_seed(1), log).unwrap();
    let ids = engine.populate(&PopulationPlan::default()).unwrap();
    let first_state = engine.node(ids[3]).unwrap().clone();
    engine.evolve(12).unwrap();
    let log = engine.into_sink().unwrap();
    assert_eq!(log.records_written(), 120);

    let records = read_log(&path).unwrap();
    assert_eq!(records.len(), 120);

    let first = records
        .iter()
        .find(|r| r.generation == 0 && r.node == ids[3])
        .unwrap();
    assert_eq!(first.species, first_state.species());
    assert!((first.energy - first_state.energy()).abs() < 1e-6);
    assert!((first.mutation_rate - first_state.mutation_rate()).abs() < 1e-6);

    let summaries = summarize_records(&records);
    assert_eq!(summaries.len(), 12);
    assert!(summaries.iter().all(|s| s.population == 10));
}

#[test]
fn creating_a_log_truncates_the_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.csv");

    {
        let log = FixedWidthLog::create(&path).unwrap();
        let mut engine = EvolutionEngine::new(EvolutionConfig::default().with_seed(2), log).unwrap();
        engine.populate(&PopulationPlan::default()).unwrap();
        engine.evolve(5).unwrap();
        engine.into_sink().unwrap();
    }
    assert_eq!(read_log(&path).unwrap().len(), 50);

    let log = FixedWidthLog::create(&path).unwrap();
    drop(log);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.trim_end(), header_line());
    assert!(read_log(&path).unwrap().is_empty());
}
