//! Summarize a run log.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use hyperevo::prelude::*;

pub fn run(log: &str, every: u64) -> Result<()> {
    let records = read_log(log).with_context(|| format!("Failed to read log: {}", log))?;
    if records.is_empty() {
        bail!("{} contains no records", log);
    }

    let summaries = summarize_records(&records);
    println!(
        "{} {} records over {} generations",
        "→".blue(),
        records.len().to_string().cyan(),
        summaries.len().to_string().cyan()
    );
    println!();
    println!(
        "  {:>6} {:>5} {:>4} {:>4} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "gen", "nodes", "A", "B", "fitness", "max", "rate", "spread", "energy"
    );
    println!("  {}", "-".repeat(80));

    let step = every.max(1);
    let last = summaries.len().saturating_sub(1);
    for (i, s) in summaries.iter().enumerate() {
        if s.generation % step != 0 && i != last {
            continue;
        }
        println!(
            "  {:>6} {:>5} {:>4} {:>4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.2}",
            s.generation,
            s.population,
            s.species_a,
            s.species_b,
            s.mean_fitness,
            s.max_fitness,
            s.mean_mutation_rate,
            s.mutation_rate_spread,
            s.mean_energy
        );
    }

    if let (Some(first), Some(last)) = (summaries.first(), summaries.last()) {
        println!();
        println!(
            "  Mean fitness: {} → {}",
            format!("{:.4}", first.mean_fitness).yellow(),
            format!("{:.4}", last.mean_fitness).green()
        );
        println!(
            "  Rate spread:  {} → {}",
            format!("{:.4}", first.mutation_rate_spread).yellow(),
            format!("{:.4}", last.mutation_rate_spread).green()
        );
    }

    Ok(())
}
