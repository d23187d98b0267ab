//! Run the evolution loop.

use anyhow::{Context, Result};
use colored::Colorize;
use hyperevo::prelude::*;
use hyperevo::runtime::export::describe;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Command-line values that take precedence over hyperevo.toml.
pub struct RunOverrides {
    pub config: Option<String>,
    pub generations: Option<u64>,
    pub seed: Option<u64>,
    pub log: Option<String>,
    pub order: Option<UpdateOrder>,
    pub snapshot: Option<String>,
}

impl RunOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(generations) = self.generations {
            config.run.generations = generations;
        }
        if let Some(seed) = self.seed {
            config.engine.seed = Some(seed);
        }
        if let Some(log) = self.log {
            config.output.log_path = log;
        }
        if let Some(order) = self.order {
            config.engine.update_order = order;
        }
        if let Some(snapshot) = self.snapshot {
            config.output.snapshot_path = Some(snapshot);
        }
    }
}

pub fn run(overrides: RunOverrides, verbose: bool) -> Result<()> {
    let mut config = Config::load(overrides.config.as_deref().map(Path::new))?;
    overrides.apply(&mut config);
    config.engine.validate()?;

    let sink: Box<dyn GenerationSink> = if config.output.log_path.is_empty() {
        Box::new(NullLog)
    } else {
        Box::new(
            FixedWidthLog::create(&config.output.log_path)
                .with_context(|| format!("Failed to create log: {}", config.output.log_path))?,
        )
    };

    if !config.output.log_path.is_empty() {
        info!(path = %config.output.log_path, "logging generations");
    }

    let mut engine = EvolutionEngine::new(config.engine.clone(), sink)?;
    engine.populate(&config.population)?;

    let generations = config.run.generations;
    println!(
        "{} Evolving {} nodes for {} generations ({:?} order)...",
        "→".blue(),
        engine.nodes().len().to_string().cyan(),
        generations.to_string().cyan(),
        config.engine.update_order
    );

    let pb = ProgressBar::new(generations);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} generations")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    for _ in 0..generations {
        engine.step()?;
        if verbose {
            if let Some(s) = engine.summaries().last() {
                pb.println(format!(
                    "  gen {:>5}  fitness {:>8.4}  rate {:.4} ± {:.4}  reformed {}",
                    s.generation,
                    s.mean_fitness,
                    s.mean_mutation_rate,
                    s.mutation_rate_spread,
                    s.hyperedges_reformed
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if let Some(path) = &config.output.snapshot_path {
        write_snapshot(&engine, path)?;
        println!("  {} Snapshot written to {}", "✓".green(), path);
    }

    let snapshot = engine.snapshot();
    let stats = engine.stats().clone();
    let last = engine.summaries().last().cloned();
    engine.into_sink()?;

    println!();
    println!("{} Evolution complete!", "✓".green().bold());
    println!("  {}", describe(&snapshot));
    println!("  Mutations:   {}", stats.mutations_applied.to_string().cyan());
    println!("  Clamped:     {}", stats.clamp_corrections.to_string().cyan());
    println!(
        "  Interacted:  {} ({} starved)",
        stats.interactions.to_string().cyan(),
        stats.skipped_interactions.to_string().yellow()
    );
    println!("  Reformed:    {}", stats.hyperedges_reformed.to_string().cyan());
    println!("  Energy in:   {:.1}", stats.energy_drawn);
    if let Some(s) = last {
        println!(
            "  Fitness:     mean {} max {}",
            format!("{:.4}", s.mean_fitness).green(),
            format!("{:.4}", s.max_fitness).green()
        );
        println!(
            "  Mutation:    mean {:.4} spread {:.4}",
            s.mean_mutation_rate, s.mutation_rate_spread
        );
    }
    if !config.output.log_path.is_empty() {
        println!("  Log:         {}", config.output.log_path);
    }

    Ok(())
}
