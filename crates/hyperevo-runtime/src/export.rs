//! Snapshot export - write the engine state as JSON.

use crate::engine::{EngineSnapshot, EvolutionEngine};
use crate::log::GenerationSink;
use hyperevo_core::error::Result;
use std::path::Path;

/// Serialize the engine's current state to pretty JSON.
pub fn snapshot_json<S: GenerationSink>(engine: &EvolutionEngine<S>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&engine.snapshot())?)
}

/// Write the engine's current state to `path` as JSON.
pub fn write_snapshot<S: GenerationSink>(engine: &EvolutionEngine<S>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, snapshot_json(engine)?)?;
    Ok(())
}

/// Summary line counts for a snapshot, used by the CLI.
pub fn describe(snapshot: &EngineSnapshot) -> String {
    format!(
        "generation {}: {} nodes, {} hyperedges, {} energy sources",
        snapshot.generation,
        snapshot.nodes.len(),
        snapshot.hyperedges.len(),
        snapshot.energy_sources.len()
    )
}
