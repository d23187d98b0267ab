//! Per-generation log sinks.
//!
//! The engine hands every node's pre-mutation state to a sink at the start
//! of each generation, one [`NodeRecord`] per node. The file sink writes
//! fixed-width, comma-separated lines under a header written once when the
//! file is created (truncating any previous run).

use crate::node::Node;
use hyperevo_core::error::{HyperevoError, Result};
use hyperevo_core::types::{Generation, NodeId, Species};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Column names, in record order.
pub const COLUMNS: [&str; 8] = [
    "generation",
    "node",
    "species",
    "mutation_rate",
    "interaction_strength",
    "fitness",
    "energy",
    "activation_level",
];

/// One node's state at the start of a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub generation: Generation,
    pub node: NodeId,
    pub species: Species,
    pub mutation_rate: f64,
    pub interaction_strength: f64,
    pub fitness: f64,
    pub energy: f64,
    pub activation_level: f64,
}

impl NodeRecord {
    pub fn capture(generation: Generation, node: &Node) -> Self {
        Self {
            generation,
            node: node.id(),
            species: node.species(),
            mutation_rate: node.mutation_rate(),
            interaction_strength: node.interaction_strength(),
            fitness: node.fitness(),
            energy: node.energy(),
            activation_level: node.activation_level(),
        }
    }

    /// Render as one fixed-width line (no trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{:>10},{:>8},{:>7},{:>20.6},{:>20.6},{:>20.6},{:>20.6},{:>20.6}",
            self.generation,
            self.node.as_u64(),
            self.species.tag(),
            self.mutation_rate,
            self.interaction_strength,
            self.fitness,
            self.energy,
            self.activation_level,
        )
    }

    /// Parse a line produced by [`NodeRecord::to_line`].
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != COLUMNS.len() {
            return Err(HyperevoError::Serialization(format!(
                "expected {} fields, found {}",
                COLUMNS.len(),
                fields.len()
            )));
        }

        let species = Species::from_tag(fields[2])
            .ok_or_else(|| HyperevoError::Serialization(format!("unknown species: {}", fields[2])))?;

        Ok(Self {
            generation: parse_field(fields[0], COLUMNS[0])?,
            node: NodeId(parse_field(fields[1], COLUMNS[1])?),
            species,
            mutation_rate: parse_field(fields[3], COLUMNS[3])?,
            interaction_strength: parse_field(fields[4], COLUMNS[4])?,
            fitness: parse_field(fields[5], COLUMNS[5])?,
            energy: parse_field(fields[6], COLUMNS[6])?,
            activation_level: parse_field(fields[7], COLUMNS[7])?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, column: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| HyperevoError::Serialization(format!("bad {} value: {:?}", column, raw)))
}

/// The header line written above every record.
pub fn header_line() -> String {
    format!(
        "{:>10},{:>8},{:>7},{:>20},{:>20},{:>20},{:>20},{:>20}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4], COLUMNS[5], COLUMNS[6], COLUMNS[7],
    )
}

/// Receives one record per node per generation.
pub trait GenerationSink {
    fn record(&mut self, record: &NodeRecord) -> Result<()>;

    /// Called once after every generation.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: GenerationSink + ?Sized> GenerationSink for Box<S> {
    fn record(&mut self, record: &NodeRecord) -> Result<()> {
        (**self).record(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl GenerationSink for NullLog {
    fn record(&mut self, _record: &NodeRecord) -> Result<()> {
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    records: Vec<NodeRecord>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn for_generation(&self, generation: Generation) -> impl Iterator<Item = &NodeRecord> {
        self.records.iter().filter(move |r| r.generation == generation)
    }

    pub fn for_node(&self, node: NodeId) -> impl Iterator<Item = &NodeRecord> {
        self.records.iter().filter(move |r| r.node == node)
    }
}

impl GenerationSink for MemoryLog {
    fn record(&mut self, record: &NodeRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Fixed-width text log over any writer.
pub struct FixedWidthLog<W: Write> {
    writer: BufWriter<W>,
    records_written: u64,
}

impl FixedWidthLog<File> {
    /// Create (or truncate) the log file and write its header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> FixedWidthLog<W> {
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut writer = BufWriter::new(writer);
        writeln!(writer, "{}", header_line())?;
        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| HyperevoError::Io(e.error().to_string()))
    }
}

impl<W: Write> GenerationSink for FixedWidthLog<W> {
    fn record(&mut self, record: &NodeRecord) -> Result<()> {
        writeln!(self.writer, "{}", record.to_line())?;
        self.records_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read every record back from a fixed-width log file.
pub fn read_log(path: impl AsRef<Path>) -> Result<Vec<NodeRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        // Header
        if idx == 0 || line.trim().is_empty() {
            continue;
        }
        records.push(NodeRecord::parse_line(&line)?);
    }
    Ok(records)
}
