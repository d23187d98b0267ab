//! Hyperevo Runtime Prelude - convenient imports for common usage.
//!
//! ```rust
//! use hyperevo_runtime::prelude::*;
//! ```

pub use crate::engine::{EngineEvent, EngineSnapshot, EngineStats, EvolutionEngine};
pub use crate::export::{snapshot_json, write_snapshot};
pub use crate::hyperedge::{Hyperedge, HyperedgeKey, HyperedgeRegistry, Reformation};
pub use crate::log::{read_log, FixedWidthLog, GenerationSink, MemoryLog, NodeRecord, NullLog};
pub use crate::metrics::{summarize_records, GenerationSummary};
pub use crate::node::{Interaction, NeighborSignal, Node, WeightLookup};
pub use crate::population::PopulationPlan;

// Re-export from core
pub use hyperevo_core::prelude::*;
