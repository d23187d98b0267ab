//! # Hyperevo Runtime
//!
//! The generation loop and everything it owns.
//!
//! The [`EvolutionEngine`](engine::EvolutionEngine) drives a population of
//! [`Node`](node::Node)s through discrete generations: mutate, regenerate,
//! interact through weighted [`Hyperedge`](hyperedge::Hyperedge)s, receive
//! feedback, and reform any hyperedge whose members have drifted. Each
//! generation's starting state goes to a [`GenerationSink`](log::GenerationSink).

pub mod node;
pub mod hyperedge;
pub mod engine;
pub mod population;
pub mod log;
pub mod metrics;
pub mod export;
pub mod prelude;
