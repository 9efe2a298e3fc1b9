//! Circuit graph representation and validation.
//!
//! This module provides the in-memory model a simulation runs on: components
//! with typed terminals, the wires between terminals, and the net index
//! derived from those wires. The [`Circuit`] struct owns all three and keeps
//! them consistent across edits.

mod graph;
mod link;
mod net;
mod registry;
mod types;
mod validate;
mod wire;

pub use graph::Circuit;
pub use link::{match_layers, LayerPair};
pub use net::NetTracker;
pub use registry::ComponentRegistry;
pub use types::*;
pub use validate::validate_circuit;
pub use wire::Wire;
