//! Power resolution.
//!
//! This module decides which components are powered. A component is powered
//! when it lies on a complete conducting path from an enabled source terminal
//! to a ground terminal.
//!
//! ## Resolution Pass
//!
//! Each pass runs, in order:
//!
//! 1. Reset every live, grounded and powered flag
//! 2. Rebuild the net index from the wire list
//! 3. Collect entry points: components wired to an enabled source terminal
//!    (live) or to a ground terminal (ground)
//! 4. Flood each signal from its entry points; open switches and released
//!    relay contacts are reached but do not forward
//! 5. Search source-to-ground paths depth-first with backtracking over
//!    components that are live, grounded and conducting
//! 6. Apply power to every component; relay coils request contact moves
//! 7. Publish per-wire "fully powered" flags
//!
//! The [`Simulator`] applies the requested contact moves and runs another
//! pass while any contact moved, up to [`SimulatorConfig::max_passes`].

mod mirror;
mod paths;
mod propagate;
mod resolver;
mod simulator;

pub use simulator::{
    CircuitEvent, PowerChange, ResolveReport, Simulator, SimulatorConfig, Stability,
};

/// Default pass bound before a circuit with relay feedback is declared unstable.
pub const DEFAULT_MAX_PASSES: usize = 16;

/// Default node-expansion budget of the path search in one pass.
pub const DEFAULT_MAX_SEARCH_STEPS: usize = 100_000;
