//! # CircuitLab Core
//!
//! Connectivity tracking and power resolution for educational switching
//! circuits.
//!
//! Components are binary: a lamp is lit or it is not. There is no
//! resistance, current or voltage. What the library answers is which
//! components sit on a complete conducting path from an enabled source to a
//! ground terminal, given the current wiring and switch positions, including
//! relays whose coils move their own contacts.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the netlist script
//! - [`circuit`] - Components, wires, the net index and the topology operations
//! - [`components`] - Component kinds and their per-kind power behaviour
//! - [`solver`] - The resolution pass and the [`Simulator`] workspace
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! circuitlab lamp.cir --toggle S1
//! ```
//!
//! ### Library
//!
//! ```
//! use circuitlab_core::{dsl, Circuit, Simulator};
//!
//! let script = "
//! BAT B1 on=1
//! SW S1 closed=0
//! LAMP L1
//! WIRE B1:pos S1:a
//! WIRE S1:b L1:a
//! WIRE L1:b B1:neg
//! ";
//! let circuit = Circuit::from_ast(dsl::parse(script)?)?;
//! let mut sim = Simulator::new(circuit);
//! sim.start();
//!
//! let s1 = sim.circuit().find("S1").unwrap();
//! let l1 = sim.circuit().find("L1").unwrap();
//! assert!(!sim.is_powered(l1));
//! sim.toggle(s1)?;
//! assert!(sim.is_powered(l1));
//! # Ok::<(), circuitlab_core::CircuitError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmCircuit } from 'circuitlab_core';
//!
//! const sim = new WasmCircuit(script);
//! sim.start();
//! sim.toggle("S1");
//! ```

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{CircuitError, Result};
pub use solver::{
    CircuitEvent, ResolveReport, Simulator, SimulatorConfig, Stability, DEFAULT_MAX_PASSES,
    DEFAULT_MAX_SEARCH_STEPS,
};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuit;
