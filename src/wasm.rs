//! WASM bindings for circuitlab.
//!
//! This module provides JavaScript-friendly bindings so a browser front end
//! can drive the power resolver: it draws the circuit, forwards user clicks
//! and colours components and wires from the returned flags.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuit } from 'circuitlab_core';
//!
//! await init();
//!
//! const sim = new WasmCircuit(`
//!   BAT B1 on=1
//!   SW S1 closed=0
//!   LAMP L1
//!   WIRE B1:pos S1:a
//!   WIRE S1:b L1:a
//!   WIRE L1:b B1:neg
//! `);
//!
//! sim.start();
//! sim.toggle("S1");
//! sim.is_powered("L1"); // true
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{validate_circuit, Circuit, ComponentId};
use crate::dsl;
use crate::error::CircuitError;
use crate::solver::{CircuitEvent, Simulator, SimulatorConfig, Stability};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: CircuitError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible circuit workspace.
///
/// Wraps the native [`Simulator`]; components are addressed by name.
#[wasm_bindgen]
pub struct WasmCircuit {
    simulator: Simulator,
}

impl WasmCircuit {
    fn id(&self, name: &str) -> Result<ComponentId, JsValue> {
        self.simulator
            .circuit()
            .find(name)
            .ok_or_else(|| js_error(CircuitError::component_not_found(name)))
    }
}

#[wasm_bindgen]
impl WasmCircuit {
    /// Create a workspace from a netlist script.
    #[wasm_bindgen(constructor)]
    pub fn new(script: &str) -> Result<WasmCircuit, JsValue> {
        Self::with_config(script, crate::DEFAULT_MAX_PASSES)
    }

    /// Create a workspace with a custom relay pass bound.
    #[wasm_bindgen]
    pub fn with_config(script: &str, max_passes: usize) -> Result<WasmCircuit, JsValue> {
        let ast = dsl::parse(script).map_err(js_error)?;
        let circuit = Circuit::from_ast(ast).map_err(js_error)?;
        validate_circuit(&circuit).map_err(js_error)?;

        let config = SimulatorConfig::new().with_max_passes(max_passes);
        Ok(WasmCircuit {
            simulator: Simulator::with_config(circuit, config),
        })
    }

    /// Enter simulation mode. Returns false if the circuit is unstable.
    #[wasm_bindgen]
    pub fn start(&mut self) -> bool {
        self.simulator.start().stability == Stability::Stable
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.simulator.stop();
    }

    /// Toggle a switch or source by name.
    #[wasm_bindgen]
    pub fn toggle(&mut self, name: &str) -> Result<(), JsValue> {
        let id = self.id(name)?;
        self.simulator.toggle(id).map_err(js_error)?;
        Ok(())
    }

    /// Turn a switch or source on or off by name.
    #[wasm_bindgen]
    pub fn set_enabled(&mut self, name: &str, on: bool) -> Result<(), JsValue> {
        let id = self.id(name)?;
        self.simulator.set_enabled(id, on).map_err(js_error)?;
        Ok(())
    }

    /// Wire two terminals, e.g. `connect("B1:pos", "L1:a")`. Returns the wire id.
    #[wasm_bindgen]
    pub fn connect(&mut self, a: &str, b: &str) -> Result<usize, JsValue> {
        self.simulator
            .connect_named(a, b)
            .map(|w| w.0)
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn remove_component(&mut self, name: &str) -> Result<(), JsValue> {
        let id = self.id(name)?;
        self.simulator.remove_component(id).map_err(js_error)
    }

    /// Pair the 2D and 3D layers. Returns the number of matched components.
    #[wasm_bindgen]
    pub fn link_layers(&mut self) -> Result<usize, JsValue> {
        self.simulator
            .link_layers()
            .map(|pairs| pairs.len())
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn is_powered(&self, name: &str) -> bool {
        self.simulator
            .circuit()
            .find(name)
            .map_or(false, |id| self.simulator.is_powered(id))
    }

    /// Names of all powered components.
    #[wasm_bindgen]
    pub fn powered(&self) -> Vec<String> {
        self.simulator
            .circuit()
            .components()
            .iter()
            .filter(|c| c.is_powered())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Ids of wires whose both ends are powered.
    #[wasm_bindgen]
    pub fn powered_wires(&self) -> Vec<usize> {
        self.simulator
            .circuit()
            .wires()
            .filter(|w| w.is_fully_powered())
            .map(|w| w.id.0)
            .collect()
    }

    /// Pending events as text lines, oldest first.
    #[wasm_bindgen]
    pub fn drain_events(&mut self) -> Vec<String> {
        let events = self.simulator.drain_events();
        let circuit = self.simulator.circuit();
        events
            .into_iter()
            .map(|event| match event {
                CircuitEvent::PowerChanged { component, powered } => {
                    format!("power {} {}", circuit.label(component), powered)
                }
                CircuitEvent::StateChanged { component, on } => {
                    format!("state {} {}", circuit.label(component), on)
                }
                CircuitEvent::Unstable { passes } => format!("unstable {}", passes),
            })
            .collect()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
