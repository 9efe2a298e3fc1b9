//! Main simulator interface.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::circuit::{Circuit, ComponentId, WireId};
use crate::components::ComponentKind;
use crate::error::Result;

use super::resolver::run_pass;
use super::{DEFAULT_MAX_PASSES, DEFAULT_MAX_SEARCH_STEPS};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Maximum passes per resolution before the circuit is declared unstable.
    pub max_passes: usize,
    /// Maximum node expansions of the path search in one pass.
    pub max_search_steps: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pass bound for relay feedback.
    ///
    /// A relay whose contact feeds its own coil flips on every pass; this is
    /// how many passes it gets before being reported as unstable.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Set the path search budget.
    pub fn with_max_search_steps(mut self, max_search_steps: usize) -> Self {
        self.max_search_steps = max_search_steps;
        self
    }
}

/// Whether the last resolution reached a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stability {
    #[default]
    Stable,
    /// Relay feedback kept changing contacts until the pass bound
    Unstable,
}

/// A component's power flag after a resolution, where it differs from before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerChange {
    pub component: ComponentId,
    pub powered: bool,
}

/// Notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitEvent {
    /// A component's powered flag flipped
    PowerChanged { component: ComponentId, powered: bool },
    /// A switch or source was switched on or off
    StateChanged { component: ComponentId, on: bool },
    /// A resolution hit the pass bound
    Unstable { passes: usize },
}

/// Summary of one resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveReport {
    /// Passes run, including re-runs after relay actuation
    pub passes: usize,
    pub changes: Vec<PowerChange>,
    /// Path search ran out of budget in at least one pass
    pub truncated: bool,
    pub stability: Stability,
}

/// The circuit workspace: a circuit plus simulation mode, events and the
/// power-resolution loop.
///
/// All mutation goes through `&mut self`, so a resolution always runs to
/// completion before another can start. Relay actuations requested during a
/// pass are applied after it, and the loop re-runs until no contact moves.
#[derive(Debug, Clone)]
pub struct Simulator {
    pub(super) circuit: Circuit,
    pub(super) config: SimulatorConfig,
    pub(super) simulating: bool,
    pub(super) stability: Stability,
    pub(super) resolutions: usize,
    pub(super) events: Vec<CircuitEvent>,
}

impl Simulator {
    /// Create a new simulator for the given circuit with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SimulatorConfig::default())
    }

    /// Create a new simulator for the given circuit with custom configuration.
    pub fn with_config(circuit: Circuit, config: SimulatorConfig) -> Self {
        Self {
            circuit,
            config,
            simulating: false,
            stability: Stability::Stable,
            resolutions: 0,
            events: Vec::new(),
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    /// Number of resolutions run so far.
    pub fn resolutions(&self) -> usize {
        self.resolutions
    }

    /// Take all pending notifications.
    pub fn drain_events(&mut self) -> Vec<CircuitEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether a component is currently powered. Unknown ids are not.
    pub fn is_powered(&self, id: ComponentId) -> bool {
        self.circuit.component(id).map_or(false, |c| c.is_powered())
    }

    /// Enter simulation mode and resolve once.
    pub fn start(&mut self) -> ResolveReport {
        self.simulating = true;
        info!(components = self.circuit.components().len(), "simulation started");
        self.resolve()
    }

    /// Leave simulation mode and switch everything off.
    ///
    /// This is a reset, not a circuit outcome: flags are cleared directly
    /// without running the resolver.
    pub fn stop(&mut self) {
        self.simulating = false;
        self.stability = Stability::Stable;

        for component in self.circuit.components_mut().iter_mut() {
            let was_powered = component.is_powered();
            component.reset_signals();
            // Coils are released along with every contact below.
            let _ = component.apply_power(false);
            if let ComponentKind::RelaySwitch(contact) = component.kind_mut() {
                contact.actuate(false);
            }
            if was_powered {
                self.events.push(CircuitEvent::PowerChanged {
                    component: component.id,
                    powered: false,
                });
            }
        }
        for wire in self.circuit.wires_mut() {
            wire.set_fully_powered(false);
        }
        info!("simulation stopped");
    }

    /// Resolve power until relay contacts stop moving or the pass bound is hit.
    pub fn resolve(&mut self) -> ResolveReport {
        let before = self.power_snapshot();
        let mut report = ResolveReport::default();

        loop {
            report.passes += 1;
            let outcome = run_pass(&mut self.circuit, self.config.max_search_steps);
            report.truncated |= outcome.truncated;

            let mut moved = false;
            for actuation in &outcome.actuations {
                // A coil whose contact was deleted is ignored.
                if let Some(ComponentKind::RelaySwitch(contact)) = self
                    .circuit
                    .component_mut(actuation.target)
                    .map(|c| c.kind_mut())
                {
                    moved |= contact.actuate(actuation.engage);
                }
            }

            if !moved {
                report.stability = Stability::Stable;
                break;
            }
            if report.passes >= self.config.max_passes {
                report.stability = Stability::Unstable;
                warn!(
                    passes = report.passes,
                    "relay feedback did not settle; circuit is unstable"
                );
                self.events.push(CircuitEvent::Unstable {
                    passes: report.passes,
                });
                break;
            }
            debug!(
                pass = report.passes,
                powered = outcome.powered.len(),
                "relay contacts moved, resolving again"
            );
        }

        for (id, was) in before {
            let now = self.is_powered(id);
            if now != was {
                report.changes.push(PowerChange {
                    component: id,
                    powered: now,
                });
                self.events.push(CircuitEvent::PowerChanged {
                    component: id,
                    powered: now,
                });
            }
        }

        self.stability = report.stability;
        self.resolutions += 1;
        debug!(
            passes = report.passes,
            changes = report.changes.len(),
            "resolution complete"
        );
        report
    }

    fn power_snapshot(&self) -> BTreeMap<ComponentId, bool> {
        self.circuit
            .components()
            .iter()
            .map(|c| (c.id, c.is_powered()))
            .collect()
    }

    /// Apply a topology edit, then resolve if simulating.
    ///
    /// The edit's error is returned unchanged and no resolution runs.
    pub fn edit<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Circuit) -> Result<T>,
    {
        let value = f(&mut self.circuit)?;
        if self.simulating {
            self.resolve();
        }
        Ok(value)
    }

    /// Wire two terminals given as `component:terminal` references.
    pub fn connect_named(&mut self, a: &str, b: &str) -> Result<WireId> {
        self.edit(|c| c.connect_named(a, b))
    }

    pub fn remove_wire(&mut self, wire: WireId) -> Result<()> {
        self.edit(|c| c.remove_wire(wire).map(|_| ()))
    }

    pub fn remove_component(&mut self, component: ComponentId) -> Result<()> {
        self.edit(|c| c.remove_component(component).map(|_| ()))
    }
}
