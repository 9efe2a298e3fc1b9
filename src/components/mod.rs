//! Component models for circuit simulation.
//!
//! This module provides models for all supported circuit components:
//! - Sources: Battery, three-phase supply
//! - Controls: Switch, relay contact
//! - Loads: Lamp, relay coil
//! - Wiring: Junction (T-branch pass-through), Generic (caller-defined terminals)
//!
//! The kind set is closed. Per-kind behaviour (gating and what happens on
//! power-up / power-down) is dispatched through [`ComponentKind`], and the
//! resolver invokes it uniformly for every component.

mod controls;
mod loads;
mod sources;

pub use controls::{RelaySwitch, Switch};
pub use loads::{Actuation, Lamp, RelayCoil};
pub use sources::{Battery, ThreePhaseSource};

use crate::circuit::{ComponentId, Layer, Terminal, TerminalRole};
use crate::dsl::{ComponentDef, ComponentType};
use crate::error::{CircuitError, Result};

/// Kind-specific state and behaviour of a component.
#[derive(Debug, Clone)]
pub enum ComponentKind {
    Battery(Battery),
    ThreePhase(ThreePhaseSource),
    Lamp(Lamp),
    Switch(Switch),
    RelayCoil(RelayCoil),
    RelaySwitch(RelaySwitch),
    Junction,
    Generic,
}

impl ComponentKind {
    /// Create a component kind from a script definition.
    ///
    /// Relay links and partner pairs come from directives and are resolved by
    /// [`Circuit::from_ast`](crate::circuit::Circuit::from_ast) once all ids exist.
    pub fn from_def(def: &ComponentDef) -> Result<Self> {
        match def.component_type {
            ComponentType::Battery => Ok(ComponentKind::Battery(Battery::new(
                def.flag("on")?.unwrap_or(false),
            ))),
            ComponentType::ThreePhase => Ok(ComponentKind::ThreePhase(ThreePhaseSource::new(
                def.flag("on")?.unwrap_or(true),
            ))),
            ComponentType::Lamp => Ok(ComponentKind::Lamp(Lamp::default())),
            ComponentType::Switch => Ok(ComponentKind::Switch(Switch::new(
                def.flag("closed")?.unwrap_or(true),
            ))),
            ComponentType::RelayCoil => Ok(ComponentKind::RelayCoil(RelayCoil::default())),
            ComponentType::RelaySwitch => Ok(ComponentKind::RelaySwitch(RelaySwitch::new(
                def.flag("nc")?.unwrap_or(false),
            ))),
            ComponentType::Junction => Ok(ComponentKind::Junction),
        }
    }

    /// Terminal layout for this kind. Generic components bring their own.
    pub fn default_terminals(&self) -> Vec<Terminal> {
        match self {
            ComponentKind::Battery(_) => Battery::terminals(),
            ComponentKind::ThreePhase(_) => ThreePhaseSource::terminals(),
            ComponentKind::Lamp(_) => Lamp::terminals(),
            ComponentKind::Switch(_) => Switch::terminals(),
            ComponentKind::RelayCoil(_) => RelayCoil::terminals(),
            ComponentKind::RelaySwitch(_) => RelaySwitch::terminals(),
            ComponentKind::Junction => vec![
                Terminal::new("a", TerminalRole::Other, 0),
                Terminal::new("b", TerminalRole::Other, 1),
            ],
            ComponentKind::Generic => Vec::new(),
        }
    }

    /// Human-readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Battery(_) => "battery",
            ComponentKind::ThreePhase(_) => "three-phase supply",
            ComponentKind::Lamp(_) => "lamp",
            ComponentKind::Switch(_) => "switch",
            ComponentKind::RelayCoil(_) => "relay coil",
            ComponentKind::RelaySwitch(_) => "relay switch",
            ComponentKind::Junction => "junction",
            ComponentKind::Generic => "component",
        }
    }

    /// Sources are path origins and termini, never pass-through nodes.
    pub fn is_source(&self) -> bool {
        matches!(self, ComponentKind::Battery(_) | ComponentKind::ThreePhase(_))
    }

    /// Whether a signal that reaches this component is forwarded past it.
    pub fn conducts(&self) -> bool {
        match self {
            ComponentKind::Switch(s) => s.closed,
            ComponentKind::RelaySwitch(r) => r.conducts(),
            _ => true,
        }
    }

    /// Called by the resolver when the component ends a pass powered.
    pub fn power_on(&mut self) -> Option<Actuation> {
        match self {
            ComponentKind::Lamp(l) => {
                l.lit = true;
                None
            }
            ComponentKind::RelayCoil(c) => c.drive(true),
            _ => None,
        }
    }

    /// Called by the resolver when the component ends a pass unpowered.
    pub fn power_off(&mut self) -> Option<Actuation> {
        match self {
            ComponentKind::Lamp(l) => {
                l.lit = false;
                None
            }
            ComponentKind::RelayCoil(c) => c.drive(false),
            _ => None,
        }
    }
}

/// Intermediate and final resolver flags. Written only by the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PowerState {
    pub live: bool,
    pub grounded: bool,
    pub powered: bool,
}

/// A circuit component.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    /// Label shared by counterparts on the 2D and 3D layers
    pub tag: String,
    pub layer: Layer,
    kind: ComponentKind,
    terminals: Vec<Terminal>,
    power: PowerState,
}

impl Component {
    /// Create a component with its kind's terminal layout.
    pub fn new(id: ComponentId, name: impl Into<String>, kind: ComponentKind) -> Self {
        let terminals = kind.default_terminals();
        Self::with_terminals(id, name, kind, terminals)
    }

    /// Create a component with an explicit terminal list.
    pub fn with_terminals(
        id: ComponentId,
        name: impl Into<String>,
        kind: ComponentKind,
        terminals: Vec<Terminal>,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            tag: name.clone(),
            name,
            layer: Layer::default(),
            kind,
            terminals,
            power: PowerState::default(),
        }
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn terminal(&self, slot: usize) -> Option<&Terminal> {
        self.terminals.get(slot)
    }

    /// Slot of the terminal with the given script name.
    pub fn terminal_slot(&self, name: &str) -> Option<usize> {
        self.terminals
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Final, externally visible power flag.
    pub fn is_powered(&self) -> bool {
        self.power.powered
    }

    /// Reached by the live signal in the last pass.
    pub fn is_live(&self) -> bool {
        self.power.live
    }

    /// Reached by the ground signal in the last pass.
    pub fn is_grounded(&self) -> bool {
        self.power.grounded
    }

    pub fn is_source(&self) -> bool {
        self.kind.is_source()
    }

    pub fn conducts(&self) -> bool {
        self.kind.conducts()
    }

    /// Output/pass state of sources and switches; `None` for other kinds.
    pub fn enabled(&self) -> Option<bool> {
        match &self.kind {
            ComponentKind::Battery(b) => Some(b.enabled),
            ComponentKind::ThreePhase(p) => Some(p.enabled),
            ComponentKind::Switch(s) => Some(s.closed),
            _ => None,
        }
    }

    /// Set the output/pass state. Returns true if it changed.
    pub(crate) fn set_enabled(&mut self, enabled: bool) -> Result<bool> {
        match &mut self.kind {
            ComponentKind::Battery(b) => Ok(b.set_state(enabled)),
            ComponentKind::ThreePhase(p) => Ok(p.set_state(enabled)),
            ComponentKind::Switch(s) => Ok(s.set_state(enabled)),
            other => Err(CircuitError::UnsupportedOperation {
                component: self.name.clone(),
                kind: other.name(),
                action: "switched",
            }),
        }
    }

    /// An enabled source with both a live and a ground reference.
    pub fn is_active_source(&self) -> bool {
        self.is_source()
            && self.enabled() == Some(true)
            && self.has_role(TerminalRole::Source)
            && self.has_role(TerminalRole::Ground)
    }

    pub fn has_role(&self, role: TerminalRole) -> bool {
        self.terminals.iter().any(|t| t.role == role)
    }

    /// Paired counterpart of a switch or battery.
    pub fn partner(&self) -> Option<ComponentId> {
        match &self.kind {
            ComponentKind::Switch(s) => s.partner,
            ComponentKind::Battery(b) => b.partner,
            _ => None,
        }
    }

    pub(crate) fn set_partner(&mut self, partner: Option<ComponentId>) -> bool {
        match &mut self.kind {
            ComponentKind::Switch(s) => {
                s.partner = partner;
                true
            }
            ComponentKind::Battery(b) => {
                b.partner = partner;
                true
            }
            _ => false,
        }
    }

    /// Drop any weak reference to `gone`.
    pub(crate) fn forget(&mut self, gone: ComponentId) {
        match &mut self.kind {
            ComponentKind::Switch(s) if s.partner == Some(gone) => s.partner = None,
            ComponentKind::Battery(b) if b.partner == Some(gone) => b.partner = None,
            ComponentKind::RelayCoil(c) if c.linked_switch == Some(gone) => c.linked_switch = None,
            _ => {}
        }
    }

    pub(crate) fn reset_signals(&mut self) {
        self.power = PowerState::default();
    }

    pub(crate) fn mark_live(&mut self) {
        self.power.live = true;
    }

    pub(crate) fn mark_grounded(&mut self) {
        self.power.grounded = true;
    }

    /// Publish the pass result and run the kind's power behaviour.
    pub(crate) fn apply_power(&mut self, powered: bool) -> Option<Actuation> {
        self.power.powered = powered;
        if powered {
            self.kind.power_on()
        } else {
            self.kind.power_off()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamp_follows_power() {
        let mut lamp = Component::new(ComponentId(0), "L1", ComponentKind::Lamp(Lamp::default()));
        assert_eq!(lamp.apply_power(true), None);
        assert!(lamp.is_powered());
        assert!(matches!(lamp.kind(), ComponentKind::Lamp(l) if l.lit));
        lamp.apply_power(false);
        assert!(matches!(lamp.kind(), ComponentKind::Lamp(l) if !l.lit));
    }

    #[test]
    fn test_active_source_needs_both_references() {
        let mut battery = Component::new(
            ComponentId(0),
            "B1",
            ComponentKind::Battery(Battery::new(true)),
        );
        assert!(battery.is_active_source());
        battery.set_enabled(false).unwrap();
        assert!(!battery.is_active_source());

        let half = Component::with_terminals(
            ComponentId(1),
            "B2",
            ComponentKind::Battery(Battery::new(true)),
            vec![Terminal::new("pos", TerminalRole::Source, 0)],
        );
        assert!(!half.is_active_source());
    }

    #[test]
    fn test_set_enabled_rejects_lamp() {
        let mut lamp = Component::new(ComponentId(0), "L1", ComponentKind::Lamp(Lamp::default()));
        assert!(matches!(
            lamp.set_enabled(true),
            Err(CircuitError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_forget_clears_weak_links() {
        let mut coil = Component::new(
            ComponentId(0),
            "K1",
            ComponentKind::RelayCoil(RelayCoil::new(Some(ComponentId(3)))),
        );
        coil.forget(ComponentId(3));
        assert!(matches!(coil.kind(), ComponentKind::RelayCoil(c) if c.linked_switch.is_none()));
    }

    #[test]
    fn test_terminal_slot_lookup_is_case_insensitive() {
        let battery =
            Component::new(ComponentId(0), "B1", ComponentKind::Battery(Battery::default()));
        assert_eq!(battery.terminal_slot("NEG"), Some(1));
        assert_eq!(battery.terminal_slot("x"), None);
    }
}
