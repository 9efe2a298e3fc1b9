//! Circuit graph structure.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::net::NetTracker;
use super::registry::ComponentRegistry;
use super::types::{ComponentId, Layer, Terminal, TerminalId, TerminalRole, WireId};
use super::wire::Wire;
use crate::components::{Component, ComponentKind};
use crate::dsl::CircuitAst;
use crate::error::{CircuitError, Result};

/// Components, the wires between them, and the net index over those wires.
///
/// The net index is maintained incrementally when wires are added. A removal
/// that may split a net rebuilds it from the wire list; removing a component
/// with at most one distinct neighbour cannot split anything and is applied
/// in place.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    components: ComponentRegistry,
    wires: BTreeMap<WireId, Wire>,
    nets: NetTracker,
    next_wire: usize,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from a parsed script.
    pub fn from_ast(ast: CircuitAst) -> Result<Self> {
        let mut circuit = Circuit::new();

        for def in &ast.components {
            let kind = ComponentKind::from_def(def)?;
            let id = circuit.add_component(&def.name, kind)?;
            if let Some(tag) = def.param("tag") {
                circuit.set_tag(id, tag)?;
            }
            if let Some(layer) = def.param("layer") {
                let layer = layer
                    .parse::<Layer>()
                    .map_err(|message| CircuitError::InvalidParameter {
                        component: def.name.clone(),
                        param: "layer".to_string(),
                        message,
                    })?;
                circuit.set_layer(id, layer)?;
            }
        }

        for wire in &ast.wires {
            circuit
                .connect_named(&wire.from.to_string(), &wire.to.to_string())
                .map_err(|e| CircuitError::parse(wire.line, e.to_string()))?;
        }

        for relay in &ast.relays {
            let coil = circuit.require_named(&relay.first, relay.line)?;
            let contact = circuit.require_named(&relay.second, relay.line)?;
            circuit
                .link_relay(coil, contact)
                .map_err(|e| CircuitError::parse(relay.line, e.to_string()))?;
        }

        for pair in &ast.partners {
            let a = circuit.require_named(&pair.first, pair.line)?;
            let b = circuit.require_named(&pair.second, pair.line)?;
            circuit
                .pair_partners(a, b)
                .map_err(|e| CircuitError::parse(pair.line, e.to_string()))?;
        }

        Ok(circuit)
    }

    fn require_named(&self, name: &str, line: usize) -> Result<ComponentId> {
        self.find(name).ok_or_else(|| {
            CircuitError::parse(line, format!("component '{}' is not defined", name))
        })
    }

    // ============ Components ============

    /// Place a component with its kind's terminal layout.
    pub fn add_component(&mut self, name: &str, kind: ComponentKind) -> Result<ComponentId> {
        let id = self.components.insert(name, kind)?;
        debug!(component = %name, %id, "component added");
        Ok(id)
    }

    /// Place a generic pass-through component with the given terminal roles.
    pub fn add_generic(&mut self, name: &str, roles: &[TerminalRole]) -> Result<ComponentId> {
        self.add_with_terminals(name, ComponentKind::Generic, Terminal::from_roles(roles))
    }

    /// Place a component with an explicit terminal list.
    pub fn add_with_terminals(
        &mut self,
        name: &str,
        kind: ComponentKind,
        terminals: Vec<Terminal>,
    ) -> Result<ComponentId> {
        let id = self.components.insert_with_terminals(name, kind, terminals)?;
        debug!(component = %name, %id, "component added");
        Ok(id)
    }

    pub fn set_tag(&mut self, id: ComponentId, tag: &str) -> Result<()> {
        self.components.require_mut(id)?.tag = tag.to_string();
        Ok(())
    }

    pub fn set_layer(&mut self, id: ComponentId, layer: Layer) -> Result<()> {
        self.components.require_mut(id)?.layer = layer;
        Ok(())
    }

    /// Delete a component together with every wire attached to it.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<Component> {
        if !self.components.contains(id) {
            return Err(CircuitError::component_not_found(id));
        }

        let neighbors = self.neighbors(id);
        self.wires.retain(|_, w| !w.touches(id));
        if neighbors.len() <= 1 {
            self.nets.remove_component(id);
        } else {
            self.rebuild_nets();
        }

        for other in self.components.iter_mut() {
            other.forget(id);
        }

        let removed = self
            .components
            .remove(id)
            .ok_or_else(|| CircuitError::component_not_found(id))?;
        debug!(component = %removed.name, %id, "component removed");
        Ok(removed)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    pub(crate) fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    /// Find a component id by name.
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.components.find(name)
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    // ============ Wires ============

    /// Wire two terminals together.
    ///
    /// Rejects missing terminals, two terminals on the same component, and a
    /// second wire between the same pair of terminals.
    pub fn connect(&mut self, a: TerminalId, b: TerminalId) -> Result<WireId> {
        for end in [a, b] {
            if self.components.terminal(end).is_none() {
                return Err(CircuitError::TerminalNotFound {
                    terminal: self.components.terminal_label(end),
                });
            }
        }
        if a.component == b.component {
            return Err(CircuitError::SelfConnection {
                component: self.label(a.component),
            });
        }
        if self.wires.values().any(|w| w.joins(a, b)) {
            return Err(CircuitError::DuplicateWire {
                a: self.components.terminal_label(a),
                b: self.components.terminal_label(b),
            });
        }

        let id = WireId(self.next_wire);
        self.next_wire += 1;
        self.wires.insert(id, Wire::new(id, a, b));
        self.nets.register_connection(a.component, b.component);
        debug!(
            wire = %id,
            from = %self.components.terminal_label(a),
            to = %self.components.terminal_label(b),
            "wire added"
        );
        Ok(id)
    }

    /// Wire two terminals given as `component:terminal` references.
    pub fn connect_named(&mut self, a: &str, b: &str) -> Result<WireId> {
        let a = self.components.resolve_terminal(a)?;
        let b = self.components.resolve_terminal(b)?;
        self.connect(a, b)
    }

    /// Delete a wire.
    pub fn remove_wire(&mut self, id: WireId) -> Result<Wire> {
        let wire = self
            .wires
            .remove(&id)
            .ok_or_else(|| CircuitError::WireNotFound {
                wire: id.to_string(),
            })?;
        let (x, y) = wire.components();
        let still_joined = self
            .wires
            .values()
            .any(|w| w.touches(x) && w.touches(y));
        if !still_joined {
            self.rebuild_nets();
        }
        debug!(wire = %id, "wire removed");
        Ok(wire)
    }

    /// Split a wire into two joined by a new junction, so that a third wire
    /// can branch off the junction.
    pub fn split_wire(&mut self, id: WireId) -> Result<(ComponentId, WireId, WireId)> {
        let wire = self.wire(id).cloned().ok_or_else(|| CircuitError::WireNotFound {
            wire: id.to_string(),
        })?;

        let mut n = self.components.len();
        let name = loop {
            let candidate = format!("J{}", n);
            if self.find(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };
        let junction = self.add_component(&name, ComponentKind::Junction)?;

        // Connectivity is unchanged, so the net index needs no rebuild.
        self.wires.remove(&id);
        let first = self.connect(wire.a, TerminalId::new(junction, 0))?;
        let second = self.connect(TerminalId::new(junction, 1), wire.b)?;
        Ok((junction, first, second))
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(&id)
    }

    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    pub(crate) fn wires_mut(&mut self) -> impl Iterator<Item = &mut Wire> {
        self.wires.values_mut()
    }

    /// Wires attached to a component.
    pub fn wires_at(&self, component: ComponentId) -> impl Iterator<Item = &Wire> {
        self.wires.values().filter(move |w| w.touches(component))
    }

    /// Components directly wired to `component`.
    pub fn neighbors(&self, component: ComponentId) -> BTreeSet<ComponentId> {
        self.wires_at(component)
            .filter_map(|w| w.other_component(component))
            .collect()
    }

    // ============ Links ============

    /// Let a relay coil operate a relay contact.
    pub fn link_relay(&mut self, coil: ComponentId, contact: ComponentId) -> Result<()> {
        let contact_kind = self.components.require(contact)?.kind().name();
        if !matches!(
            self.components.require(contact)?.kind(),
            ComponentKind::RelaySwitch(_)
        ) {
            return Err(CircuitError::topology(format!(
                "'{}' is a {}, not a relay switch",
                self.label(contact),
                contact_kind
            )));
        }
        let coil_label = self.label(coil);
        match self.components.require_mut(coil)?.kind_mut() {
            ComponentKind::RelayCoil(c) => {
                c.linked_switch = Some(contact);
                Ok(())
            }
            other => Err(CircuitError::topology(format!(
                "'{}' is a {}, not a relay coil",
                coil_label,
                other.name()
            ))),
        }
    }

    /// Pair two switches or two batteries so their states mirror each other.
    pub fn pair_partners(&mut self, a: ComponentId, b: ComponentId) -> Result<()> {
        let ka = self.components.require(a)?.kind();
        let kb = self.components.require(b)?.kind();
        let compatible = a != b
            && matches!(
                (ka, kb),
                (ComponentKind::Switch(_), ComponentKind::Switch(_))
                    | (ComponentKind::Battery(_), ComponentKind::Battery(_))
            );
        if !compatible {
            return Err(CircuitError::PartnerKindMismatch {
                a: self.label(a),
                b: self.label(b),
            });
        }
        // Release whoever either side was paired with before.
        for (id, new) in [(a, b), (b, a)] {
            let old = self.components.require(id)?.partner();
            if let Some(old) = old.filter(|&old| old != new) {
                if let Some(stale) = self.components.get_mut(old) {
                    if stale.partner() == Some(id) {
                        stale.set_partner(None);
                    }
                }
            }
        }
        self.components.require_mut(a)?.set_partner(Some(b));
        self.components.require_mut(b)?.set_partner(Some(a));
        debug!(a = %self.label(a), b = %self.label(b), "partners linked");
        Ok(())
    }

    // ============ Nets ============

    /// All components transitively wired to `component` (empty if isolated).
    pub fn net_of(&self, component: ComponentId) -> BTreeSet<ComponentId> {
        self.nets.net_of(component)
    }

    pub fn nets(&self) -> &NetTracker {
        &self.nets
    }

    /// Discard the net index and rebuild it from the current wire list.
    pub fn rebuild_nets(&mut self) {
        let pairs: Vec<(ComponentId, ComponentId)> =
            self.wires.values().map(Wire::components).collect();
        self.nets.rebuild(pairs);
    }

    /// Component name for messages, falling back to the id.
    pub fn label(&self, id: ComponentId) -> String {
        self.components
            .get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Lamp, RelayCoil, RelaySwitch, Switch};
    use crate::dsl;

    fn lamp(circuit: &mut Circuit, name: &str) -> ComponentId {
        circuit
            .add_component(name, ComponentKind::Lamp(Lamp::default()))
            .unwrap()
    }

    #[test]
    fn test_net_merge_and_split_on_delete() {
        let mut c = Circuit::new();
        let a = lamp(&mut c, "A");
        let b = lamp(&mut c, "B");
        let d = lamp(&mut c, "C");
        c.connect(TerminalId::new(a, 1), TerminalId::new(b, 0)).unwrap();
        c.connect(TerminalId::new(b, 1), TerminalId::new(d, 0)).unwrap();
        assert_eq!(c.net_of(a).len(), 3);

        c.remove_component(b).unwrap();
        assert!(!c.net_of(a).contains(&d));
        assert!(c.net_of(a).is_empty());
        assert!(c.net_of(d).is_empty());
        assert_eq!(c.wires().count(), 0);
    }

    #[test]
    fn test_delete_leaf_keeps_rest_of_net() {
        let mut c = Circuit::new();
        let a = lamp(&mut c, "A");
        let b = lamp(&mut c, "B");
        let d = lamp(&mut c, "C");
        c.connect_named("A:b", "B:a").unwrap();
        c.connect_named("B:b", "C:a").unwrap();
        c.remove_component(d).unwrap();
        assert_eq!(c.net_of(a), BTreeSet::from([a, b]));
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut c = Circuit::new();
        let a = lamp(&mut c, "A");
        let err = c.connect(TerminalId::new(a, 0), TerminalId::new(a, 1));
        assert!(matches!(err, Err(CircuitError::SelfConnection { .. })));
        assert_eq!(c.wires().count(), 0);
        assert!(c.nets().is_empty());
    }

    #[test]
    fn test_missing_terminal_rejected() {
        let mut c = Circuit::new();
        let a = lamp(&mut c, "A");
        let b = lamp(&mut c, "B");
        let err = c.connect(TerminalId::new(a, 5), TerminalId::new(b, 0));
        assert!(matches!(err, Err(CircuitError::TerminalNotFound { .. })));
        assert!(c.nets().is_empty());
    }

    #[test]
    fn test_duplicate_wire_rejected() {
        let mut c = Circuit::new();
        lamp(&mut c, "A");
        lamp(&mut c, "B");
        c.connect_named("A:a", "B:a").unwrap();
        let err = c.connect_named("B:a", "A:a");
        assert!(matches!(err, Err(CircuitError::DuplicateWire { .. })));
    }

    #[test]
    fn test_remove_wire_splits_net() {
        let mut c = Circuit::new();
        let a = lamp(&mut c, "A");
        let b = lamp(&mut c, "B");
        let w = c.connect_named("A:a", "B:a").unwrap();
        let parallel = c.connect_named("A:b", "B:b").unwrap();

        c.remove_wire(w).unwrap();
        assert!(c.nets().connected(a, b));
        c.remove_wire(parallel).unwrap();
        assert!(!c.nets().connected(a, b));
        assert!(matches!(
            c.remove_wire(parallel),
            Err(CircuitError::WireNotFound { .. })
        ));
    }

    #[test]
    fn test_split_wire_inserts_junction() {
        let mut c = Circuit::new();
        let a = lamp(&mut c, "A");
        let b = lamp(&mut c, "B");
        let w = c.connect_named("A:b", "B:a").unwrap();

        let (j, w1, w2) = c.split_wire(w).unwrap();
        assert!(c.wire(w).is_none());
        assert_eq!(c.neighbors(j), BTreeSet::from([a, b]));
        assert_eq!(c.wire(w1).unwrap().a, TerminalId::new(a, 1));
        assert_eq!(c.wire(w2).unwrap().b, TerminalId::new(b, 0));
        assert!(matches!(c.component(j).unwrap().kind(), ComponentKind::Junction));
        assert_eq!(c.net_of(a).len(), 3);

        let t = lamp(&mut c, "T");
        c.connect(TerminalId::new(j, 0), TerminalId::new(t, 0)).unwrap();
        assert_eq!(c.net_of(t).len(), 4);
    }

    #[test]
    fn test_relay_link_checks_kinds() {
        let mut c = Circuit::new();
        let coil = c
            .add_component("K1", ComponentKind::RelayCoil(RelayCoil::default()))
            .unwrap();
        let contact = c
            .add_component("KS1", ComponentKind::RelaySwitch(RelaySwitch::default()))
            .unwrap();
        let l = lamp(&mut c, "L1");
        assert!(c.link_relay(coil, l).is_err());
        assert!(c.link_relay(l, contact).is_err());
        c.link_relay(coil, contact).unwrap();

        c.remove_component(contact).unwrap();
        assert!(matches!(
            c.component(coil).unwrap().kind(),
            ComponentKind::RelayCoil(k) if k.linked_switch.is_none()
        ));
    }

    #[test]
    fn test_partners_must_match_kind() {
        let mut c = Circuit::new();
        let s1 = c.add_component("S1", ComponentKind::Switch(Switch::default())).unwrap();
        let s2 = c.add_component("S2", ComponentKind::Switch(Switch::default())).unwrap();
        let b = c
            .add_component("B1", ComponentKind::Battery(Battery::default()))
            .unwrap();
        assert!(matches!(
            c.pair_partners(s1, b),
            Err(CircuitError::PartnerKindMismatch { .. })
        ));
        c.pair_partners(s1, s2).unwrap();
        assert_eq!(c.component(s1).unwrap().partner(), Some(s2));
        assert_eq!(c.component(s2).unwrap().partner(), Some(s1));
    }

    #[test]
    fn test_repairing_releases_old_partner() {
        let mut c = Circuit::new();
        let s1 = c.add_component("S1", ComponentKind::Switch(Switch::default())).unwrap();
        let s2 = c.add_component("S2", ComponentKind::Switch(Switch::default())).unwrap();
        let s3 = c.add_component("S3", ComponentKind::Switch(Switch::default())).unwrap();
        c.pair_partners(s1, s2).unwrap();
        c.pair_partners(s1, s3).unwrap();
        assert_eq!(c.component(s1).unwrap().partner(), Some(s3));
        assert_eq!(c.component(s3).unwrap().partner(), Some(s1));
        assert_eq!(c.component(s2).unwrap().partner(), None);
        crate::circuit::validate_circuit(&c).unwrap();

        // Re-pairing the new side also releases its previous partner.
        c.pair_partners(s2, s3).unwrap();
        assert_eq!(c.component(s1).unwrap().partner(), None);
        assert_eq!(c.component(s2).unwrap().partner(), Some(s3));
    }

    #[test]
    fn test_from_ast() {
        let script = "\
BAT B1 on=on
SW S1 closed=off layer=3d tag=Main
SW S2 tag=Main
COIL K1
RELAY KS1 nc=1
WIRE B1:pos S1:a
WIRE S1:b B1:neg
.relay K1 KS1
.partner S1 S2
";
        let c = Circuit::from_ast(dsl::parse(script).unwrap()).unwrap();
        assert_eq!(c.components().len(), 5);
        assert_eq!(c.wires().count(), 2);
        let s1 = c.component(c.find("S1").unwrap()).unwrap();
        assert_eq!(s1.enabled(), Some(false));
        assert_eq!(s1.layer, Layer::Model);
        assert_eq!(s1.tag, "Main");
        assert_eq!(s1.partner(), c.find("S2"));
        let b1 = c.component(c.find("B1").unwrap()).unwrap();
        assert_eq!(b1.enabled(), Some(true));
    }

    #[test]
    fn test_from_ast_reports_wire_line() {
        let script = "LAMP L1\nLAMP L2\nWIRE L1:a L3:a\n";
        let err = Circuit::from_ast(dsl::parse(script).unwrap()).unwrap_err();
        assert!(matches!(err, CircuitError::ParseError { line: 3, .. }));
    }
}
