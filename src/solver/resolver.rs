//! A single power-resolution pass.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::paths::{PathGraph, PathSearch};
use super::propagate::{find_entry_points, flood, neighbor_map, NeighborMap, Signal};
use crate::circuit::{Circuit, ComponentId};
use crate::components::Actuation;

/// What one pass computed.
#[derive(Debug, Default)]
pub(crate) struct PassOutcome {
    pub powered: BTreeSet<ComponentId>,
    /// Relay contact moves requested by coils, at most one per contact
    pub actuations: Vec<Actuation>,
    pub truncated: bool,
}

/// Run one pass over the circuit and publish its result.
///
/// Resets every signal flag, floods live and ground signals, searches for
/// complete source-to-ground paths, applies per-kind power behaviour and
/// updates the wire flags. Actuations are returned, not applied.
pub(crate) fn run_pass(circuit: &mut Circuit, max_search_steps: usize) -> PassOutcome {
    for component in circuit.components_mut().iter_mut() {
        component.reset_signals();
    }
    circuit.rebuild_nets();

    let neighbors = neighbor_map(circuit);
    let entries = find_entry_points(circuit);
    let live = flood(circuit, &neighbors, entries.live.keys().copied(), Signal::Live);
    let grounded = flood(circuit, &neighbors, entries.ground.keys().copied(), Signal::Ground);

    let graph = path_graph(circuit, &neighbors);
    let search = PathSearch::new(&graph, &entries.ground, max_search_steps).run(&entries.live);

    let mut requested: BTreeMap<ComponentId, bool> = BTreeMap::new();
    for component in circuit.components_mut().iter_mut() {
        let powered = search.powered.contains(&component.id);
        if let Some(actuation) = component.apply_power(powered) {
            *requested.entry(actuation.target).or_insert(false) |= actuation.engage;
        }
    }

    for wire in circuit.wires_mut() {
        let (a, b) = wire.components();
        wire.set_fully_powered(search.powered.contains(&a) && search.powered.contains(&b));
    }

    debug!(
        live,
        grounded,
        powered = search.powered.len(),
        steps = search.steps,
        "pass complete"
    );

    PassOutcome {
        powered: search.powered,
        actuations: requested
            .into_iter()
            .map(|(target, engage)| Actuation { target, engage })
            .collect(),
        truncated: search.truncated,
    }
}

/// Components that are live, grounded and conducting, linked to each other.
fn path_graph(circuit: &Circuit, neighbors: &NeighborMap) -> PathGraph {
    let eligible = |id: &ComponentId| {
        circuit
            .component(*id)
            .map_or(false, |c| c.is_live() && c.is_grounded() && c.conducts())
    };

    neighbors
        .iter()
        .filter(|(id, _)| eligible(id))
        .map(|(&id, next)| (id, next.iter().copied().filter(|n| eligible(n)).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;
    use crate::dsl;

    fn circuit(script: &str) -> Circuit {
        Circuit::from_ast(dsl::parse(script).unwrap()).unwrap()
    }

    fn powered(c: &Circuit, name: &str) -> bool {
        c.component(c.find(name).unwrap()).unwrap().is_powered()
    }

    #[test]
    fn test_series_loop() {
        let mut c = circuit("BAT B1 on=1\nLAMP L1\nWIRE B1:pos L1:a\nWIRE L1:b B1:neg\n");
        let outcome = run_pass(&mut c, 1000);
        assert!(powered(&c, "L1"));
        assert!(powered(&c, "B1"));
        assert_eq!(outcome.powered.len(), 2);
        assert!(c.wires().all(|w| w.is_fully_powered()));
        let l1 = c.component(c.find("L1").unwrap()).unwrap();
        assert!(matches!(l1.kind(), ComponentKind::Lamp(l) if l.lit));
    }

    #[test]
    fn test_dead_end_lamp_stays_dark() {
        let script = "\
BAT B1 on=1
LAMP L1
LAMP L2
WIRE B1:pos L1:a
WIRE L1:b B1:neg
WIRE L1:b L2:a
";
        let mut c = circuit(script);
        run_pass(&mut c, 1000);
        assert!(powered(&c, "L1"));
        let l2 = c.component(c.find("L2").unwrap()).unwrap();
        assert!(l2.is_live() && l2.is_grounded());
        assert!(!l2.is_powered());
        let spur = c.wires().find(|w| w.touches(l2.id)).unwrap();
        assert!(!spur.is_fully_powered());
    }

    #[test]
    fn test_coil_requests_actuation() {
        let script = "\
BAT B1 on=1
COIL K1
RELAY KS1
WIRE B1:pos K1:a
WIRE K1:b B1:neg
.relay K1 KS1
";
        let mut c = circuit(script);
        let outcome = run_pass(&mut c, 1000);
        assert_eq!(
            outcome.actuations,
            vec![Actuation {
                target: c.find("KS1").unwrap(),
                engage: true
            }]
        );
    }

    #[test]
    fn test_generic_ground_terminal_returns_current() {
        use crate::circuit::TerminalRole;

        let mut c = circuit("BAT B1 on=1\nLAMP L1\nWIRE B1:pos L1:a\n");
        let g = c
            .add_generic("FRAME", &[TerminalRole::Other, TerminalRole::Ground])
            .unwrap();
        c.connect_named("L1:b", "FRAME:t1").unwrap();
        run_pass(&mut c, 1000);
        assert!(powered(&c, "L1"));
        assert!(c.component(g).unwrap().is_powered());
    }

    #[test]
    fn test_pass_rebuilds_stale_flags() {
        let mut c = circuit("BAT B1 on=1\nLAMP L1\nWIRE B1:pos L1:a\nWIRE L1:b B1:neg\n");
        run_pass(&mut c, 1000);
        let wire = c.wires().next().unwrap().id;
        c.remove_wire(wire).unwrap();
        run_pass(&mut c, 1000);
        assert!(!powered(&c, "L1"));
        assert!(!powered(&c, "B1"));
    }
}
