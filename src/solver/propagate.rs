//! Entry points and signal flooding.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::trace;

use crate::circuit::{Circuit, ComponentId, TerminalRole};

/// Wire adjacency between non-source components.
pub(crate) type NeighborMap = BTreeMap<ComponentId, BTreeSet<ComponentId>>;

/// Entry point mapped to the components whose terminal it touches.
pub(crate) type EntryMap = BTreeMap<ComponentId, BTreeSet<ComponentId>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    Live,
    Ground,
}

/// Components adjacent to an enabled source terminal or to a ground terminal.
#[derive(Debug, Default)]
pub(crate) struct EntryPoints {
    /// Live entry -> sources feeding it
    pub live: EntryMap,
    /// Ground entry -> owners of the ground terminals it touches
    pub ground: EntryMap,
}

/// Build the adjacency used for traversal. Sources are left out: they are
/// where paths start and end, never nodes a path passes through. Every other
/// wired component is a node, even when its only wires lead to sources.
pub(crate) fn neighbor_map(circuit: &Circuit) -> NeighborMap {
    let mut map = NeighborMap::new();
    let passable = |id| circuit.component(id).map_or(false, |c| !c.is_source());
    for wire in circuit.wires() {
        let (x, y) = wire.components();
        for id in [x, y] {
            if passable(id) {
                map.entry(id).or_default();
            }
        }
        if passable(x) && passable(y) {
            map.entry(x).or_default().insert(y);
            map.entry(y).or_default().insert(x);
        }
    }
    map
}

pub(crate) fn find_entry_points(circuit: &Circuit) -> EntryPoints {
    let mut entries = EntryPoints::default();

    for wire in circuit.wires() {
        for (near, far) in [(wire.a, wire.b), (wire.b, wire.a)] {
            let (Some(owner), Some(target)) =
                (circuit.component(near.component), circuit.component(far.component))
            else {
                continue;
            };
            let Some(terminal) = owner.terminal(near.slot) else {
                continue;
            };
            if target.is_source() {
                continue;
            }

            match terminal.role {
                TerminalRole::Source if owner.is_active_source() => {
                    entries.live.entry(target.id).or_default().insert(owner.id);
                }
                TerminalRole::Ground if !owner.is_source() || owner.is_active_source() => {
                    entries.ground.entry(target.id).or_default().insert(owner.id);
                }
                _ => {}
            }
        }
    }

    trace!(
        live = ?entries.live.keys().collect::<Vec<_>>(),
        ground = ?entries.ground.keys().collect::<Vec<_>>(),
        "entry points"
    );
    entries
}

/// Spread a signal breadth-first from its entry points.
///
/// Every component reached is marked. Components that do not conduct are
/// marked but do not forward the signal. Returns the number reached.
pub(crate) fn flood<I>(
    circuit: &mut Circuit,
    neighbors: &NeighborMap,
    entries: I,
    signal: Signal,
) -> usize
where
    I: IntoIterator<Item = ComponentId>,
{
    let mut visited = BTreeSet::new();
    let mut queue: VecDeque<ComponentId> = entries.into_iter().collect();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let Some(component) = circuit.component_mut(id) else {
            continue;
        };
        match signal {
            Signal::Live => component.mark_live(),
            Signal::Ground => component.mark_grounded(),
        }
        if !component.conducts() {
            continue;
        }
        if let Some(next) = neighbors.get(&id) {
            queue.extend(next.iter().filter(|n| !visited.contains(*n)));
        }
    }

    visited.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    fn circuit(script: &str) -> Circuit {
        Circuit::from_ast(dsl::parse(script).unwrap()).unwrap()
    }

    #[test]
    fn test_entry_points_of_enabled_battery() {
        let c = circuit(
            "BAT B1 on=1\nLAMP L1\nLAMP L2\nWIRE B1:pos L1:a\nWIRE B1:neg L2:b\n",
        );
        let b1 = c.find("B1").unwrap();
        let entries = find_entry_points(&c);
        assert_eq!(entries.live.get(&c.find("L1").unwrap()), Some(&BTreeSet::from([b1])));
        assert!(entries.ground.contains_key(&c.find("L2").unwrap()));
        assert!(!entries.live.contains_key(&c.find("L2").unwrap()));
    }

    #[test]
    fn test_disabled_battery_contributes_nothing() {
        let c = circuit("BAT B1 on=0\nLAMP L1\nWIRE B1:pos L1:a\nWIRE L1:b B1:neg\n");
        let entries = find_entry_points(&c);
        assert!(entries.live.is_empty());
        assert!(entries.ground.is_empty());
    }

    #[test]
    fn test_three_phase_uses_r_and_t() {
        let c = circuit(
            "PHASE3 P1\nLAMP L1\nLAMP L2\nWIRE P1:r L1:a\nWIRE P1:s L2:a\nWIRE P1:t L2:b\n",
        );
        let entries = find_entry_points(&c);
        assert_eq!(entries.live.len(), 1);
        assert!(entries.live.contains_key(&c.find("L1").unwrap()));
        assert!(entries.ground.contains_key(&c.find("L2").unwrap()));
    }

    #[test]
    fn test_component_wired_only_to_sources_is_a_node() {
        let c = circuit("BAT B1 on=1\nLAMP L1\nWIRE B1:pos L1:a\nWIRE L1:b B1:neg\n");
        let neighbors = neighbor_map(&c);
        let l1 = c.find("L1").unwrap();
        assert_eq!(neighbors.get(&l1), Some(&BTreeSet::new()));
        assert!(!neighbors.contains_key(&c.find("B1").unwrap()));
    }

    #[test]
    fn test_flood_stops_at_open_switch() {
        let mut c = circuit(
            "LAMP L1\nSW S1 closed=0\nLAMP L2\nWIRE L1:b S1:a\nWIRE S1:b L2:a\n",
        );
        let neighbors = neighbor_map(&c);
        let l1 = c.find("L1").unwrap();
        let reached = flood(&mut c, &neighbors, [l1], Signal::Live);
        assert_eq!(reached, 2);
        assert!(c.component(c.find("S1").unwrap()).unwrap().is_live());
        assert!(!c.component(c.find("L2").unwrap()).unwrap().is_live());
    }

    #[test]
    fn test_flood_terminates_on_cycles() {
        let mut c = circuit(
            "LAMP A\nLAMP B\nLAMP C\nWIRE A:b B:a\nWIRE B:b C:a\nWIRE C:b A:a\n",
        );
        let neighbors = neighbor_map(&c);
        let a = c.find("A").unwrap();
        assert_eq!(flood(&mut c, &neighbors, [a], Signal::Ground), 3);
        assert!(c.components().iter().all(|x| x.is_grounded()));
    }
}
