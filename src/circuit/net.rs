//! Net tracker: groups of components transitively joined by wires.
//!
//! Nets are a cache over the wire list. Joining is incremental (union of
//! the smaller net into the larger); removal of a member is O(net size)
//! and cannot detect a split, so callers that may have split a net rebuild
//! the index from the wire list with [`NetTracker::rebuild`].

use std::collections::{BTreeSet, HashMap};

use super::types::{ComponentId, NetId};

#[derive(Debug, Clone, Default)]
pub struct NetTracker {
    nets: HashMap<NetId, BTreeSet<ComponentId>>,
    membership: HashMap<ComponentId, NetId>,
    next_id: usize,
}

impl NetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `a` and `b` are now directly joined.
    pub fn register_connection(&mut self, a: ComponentId, b: ComponentId) {
        if a == b {
            return;
        }
        match (self.net_id(a), self.net_id(b)) {
            (None, None) => {
                let id = NetId(self.next_id);
                self.next_id += 1;
                self.nets.insert(id, BTreeSet::from([a, b]));
                self.membership.insert(a, id);
                self.membership.insert(b, id);
            }
            (Some(net), None) => self.join(net, b),
            (None, Some(net)) => self.join(net, a),
            (Some(na), Some(nb)) if na != nb => self.merge(na, nb),
            _ => {}
        }
    }

    fn join(&mut self, net: NetId, component: ComponentId) {
        if let Some(members) = self.nets.get_mut(&net) {
            members.insert(component);
            self.membership.insert(component, net);
        }
    }

    fn merge(&mut self, x: NetId, y: NetId) {
        let size = |id: &NetId| self.nets.get(id).map_or(0, BTreeSet::len);
        let (keep, absorb) = if size(&x) >= size(&y) { (x, y) } else { (y, x) };
        let Some(moved) = self.nets.remove(&absorb) else {
            return;
        };
        for &member in &moved {
            self.membership.insert(member, keep);
        }
        if let Some(members) = self.nets.get_mut(&keep) {
            members.extend(moved);
        }
    }

    /// Every component transitively connected to `component`, itself
    /// included. Empty if it is isolated.
    pub fn net_of(&self, component: ComponentId) -> BTreeSet<ComponentId> {
        self.net_id(component)
            .and_then(|id| self.nets.get(&id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn net_id(&self, component: ComponentId) -> Option<NetId> {
        self.membership.get(&component).copied()
    }

    /// True when both components sit in the same net.
    pub fn connected(&self, a: ComponentId, b: ComponentId) -> bool {
        match (self.net_id(a), self.net_id(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Drop a component from its net, dissolving the net if fewer than two
    /// members remain.
    pub fn remove_component(&mut self, component: ComponentId) {
        let Some(id) = self.membership.remove(&component) else {
            return;
        };
        let dissolve = match self.nets.get_mut(&id) {
            Some(members) => {
                members.remove(&component);
                members.len() < 2
            }
            None => false,
        };
        if dissolve {
            if let Some(rest) = self.nets.remove(&id) {
                for member in rest {
                    self.membership.remove(&member);
                }
            }
        }
    }

    /// Drop every net.
    pub fn clear(&mut self) {
        self.nets.clear();
        self.membership.clear();
    }

    /// Discard the index and rebuild it from a set of connections.
    pub fn rebuild<I>(&mut self, connections: I)
    where
        I: IntoIterator<Item = (ComponentId, ComponentId)>,
    {
        self.clear();
        for (a, b) in connections {
            self.register_connection(a, b);
        }
    }

    /// All nets, each as a sorted member set.
    pub fn nets(&self) -> impl Iterator<Item = &BTreeSet<ComponentId>> {
        self.nets.values()
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: usize) -> ComponentId {
        ComponentId(n)
    }

    #[test]
    fn test_chain_forms_one_net() {
        let mut nets = NetTracker::new();
        nets.register_connection(c(0), c(1));
        nets.register_connection(c(1), c(2));
        assert_eq!(nets.len(), 1);
        assert_eq!(nets.net_of(c(0)), BTreeSet::from([c(0), c(1), c(2)]));
    }

    #[test]
    fn test_merge_and_noop() {
        let mut nets = NetTracker::new();
        nets.register_connection(c(0), c(1));
        nets.register_connection(c(2), c(3));
        nets.register_connection(c(3), c(4));
        assert_eq!(nets.len(), 2);

        nets.register_connection(c(1), c(4));
        assert_eq!(nets.len(), 1);
        assert_eq!(nets.net_of(c(0)).len(), 5);

        nets.register_connection(c(0), c(2));
        assert_eq!(nets.len(), 1);
        assert!(nets.connected(c(0), c(4)));
    }

    #[test]
    fn test_isolated_component_has_empty_net() {
        let mut nets = NetTracker::new();
        nets.register_connection(c(0), c(0));
        assert!(nets.is_empty());
        assert!(nets.net_of(c(9)).is_empty());
        assert!(!nets.connected(c(0), c(9)));
    }

    #[test]
    fn test_remove_dissolves_small_net() {
        let mut nets = NetTracker::new();
        nets.register_connection(c(0), c(1));
        nets.remove_component(c(0));
        assert!(nets.is_empty());
        assert!(nets.net_of(c(1)).is_empty());
    }

    #[test]
    fn test_remove_keeps_larger_net() {
        let mut nets = NetTracker::new();
        nets.register_connection(c(0), c(1));
        nets.register_connection(c(1), c(2));
        nets.remove_component(c(2));
        assert_eq!(nets.net_of(c(0)), BTreeSet::from([c(0), c(1)]));
    }

    #[test]
    fn test_rebuild_splits() {
        let mut nets = NetTracker::new();
        nets.register_connection(c(0), c(1));
        nets.register_connection(c(1), c(2));
        nets.rebuild([(c(0), c(1))]);
        assert!(!nets.connected(c(0), c(2)));
        assert!(nets.net_of(c(2)).is_empty());
    }
}
