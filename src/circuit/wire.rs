//! Wires: edges joining two terminals on two different components.

use super::types::{ComponentId, TerminalId, WireId};

/// A connection between exactly two terminals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub id: WireId,
    pub a: TerminalId,
    pub b: TerminalId,
    /// Both endpoint components powered after the last pass
    fully_powered: bool,
}

impl Wire {
    pub(crate) fn new(id: WireId, a: TerminalId, b: TerminalId) -> Self {
        Self {
            id,
            a,
            b,
            fully_powered: false,
        }
    }

    /// The two components this wire joins.
    pub fn components(&self) -> (ComponentId, ComponentId) {
        (self.a.component, self.b.component)
    }

    pub fn touches(&self, component: ComponentId) -> bool {
        self.a.component == component || self.b.component == component
    }

    /// Given one component, return the component on the other end.
    pub fn other_component(&self, component: ComponentId) -> Option<ComponentId> {
        if self.a.component == component {
            Some(self.b.component)
        } else if self.b.component == component {
            Some(self.a.component)
        } else {
            None
        }
    }

    /// True when this wire joins the same pair of terminals, in either order.
    pub fn joins(&self, x: TerminalId, y: TerminalId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Wire-coloring flag for the visual layer.
    pub fn is_fully_powered(&self) -> bool {
        self.fully_powered
    }

    pub(crate) fn set_fully_powered(&mut self, powered: bool) {
        self.fully_powered = powered;
    }
}
