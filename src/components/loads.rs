//! Loads: Lamp and RelayCoil.

use crate::circuit::{ComponentId, Terminal, TerminalRole};

/// Side effect requested by a component when its power state flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actuation {
    /// Relay contact to move
    pub target: ComponentId,
    /// True to pull the contact in, false to release it
    pub engage: bool,
}

/// A lamp. Lights while powered.
#[derive(Debug, Clone, Default)]
pub struct Lamp {
    pub lit: bool,
}

impl Lamp {
    pub fn terminals() -> Vec<Terminal> {
        vec![
            Terminal::new("a", TerminalRole::Other, 0),
            Terminal::new("b", TerminalRole::Other, 1),
        ]
    }
}

/// The coil side of a relay.
///
/// The coil conducts like any load; when it gains power it pulls in its
/// linked contact and when it loses power it releases it.
#[derive(Debug, Clone, Default)]
pub struct RelayCoil {
    /// Contact operated by this coil (weak reference by id)
    pub linked_switch: Option<ComponentId>,
}

impl RelayCoil {
    pub fn new(linked_switch: Option<ComponentId>) -> Self {
        Self { linked_switch }
    }

    pub fn terminals() -> Vec<Terminal> {
        vec![
            Terminal::new("a", TerminalRole::Other, 0),
            Terminal::new("b", TerminalRole::Other, 1),
        ]
    }

    /// Actuation for the linked contact, if any.
    pub fn drive(&self, engage: bool) -> Option<Actuation> {
        self.linked_switch.map(|target| Actuation { target, engage })
    }
}
