//! Gating components: Switch and RelaySwitch.

use crate::circuit::{ComponentId, Terminal, TerminalRole};

fn two_terminals() -> Vec<Terminal> {
    vec![
        Terminal::new("a", TerminalRole::Other, 0),
        Terminal::new("b", TerminalRole::Other, 1),
    ]
}

/// A user-operated switch.
///
/// Closed: conducts, the signal passes through.
/// Open: the switch is reached but nothing beyond it is.
#[derive(Debug, Clone)]
pub struct Switch {
    pub closed: bool,
    /// Counterpart on the other layer (weak reference by id)
    pub partner: Option<ComponentId>,
}

impl Default for Switch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Switch {
    /// Create a new switch.
    pub fn new(closed: bool) -> Self {
        Self {
            closed,
            partner: None,
        }
    }

    pub fn terminals() -> Vec<Terminal> {
        two_terminals()
    }

    /// Open or close the switch. Returns true if the position changed.
    pub fn set_state(&mut self, closed: bool) -> bool {
        let changed = self.closed != closed;
        self.closed = closed;
        changed
    }
}

/// The contact side of a relay. Only its coil operates it.
///
/// A normally-open contact conducts while actuated; a normally-closed one
/// conducts while released.
#[derive(Debug, Clone, Default)]
pub struct RelaySwitch {
    pub actuated: bool,
    pub normally_closed: bool,
}

impl RelaySwitch {
    /// Create a released relay contact.
    pub fn new(normally_closed: bool) -> Self {
        Self {
            actuated: false,
            normally_closed,
        }
    }

    pub fn terminals() -> Vec<Terminal> {
        two_terminals()
    }

    /// Whether current can pass the contact in its present position.
    pub fn conducts(&self) -> bool {
        self.actuated != self.normally_closed
    }

    /// Move the contact. Returns true if the position changed.
    pub fn actuate(&mut self, actuated: bool) -> bool {
        if self.actuated == actuated {
            return false;
        }
        self.actuated = actuated;
        true
    }
}
