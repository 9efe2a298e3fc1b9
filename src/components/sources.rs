//! Power sources: Battery and three-phase four-wire supply.

use crate::circuit::{ComponentId, Terminal, TerminalRole};

/// A battery.
///
/// Terminals:
///   pos (Source) ----[ + | - ]---- neg (Ground)
///
/// Starts switched off; the user turns it on during simulation. A battery
/// can be paired with its counterpart on the other view layer.
#[derive(Debug, Clone, Default)]
pub struct Battery {
    pub enabled: bool,
    /// Counterpart on the other layer (weak reference by id)
    pub partner: Option<ComponentId>,
}

impl Battery {
    /// Create a new battery.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            partner: None,
        }
    }

    pub fn terminals() -> Vec<Terminal> {
        vec![
            Terminal::new("pos", TerminalRole::Source, 0),
            Terminal::new("neg", TerminalRole::Ground, 0),
        ]
    }

    /// Switch the output. Returns true if it changed.
    pub fn set_state(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }
}

/// A three-phase four-wire supply panel.
///
/// Phase R is the live reference and phase T the return; S is exposed for
/// wiring but carries no signal, and N is the neutral.
#[derive(Debug, Clone)]
pub struct ThreePhaseSource {
    pub enabled: bool,
}

impl Default for ThreePhaseSource {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ThreePhaseSource {
    /// Create a new supply.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Switch the supply. Returns true if it changed.
    pub fn set_state(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    pub fn terminals() -> Vec<Terminal> {
        vec![
            Terminal::new("r", TerminalRole::Source, 0),
            Terminal::new("s", TerminalRole::Other, 0),
            Terminal::new("t", TerminalRole::Ground, 0),
            Terminal::new("n", TerminalRole::Neutral, 0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_starts_from_given_state() {
        let mut b = Battery::new(false);
        assert!(!b.enabled);
        assert!(b.set_state(true));
        assert!(b.enabled);
        assert!(!b.set_state(true));
        assert!(b.partner.is_none());
    }

    #[test]
    fn test_three_phase_terminal_roles() {
        let terminals = ThreePhaseSource::terminals();
        let roles: Vec<TerminalRole> = terminals.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TerminalRole::Source,
                TerminalRole::Other,
                TerminalRole::Ground,
                TerminalRole::Neutral
            ]
        );
        assert!(ThreePhaseSource::default().enabled);
    }
}
