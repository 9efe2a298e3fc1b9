//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

/// A unique identifier for a component in the circuit.
///
/// Ids are handed out in creation order and never reused, so a stale id
/// held by the UI after a deletion simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A terminal, addressed by its owning component and its position in that
/// component's terminal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId {
    pub component: ComponentId,
    pub slot: usize,
}

impl TerminalId {
    pub fn new(component: ComponentId, slot: usize) -> Self {
        Self { component, slot }
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.slot)
    }
}

/// A unique identifier for a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub usize);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Identifier of a connectivity group in the net tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Electrical role of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalRole {
    /// Live reference; current originates here when the owner is enabled
    Source,
    /// Return reference
    Ground,
    /// Neutral conductor of a multi-phase supply (carries no signal origin)
    Neutral,
    /// Plain pass-through attachment point
    Other,
}

impl fmt::Display for TerminalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminalRole::Source => "source",
            TerminalRole::Ground => "ground",
            TerminalRole::Neutral => "neutral",
            TerminalRole::Other => "other",
        };
        f.write_str(s)
    }
}

/// A typed attachment point on a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    /// Short name used in netlist scripts (`pos`, `neg`, `a`, ...)
    pub name: String,
    pub role: TerminalRole,
    /// Disambiguates several terminals of the same role on one component
    pub index: usize,
}

impl Terminal {
    pub fn new(name: impl Into<String>, role: TerminalRole, index: usize) -> Self {
        Self {
            name: name.into(),
            role,
            index,
        }
    }

    /// Build a terminal list from roles, numbering each role from zero and
    /// naming terminals `t0`, `t1`, ...
    pub fn from_roles(roles: &[TerminalRole]) -> Vec<Terminal> {
        let mut seen: Vec<TerminalRole> = Vec::with_capacity(roles.len());
        roles
            .iter()
            .enumerate()
            .map(|(slot, &role)| {
                let index = seen.iter().filter(|r| **r == role).count();
                seen.push(role);
                Terminal::new(format!("t{}", slot), role, index)
            })
            .collect()
    }
}

/// Which rendering of the circuit a component belongs to.
///
/// The same physical circuit can be drawn as a 2D schematic and built as a
/// 3D model; counterparts on the two layers are matched by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layer {
    #[default]
    Schematic,
    Model,
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "2d" | "schematic" => Ok(Layer::Schematic),
            "3d" | "model" => Ok(Layer::Model),
            _ => Err(format!("expected 2d or 3d, got '{}'", s)),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Schematic => f.write_str("2d"),
            Layer::Model => f.write_str("3d"),
        }
    }
}
