//! Abstract Syntax Tree types for the netlist script.

use std::collections::HashMap;

use crate::error::{CircuitError, Result};

/// Complete AST representation of a parsed script.
#[derive(Debug, Clone, Default)]
pub struct CircuitAst {
    /// All component instances, in script order
    pub components: Vec<ComponentDef>,
    /// All wires, in script order
    pub wires: Vec<WireDef>,
    /// `.partner` pairs
    pub partners: Vec<PairDef>,
    /// `.relay` coil/contact pairs
    pub relays: Vec<PairDef>,
}

impl CircuitAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component definition from the script.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub component_type: ComponentType,
    /// Unique component name
    pub name: String,
    /// `key=value` parameters, keys lowercased
    pub params: HashMap<String, String>,
    /// Source line number for error reporting
    pub line: usize,
}

impl ComponentDef {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Read a boolean parameter (`on`/`off`, `true`/`false`, `1`/`0`).
    pub fn flag(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.param(key) else {
            return Ok(None);
        };
        match raw.to_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Ok(Some(true)),
            "off" | "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(CircuitError::InvalidParameter {
                component: self.name.clone(),
                param: key.to_string(),
                message: format!("expected on/off, got '{}'", raw),
            }),
        }
    }
}

/// `component:terminal` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalRef {
    pub component: String,
    pub terminal: String,
}

impl std::fmt::Display for TerminalRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.component, self.terminal)
    }
}

/// A `WIRE` line.
#[derive(Debug, Clone)]
pub struct WireDef {
    pub from: TerminalRef,
    pub to: TerminalRef,
    pub line: usize,
}

/// A directive naming two components.
#[derive(Debug, Clone)]
pub struct PairDef {
    pub first: String,
    pub second: String,
    pub line: usize,
}

/// Component kinds supported by the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Battery,
    ThreePhase,
    Lamp,
    Switch,
    RelayCoil,
    RelaySwitch,
    Junction,
}

impl ComponentType {
    /// Look up the leading keyword of a component line.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BAT" | "BATTERY" => Some(ComponentType::Battery),
            "PHASE3" | "3P4W" => Some(ComponentType::ThreePhase),
            "LAMP" => Some(ComponentType::Lamp),
            "SW" | "SWITCH" => Some(ComponentType::Switch),
            "COIL" => Some(ComponentType::RelayCoil),
            "RELAY" => Some(ComponentType::RelaySwitch),
            "JUNCTION" | "J" => Some(ComponentType::Junction),
            _ => None,
        }
    }

    /// Parameters accepted on a line of this kind, besides `tag` and `layer`.
    pub fn accepted_params(&self) -> &'static [&'static str] {
        match self {
            ComponentType::Battery | ComponentType::ThreePhase => &["on"],
            ComponentType::Switch => &["closed"],
            ComponentType::RelaySwitch => &["nc"],
            ComponentType::Lamp | ComponentType::RelayCoil | ComponentType::Junction => &[],
        }
    }
}
