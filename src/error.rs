//! Error types for the CircuitLab core.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! all error conditions that can occur while parsing a netlist script,
//! editing circuit topology, and operating components during simulation.
//!
//! None of these are fatal. A topology or state operation that returns an
//! error leaves the circuit exactly as it was.

use thiserror::Error;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all CircuitLab operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Script Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Unknown component kind keyword
    #[error("Unknown component kind '{kind}' at line {line}")]
    UnknownComponentKind { kind: String, line: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    // ============ Topology Errors ============
    /// Component id or name not present in the registry
    #[error("Component '{component}' not found in circuit")]
    ComponentNotFound { component: String },

    /// Terminal id or name not present on its component
    #[error("Terminal '{terminal}' not found in circuit")]
    TerminalNotFound { terminal: String },

    /// Wire id not present in the wire list
    #[error("Wire '{wire}' not found in circuit")]
    WireNotFound { wire: String },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Both ends of a wire on the same component
    #[error("Cannot wire component '{component}' to itself")]
    SelfConnection { component: String },

    /// A wire between the same two terminals already exists
    #[error("Terminals '{a}' and '{b}' are already wired together")]
    DuplicateWire { a: String, b: String },

    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Simulation Errors ============
    /// Operation not supported by the component's kind
    #[error("Component '{component}' ({kind}) cannot be {action}")]
    UnsupportedOperation {
        component: String,
        kind: &'static str,
        action: &'static str,
    },

    /// Partners must be of the same switchable kind
    #[error("Cannot pair '{a}' with '{b}': partners must both be switches or both be batteries")]
    PartnerKindMismatch { a: String, b: String },

    /// 2D and 3D views disagree, so no partners were linked
    #[error("Link failed: {reason}")]
    LinkMismatch { reason: String },

    // ============ I/O Errors ============
    /// Error reading a netlist script
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CircuitError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create a component-not-found error
    pub fn component_not_found(component: impl ToString) -> Self {
        Self::ComponentNotFound {
            component: component.to_string(),
        }
    }

    /// Create an invalid topology error
    pub fn topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Create a link mismatch error
    pub fn link_mismatch(reason: impl Into<String>) -> Self {
        Self::LinkMismatch {
            reason: reason.into(),
        }
    }
}
