//! Netlist script for describing switching circuits.
//!
//! The script is line-oriented and human-editable. It is how the CLI, the
//! wasm bindings and the tests describe a circuit; the library never writes
//! it back out.
//!
//! # Grammar Overview
//!
//! ```text
//! script       = { line }
//! line         = comment | directive | component | wire | empty
//! comment      = ('#' | ';') { any_char }
//! component    = kind name { param '=' value }
//! wire         = "WIRE" terminal_ref terminal_ref
//! terminal_ref = name ':' terminal_name
//! directive    = ".partner" name name | ".relay" coil_name contact_name
//! ```
//!
//! # Component Kinds
//!
//! | Kind | Description | Terminals | Parameters |
//! |------|-------------|-----------|------------|
//! | BAT | Battery | `pos` (source), `neg` (ground) | `on` (default off) |
//! | PHASE3 | Three-phase four-wire supply | `r` (source), `s`, `t` (ground), `n` (neutral) | `on` (default on) |
//! | LAMP | Lamp | `a`, `b` | |
//! | SW | Switch | `a`, `b` | `closed` (default on) |
//! | COIL | Relay coil | `a`, `b` | |
//! | RELAY | Relay contact | `a`, `b` | `nc` (normally closed, default off) |
//! | JUNCTION | Wire junction | `a`, `b` | |
//!
//! Every kind also accepts `tag=<label>` and `layer=2d|3d`.
//!
//! # Example
//!
//! ```text
//! # Battery, switch and lamp in series
//! BAT  B1 on=1
//! SW   S1 closed=0
//! LAMP L1
//!
//! WIRE B1:pos S1:a
//! WIRE S1:b   L1:a
//! WIRE L1:b   B1:neg
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a netlist script into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist script file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::CircuitError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    parse(&content)
}
