//! Parser for the netlist script.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{CircuitError, Result};

/// Parser for netlist scripts.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
        }
    }

    /// Parse the entire script.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            match &self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier if self.current.text.eq_ignore_ascii_case("WIRE") => {
                    let wire = self.parse_wire()?;
                    ast.wires.push(wire);
                }
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(CircuitError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(CircuitError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    /// A name may be spelled with digits only (`1`, `2`).
    fn expect_word(&mut self) -> Result<String> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::Number => {
                let text = self.current.text.clone();
                self.advance()?;
                Ok(text)
            }
            _ => Err(CircuitError::parse(
                self.current.line,
                format!("expected a name, got {:?}", self.current.kind),
            )),
        }
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(CircuitError::parse(
                self.current.line,
                format!("unexpected trailing token: {:?}", self.current.text),
            )),
        }
    }

    fn parse_directive(&mut self, ast: &mut CircuitAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let first = self.expect_word()?;
        let second = self.expect_word()?;
        let pair = PairDef {
            first,
            second,
            line,
        };

        match directive.to_lowercase().as_str() {
            ".partner" | ".link" => ast.partners.push(pair),
            ".relay" => ast.relays.push(pair),
            _ => {
                return Err(CircuitError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_terminal_ref(&mut self) -> Result<TerminalRef> {
        let component = self.expect_word()?;
        self.expect(TokenKind::Colon)?;
        let terminal = self.expect_word()?;
        Ok(TerminalRef {
            component,
            terminal,
        })
    }

    fn parse_wire(&mut self) -> Result<WireDef> {
        let line = self.current.line;
        self.advance()?; // WIRE
        let from = self.parse_terminal_ref()?;
        let to = self.parse_terminal_ref()?;
        Ok(WireDef { from, to, line })
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let component_type = ComponentType::from_keyword(&keyword).ok_or_else(|| {
            CircuitError::UnknownComponentKind {
                kind: keyword.clone(),
                line,
            }
        })?;
        let name = self.expect_word()?;

        // Parse key=value parameters until end of line
        let mut params = HashMap::new();
        while self.current.kind != TokenKind::Newline && self.current.kind != TokenKind::Eof {
            let key = self.expect(TokenKind::Identifier)?.text.to_lowercase();
            self.expect(TokenKind::Equals)?;
            let value = self.expect_word()?;

            let known = key == "tag" || key == "layer";
            if !known && !component_type.accepted_params().contains(&key.as_str()) {
                return Err(CircuitError::InvalidParameter {
                    component: name,
                    param: key,
                    message: format!("not accepted on line {}", line),
                });
            }
            params.insert(key, value);
        }

        Ok(ComponentDef {
            component_type,
            name,
            params,
            line,
        })
    }
}
