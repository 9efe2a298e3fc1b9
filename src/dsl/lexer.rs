//! Lexer (tokenizer) for the netlist script.

use crate::error::{CircuitError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the script.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A word (keyword, component name, terminal name, parameter value)
    Identifier,
    /// A word made only of digits
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Colon ':' between a component and a terminal name
    Colon,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing script input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let start_line = self.line;
        let start_column = self.column;
        let token = |kind: TokenKind, text: String| Token {
            kind,
            text,
            line: start_line,
            column: start_column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        let tok = match ch {
            '\n' => {
                self.advance();
                token(TokenKind::Newline, "\n".to_string())
            }
            '.' => {
                self.advance();
                let text = self.read_word();
                if text.is_empty() {
                    return Err(CircuitError::lexer(
                        start_line,
                        start_column,
                        "expected directive name after '.'",
                    ));
                }
                token(TokenKind::Directive, format!(".{}", text))
            }
            ':' => {
                self.advance();
                token(TokenKind::Colon, ":".to_string())
            }
            '=' => {
                self.advance();
                token(TokenKind::Equals, "=".to_string())
            }
            _ if is_word_char(ch) => {
                let text = self.read_word();
                if text.chars().all(|c| c.is_ascii_digit()) {
                    token(TokenKind::Number, text)
                } else {
                    token(TokenKind::Identifier, text)
                }
            }
            _ => {
                return Err(CircuitError::lexer(
                    start_line,
                    start_column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(tok)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if is_word_char(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_lexer_wire_line() {
        assert_eq!(
            kinds("WIRE B1:pos L1:a"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_params_and_numbers() {
        let mut lexer = Lexer::new("SW S1 closed=0 layer=3d");
        let texts: Vec<(TokenKind, String)> = std::iter::from_fn(|| {
            let tok = lexer.next_token().unwrap();
            (tok.kind != TokenKind::Eof).then_some((tok.kind, tok.text))
        })
        .collect();
        assert_eq!(texts[4], (TokenKind::Number, "0".to_string()));
        assert_eq!(texts[7], (TokenKind::Identifier, "3d".to_string()));
    }

    #[test]
    fn test_lexer_directive_and_comment() {
        let mut lexer = Lexer::new("# header\n.partner S1 S2 ; trailing");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Newline);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".partner");
        assert_eq!(tok.line, 2);
    }

    #[test]
    fn test_lexer_rejects_stray_characters() {
        let mut lexer = Lexer::new("LAMP L1 (x)");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CircuitError::LexerError { column: 9, .. }));
    }
}
