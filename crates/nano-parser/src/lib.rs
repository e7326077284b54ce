//! Nano Parser
//!
//! Parses a nano token stream into an Abstract Syntax Tree.
//! The statement parser handles template constructs (`if`/`else`,
//! `switch`/`case`/`default`, `for`, `import`, interpolation, literal text)
//! and delegates inline expressions to the precedence-climbing expression
//! parser in `expr_parser`.
//!
//! Parsing is fail-fast: the first problem aborts with a [`ParseError`]
//! carrying the position of the offending token.
//!
//! # Example
//!
//! ```
//! use nano_parser::ast::{Expr, Node};
//!
//! let program = nano_parser::compile("<p>{name}</p>").unwrap();
//! assert_eq!(program.body.len(), 3);
//! assert_eq!(program.body[1], Node::Expression { value: Expr::ident("name") });
//! ```

pub mod ast;
pub mod expr_parser;
pub mod parser;

pub use ast::{Expr, Node, Program};
pub use parser::Parser;

use nano_lexer::{Token, TokenKind};

/// Parser error with position information.
///
/// Every variant carries the 1-based line and column of the token that
/// caused it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A token of the right kind whose value is malformed.
    #[error("Invalid syntax at line {line}, column {column}: {message}")]
    InvalidSyntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// Statement dispatch found a token it has no rule for.
    #[error("Unknown token {kind} \"{text}\" at line {line}, column {column}")]
    UnknownToken {
        kind: TokenKind,
        text: String,
        line: usize,
        column: usize,
    },

    #[error("Unexpected token \"{found}\" at line {line}, column {column}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("Unexpected end of file at line {line}, column {column}, expected {expected}")]
    UnexpectedEndOfFile {
        expected: &'static str,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidSyntax { line, .. }
            | ParseError::UnknownToken { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnexpectedEndOfFile { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::InvalidSyntax { column, .. }
            | ParseError::UnknownToken { column, .. }
            | ParseError::UnexpectedToken { column, .. }
            | ParseError::UnexpectedEndOfFile { column, .. } => *column,
        }
    }
}

/// Parse a token stream (as produced by [`nano_lexer::tokenize`]) into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Tokenize and parse template source.
pub fn compile(source: &str) -> Result<Program, ParseError> {
    parse(nano_lexer::tokenize(source))
}
