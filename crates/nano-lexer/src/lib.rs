//! Nano Lexer
//!
//! Tokenizes nano template source into a stream of positioned tokens.
//! The scanner switches lexical rules with its context: markup text,
//! `<style>` and `<script>` segments, `//` comments, and the `{ }` / `@{ }`
//! expression sublanguage.
//!
//! Scanning never fails: malformed input degrades to `Invalid` tokens or an
//! early `Eof`, and the parser reports the problem with a position.
//!
//! # Example
//!
//! ```
//! use nano_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("<p>{name}</p>");
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Text,
//!         TokenKind::ExprStart,
//!         TokenKind::Identifier,
//!         TokenKind::ExprEnd,
//!         TokenKind::Text,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

pub mod scanner;
pub mod token;

pub use scanner::{Mode, Scanner};
pub use token::{Span, Token, TokenKind};

/// Run the scanner to completion. The terminal `Eof` token is included.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::tokenize(source)
}
