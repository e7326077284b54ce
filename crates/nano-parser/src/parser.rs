//! Statement parser for nano templates.
//!
//! Parses a stream of source-level tokens (from `nano-lexer`) into a
//! `Program` AST. Handles literal text and comments, interpolation sites,
//! and the `if`/`switch`/`for`/`import` blocks, and delegates inline
//! expressions to `expr_parser`.
//!
//! Uses recursive descent with one token of lookahead: every block starts
//! with `expr_start`, and the keyword right after it picks the sub-parser.

use crate::ast::{Alternate, Case, DefaultCase, Expr, For, If, Node, Program, Switch, SwitchCase};
use crate::ParseError;
use log::debug;
use nano_lexer::{Span, Token, TokenKind};

/// Deepest nesting of blocks and sub-expressions accepted before parsing
/// fails. Keeps recursion within the default thread stack.
pub(crate) const MAX_DEPTH: usize = 64;

/// Terminators of a `{case}` or `{default}` body.
const CASE_TERMINATORS: &[TokenKind] = &[
    TokenKind::CaseStart,
    TokenKind::DefaultStart,
    TokenKind::SwitchEnd,
];

/// Nano template parser.
///
/// Converts a flat token stream into a `Program` using recursive descent.
/// Once the cursor runs past the stream, the final `Eof` token is returned
/// forever, so every failed expectation still reports a position.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Create a new parser for the given tokens. An `Eof` sentinel is
    /// appended when the stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.is(TokenKind::Eof) => None,
            Some(last) => {
                let (line, column) = end_of(last);
                Some(Span::new(last.span.end, last.span.end, line, column))
            }
            None => Some(Span::new(0, 0, 1, 1)),
        };

        if let Some(span) = eof {
            tokens.push(Token::new(TokenKind::Eof, span, ""));
        }

        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse statements until `Eof`.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();

        while !self.check(TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }

        debug!(target: "nano::parser", "parsed {} top-level nodes", body.len());
        Ok(Program { body })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        let kind = self.current().kind;

        if kind.is_markup() {
            let token = self.advance();
            return Ok(Node::Text { value: token.text });
        }

        match kind {
            TokenKind::Comment => {
                let token = self.advance();
                Ok(Node::Comment { value: token.text })
            }
            TokenKind::ExprStart => self.nested(Self::parse_block),
            _ => {
                let token = self.current();
                let err = ParseError::UnknownToken {
                    kind,
                    text: token.text.clone(),
                    line: token.span.line,
                    column: token.span.column,
                };
                debug!(target: "nano::parser", "{err}");
                Err(err)
            }
        }
    }

    /// `{` followed by a block keyword, or an interpolation.
    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let keyword = self.peek().kind;
        self.advance(); // consume `{`

        match keyword {
            TokenKind::IfStart => self.parse_if(false).map(Node::If),
            TokenKind::ElseStart => self.parse_else().map(|alternate| match alternate {
                Alternate::ElseIf(block) => Node::If(block),
                Alternate::Else(program) => Node::Program(program),
            }),
            TokenKind::SwitchStart => self.parse_switch().map(Node::Switch),
            TokenKind::ForStart => self.parse_for().map(Node::For),
            TokenKind::ImportStart => self.parse_import(),
            _ => self.parse_interpolation(),
        }
    }

    /// Parse statements until the current token is `{` followed by one of
    /// `terminators`. The terminating block is left unconsumed.
    fn parse_until(
        &mut self,
        terminators: &[TokenKind],
        expected: &'static str,
    ) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();

        while !self.at_block(terminators) {
            if self.check(TokenKind::Eof) {
                return Err(self.unexpected(expected));
            }
            nodes.push(self.parse_statement()?);
        }

        Ok(nodes)
    }

    /// `{expr}`; an empty `{}` interpolates `null`.
    fn parse_interpolation(&mut self) -> Result<Node, ParseError> {
        if self.check(TokenKind::ExprEnd) {
            self.advance();
            return Ok(Node::Expression { value: Expr::Null });
        }

        let value = self.parse_expression()?;
        self.expect(TokenKind::ExprEnd)?;
        Ok(Node::Expression { value })
    }

    // =========================================================================
    // If / else
    // =========================================================================

    /// Parse `if cond}` and its body, plus any `{else…}` chain.
    ///
    /// An else-if chain is a nested `If` in `alternate`. Only the outermost
    /// call (`in_chain == false`) consumes the closing `{/if}`.
    fn parse_if(&mut self, in_chain: bool) -> Result<If, ParseError> {
        self.expect(TokenKind::IfStart)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::ExprEnd)?;

        let consequent = self.parse_until(&[TokenKind::ElseStart, TokenKind::IfEnd], "`{/if}`")?;

        let alternate = if self.at_block(&[TokenKind::ElseStart]) {
            self.advance(); // consume `{`
            Some(Box::new(self.nested(Self::parse_else)?))
        } else {
            None
        };

        if !in_chain {
            self.expect(TokenKind::ExprStart)?;
            self.expect(TokenKind::IfEnd)?;
            self.expect(TokenKind::ExprEnd)?;
        }

        Ok(If {
            condition,
            consequent,
            alternate,
        })
    }

    /// Parse `else if …` or `else}` and its body.
    fn parse_else(&mut self) -> Result<Alternate, ParseError> {
        self.expect(TokenKind::ElseStart)?;

        if self.check(TokenKind::IfStart) {
            return self.parse_if(true).map(Alternate::ElseIf);
        }

        self.expect(TokenKind::ExprEnd)?;
        let body = self.parse_until(&[TokenKind::IfEnd], "`{/if}`")?;
        Ok(Alternate::Else(Program { body }))
    }

    // =========================================================================
    // Switch / case / default
    // =========================================================================

    /// Parse `switch test}` followed by case/default blocks and `{/switch}`.
    /// Anything between the blocks is skipped.
    fn parse_switch(&mut self) -> Result<Switch, ParseError> {
        self.expect(TokenKind::SwitchStart)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::ExprEnd)?;

        let mut cases = Vec::new();

        loop {
            if self.check(TokenKind::Eof) {
                return Err(self.unexpected("`{/switch}`"));
            }

            if !self.check(TokenKind::ExprStart) {
                let skipped = self.advance();
                debug!(
                    target: "nano::parser",
                    "skipping {} \"{}\" between switch cases", skipped.kind, skipped.text
                );
                continue;
            }

            match self.peek().kind {
                TokenKind::CaseStart => {
                    self.advance();
                    cases.push(SwitchCase::Case(self.parse_case()?));
                }
                TokenKind::DefaultStart => {
                    self.advance();
                    cases.push(SwitchCase::Default(self.parse_default()?));
                }
                TokenKind::SwitchEnd => {
                    self.advance();
                    self.expect(TokenKind::SwitchEnd)?;
                    self.expect(TokenKind::ExprEnd)?;
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }

        Ok(Switch { test, cases })
    }

    /// `case a, b}` and its body.
    fn parse_case(&mut self) -> Result<Case, ParseError> {
        self.expect(TokenKind::CaseStart)?;
        let values = self.parse_argument_list(TokenKind::ExprEnd, false)?;
        self.expect(TokenKind::ExprEnd)?;

        let body = self.parse_until(CASE_TERMINATORS, "`{/switch}`")?;
        Ok(Case { values, body })
    }

    /// `default}` and its body.
    fn parse_default(&mut self) -> Result<DefaultCase, ParseError> {
        self.expect(TokenKind::DefaultStart)?;
        self.expect(TokenKind::ExprEnd)?;

        let body = self.parse_until(CASE_TERMINATORS, "`{/switch}`")?;
        Ok(DefaultCase { body })
    }

    // =========================================================================
    // For / import
    // =========================================================================

    /// `for item, index in items}`, the body, and `{/for}`.
    fn parse_for(&mut self) -> Result<For, ParseError> {
        self.expect(TokenKind::ForStart)?;
        let iterator = self.expect(TokenKind::Identifier)?.text;

        let index = if self.check(TokenKind::Comma) {
            self.advance();
            Some(self.expect(TokenKind::Identifier)?.text)
        } else {
            None
        };

        self.expect(TokenKind::ForIn)?;
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::ExprEnd)?;

        let body = self.parse_until(&[TokenKind::ForEnd], "`{/for}`")?;

        self.expect(TokenKind::ExprStart)?;
        self.expect(TokenKind::ForEnd)?;
        self.expect(TokenKind::ExprEnd)?;

        Ok(For {
            iterator,
            index,
            iterable,
            body,
        })
    }

    /// `import "path"}`
    fn parse_import(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::ImportStart)?;
        let path = self.expect(TokenKind::String)?.text;
        self.expect(TokenKind::ExprEnd)?;
        Ok(Node::Import { path })
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    pub(crate) fn current(&self) -> &Token {
        self.token_at(self.pos)
    }

    pub(crate) fn peek(&self) -> &Token {
        self.token_at(self.pos + 1)
    }

    fn token_at(&self, index: usize) -> &Token {
        // `new` guarantees a trailing `Eof`.
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().is(kind)
    }

    /// Consume a token of `kind`, or fail on the current token.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    /// Run `parse` one nesting level deeper, failing past `MAX_DEPTH`.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            let token = self.current();
            let err = ParseError::InvalidSyntax {
                message: format!("nesting deeper than {MAX_DEPTH} levels"),
                line: token.span.line,
                column: token.span.column,
            };
            debug!(target: "nano::parser", "{err}");
            return Err(err);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Whether the current token is `{` and the next one is in `keywords`.
    fn at_block(&self, keywords: &[TokenKind]) -> bool {
        self.check(TokenKind::ExprStart) && keywords.contains(&self.peek().kind)
    }

    /// Error for the current token: `UnexpectedEndOfFile` at `Eof`,
    /// `UnexpectedToken` otherwise.
    pub(crate) fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        let err = if token.is(TokenKind::Eof) {
            ParseError::UnexpectedEndOfFile {
                expected,
                line: token.span.line,
                column: token.span.column,
            }
        } else {
            ParseError::UnexpectedToken {
                found: token.text.clone(),
                expected,
                line: token.span.line,
                column: token.span.column,
            }
        };
        debug!(target: "nano::parser", "{err}");
        err
    }
}

/// Line and column just past `token` in the source.
///
/// Only string literals carry less than their lexeme in `text`: the
/// opening quote and, when terminated, the closing one.
fn end_of(token: &Token) -> (usize, usize) {
    let quotes = (token.span.end - token.span.start).saturating_sub(token.text.len());

    match token.text.rfind('\n') {
        Some(newline) => {
            let line = token.span.line + token.text.matches('\n').count();
            let tail = token.text[newline + 1..].chars().count();
            (line, 1 + tail + quotes.saturating_sub(1))
        }
        None => (
            token.span.line,
            token.span.column + token.text.chars().count() + quotes,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        crate::compile(source).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        crate::compile(source).unwrap_err()
    }

    fn first_if(program: &Program) -> &If {
        match &program.body[0] {
            Node::If(block) => block,
            other => panic!("Expected If, got {other:?}"),
        }
    }

    fn first_switch(program: &Program) -> &Switch {
        match &program.body[0] {
            Node::Switch(block) => block,
            other => panic!("Expected Switch, got {other:?}"),
        }
    }

    fn first_for(program: &Program) -> &For {
        match &program.body[0] {
            Node::For(block) => block,
            other => panic!("Expected For, got {other:?}"),
        }
    }

    // =========================================================================
    // Empty / text / comments
    // =========================================================================

    #[test]
    fn test_empty_program() {
        assert!(parse("").body.is_empty());
        assert!(parse("  \n\t").body.is_empty());
    }

    #[test]
    fn test_empty_token_list() {
        let program = Parser::new(Vec::new()).parse_program().unwrap();
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_text_and_comment() {
        assert_eq!(
            parse("// c\n<p>hi</p>").body,
            vec![
                Node::Comment { value: "// c".into() },
                Node::text("<p>hi</p>"),
            ]
        );
    }

    #[test]
    fn test_script_and_style_markers_are_text() {
        assert_eq!(
            parse("<script>x()</script><style>p {}</style>").body,
            vec![
                Node::text("<script>"),
                Node::text("x()"),
                Node::text("</script>"),
                Node::text("<style>"),
                Node::text("p {}"),
                Node::text("</style>"),
            ]
        );
    }

    #[test]
    fn test_css_interpolation() {
        assert_eq!(
            parse("<style>\np { color: @{c}; }\n</style>").body,
            vec![
                Node::text("<style>"),
                Node::text("p { color: "),
                Node::Expression { value: Expr::ident("c") },
                Node::text("; }"),
                Node::text("</style>"),
            ]
        );
    }

    #[test]
    fn test_unknown_token() {
        let tokens = vec![Token::new(TokenKind::Plus, Span::new(0, 1, 1, 1), "+")];
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownToken {
                kind: TokenKind::Plus,
                text: "+".into(),
                line: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn test_sentinel_eof_after_last_token() {
        let tokens = vec![Token::new(TokenKind::ExprStart, Span::new(0, 1, 1, 1), "{")];
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEndOfFile {
                expected: "expression",
                line: 1,
                column: 2,
            }
        );
    }

    /// Drop the scanner's `Eof` and compare the sentinel against it.
    fn sentinel_matches_scanner(source: &str) {
        let mut tokens = nano_lexer::tokenize(source);
        let scanned = tokens.pop().unwrap();
        assert_eq!(scanned.kind, TokenKind::Eof);

        let parser = Parser::new(tokens);
        let sentinel = parser.tokens.last().unwrap();
        assert_eq!(sentinel.kind, TokenKind::Eof);
        assert_eq!(
            (sentinel.span.line, sentinel.span.column),
            (scanned.span.line, scanned.span.column),
            "sentinel position for {source:?}"
        );
    }

    #[test]
    fn test_sentinel_after_string_counts_quotes() {
        sentinel_matches_scanner("{import 'ab'");
        sentinel_matches_scanner("{import \"héllo\"");
        sentinel_matches_scanner("{import 'ab");
    }

    #[test]
    fn test_sentinel_after_multiline_string() {
        sentinel_matches_scanner("{import 'a\nbc'");
    }

    #[test]
    fn test_sentinel_after_text_and_markers() {
        sentinel_matches_scanner("<p>héllo");
        sentinel_matches_scanner("{a >= b");
        sentinel_matches_scanner("<style>");
    }

    // =========================================================================
    // Interpolation
    // =========================================================================

    #[test]
    fn test_interpolation_in_markup() {
        assert_eq!(
            parse("<div>{2 + 3 * 4}</div>").body,
            vec![
                Node::text("<div>"),
                Node::Expression {
                    value: Expr::binary(
                        Expr::int(2),
                        BinaryOp::Add,
                        Expr::binary(Expr::int(3), BinaryOp::Mul, Expr::int(4)),
                    ),
                },
                Node::text("</div>"),
            ]
        );
    }

    #[test]
    fn test_empty_interpolation_is_null() {
        assert_eq!(parse("{}").body, vec![Node::Expression { value: Expr::Null }]);
    }

    #[test]
    fn test_unterminated_interpolation() {
        assert!(matches!(
            parse_err("{x"),
            ParseError::UnexpectedEndOfFile { expected: "expr_end", .. }
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            parse_err("{'abc}"),
            ParseError::UnexpectedEndOfFile { .. }
        ));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            parse_err("{#}"),
            ParseError::UnexpectedToken {
                found: "#".into(),
                expected: "expression",
                line: 1,
                column: 2,
            }
        );
    }

    #[test]
    fn test_two_expressions_in_one_block() {
        assert_eq!(
            parse_err("{a b}"),
            ParseError::UnexpectedToken {
                found: "b".into(),
                expected: "expr_end",
                line: 1,
                column: 4,
            }
        );
    }

    // =========================================================================
    // If / else
    // =========================================================================

    #[test]
    fn test_if_without_else() {
        let program = parse("{if ok}yes{/if}");
        assert_eq!(
            program.body,
            vec![Node::If(If {
                condition: Expr::ident("ok"),
                consequent: vec![Node::text("yes")],
                alternate: None,
            })]
        );
    }

    #[test]
    fn test_if_else_if_else_chain() {
        let program = parse("{if c1}A{else if c2}B{else}C{/if}");
        assert_eq!(program.body.len(), 1);
        assert_eq!(
            program.body[0],
            Node::If(If {
                condition: Expr::ident("c1"),
                consequent: vec![Node::text("A")],
                alternate: Some(Box::new(Alternate::ElseIf(If {
                    condition: Expr::ident("c2"),
                    consequent: vec![Node::text("B")],
                    alternate: Some(Box::new(Alternate::Else(Program {
                        body: vec![Node::text("C")],
                    }))),
                }))),
            })
        );
    }

    #[test]
    fn test_else_if_without_else() {
        let program = parse("{if a}X{else if b}Y{/if}<p>");
        let block = first_if(&program);
        match block.alternate.as_deref() {
            Some(Alternate::ElseIf(inner)) => {
                assert_eq!(inner.condition, Expr::ident("b"));
                assert!(inner.alternate.is_none());
            }
            other => panic!("Expected else-if, got {other:?}"),
        }
        assert_eq!(program.body[1], Node::text("<p>"));
    }

    #[test]
    fn test_nested_if_closes_itself() {
        let program = parse("{if a}\n  {if b}x{/if}\n  y\n{/if}");
        let outer = first_if(&program);
        assert_eq!(outer.consequent.len(), 2);
        match &outer.consequent[0] {
            Node::If(inner) => assert_eq!(inner.condition, Expr::ident("b")),
            other => panic!("Expected If, got {other:?}"),
        }
        assert_eq!(outer.consequent[1], Node::text("y"));
    }

    #[test]
    fn test_nesting_within_limit() {
        let depth = MAX_DEPTH / 2;
        let source = format!("{}x{}", "{if a}".repeat(depth), "{/if}".repeat(depth));
        assert_eq!(parse(&source).body.len(), 1);
    }

    #[test]
    fn test_deeply_nested_blocks_fail() {
        let source = format!("{}x{}", "{if a}".repeat(10_000), "{/if}".repeat(10_000));
        assert!(matches!(
            parse_err(&source),
            ParseError::InvalidSyntax { line: 1, .. }
        ));

        let source = format!("{}x{}", "{for i in xs}".repeat(10_000), "{/for}".repeat(10_000));
        assert!(matches!(
            parse_err(&source),
            ParseError::InvalidSyntax { .. }
        ));
    }

    #[test]
    fn test_long_else_if_chain_fails() {
        let source = format!("{{if a}}{}x{{/if}}", "{else if a}".repeat(10_000));
        assert!(matches!(
            parse_err(&source),
            ParseError::InvalidSyntax { .. }
        ));
    }

    #[test]
    fn test_if_condition_expression() {
        let program = parse("{if count > 0 && !done}x{/if}");
        assert_eq!(
            first_if(&program).condition,
            Expr::binary(
                Expr::binary(Expr::ident("count"), BinaryOp::Gt, Expr::int(0)),
                BinaryOp::And,
                Expr::unary(UnaryOp::Not, Expr::ident("done")),
            )
        );
    }

    #[test]
    fn test_unterminated_if() {
        assert!(matches!(
            parse_err("{if x}"),
            ParseError::UnexpectedEndOfFile { expected: "`{/if}`", .. }
        ));
        assert!(matches!(
            parse_err("{if x}a{else}b"),
            ParseError::UnexpectedEndOfFile { .. }
        ));
    }

    #[test]
    fn test_if_missing_brace() {
        assert_eq!(
            parse_err("{if a b}{/if}"),
            ParseError::UnexpectedToken {
                found: "b".into(),
                expected: "expr_end",
                line: 1,
                column: 7,
            }
        );
    }

    #[test]
    fn test_stray_close_is_error() {
        assert!(matches!(
            parse_err("{/if}"),
            ParseError::UnexpectedToken { ref found, .. } if found == "/if"
        ));
    }

    #[test]
    fn test_stray_else_then_close_is_error() {
        assert!(matches!(
            parse_err("{else}x{/if}"),
            ParseError::UnexpectedToken { ref found, .. } if found == "/if"
        ));
    }

    // =========================================================================
    // Switch / case / default
    // =========================================================================

    #[test]
    fn test_switch_case_default() {
        let program = parse("{switch v}{case 1,2}X{default}Y{/switch}");
        assert_eq!(
            program.body,
            vec![Node::Switch(Switch {
                test: Expr::ident("v"),
                cases: vec![
                    SwitchCase::Case(Case {
                        values: ArgumentList {
                            args: vec![Expr::int(1), Expr::int(2)],
                        },
                        body: vec![Node::text("X")],
                    }),
                    SwitchCase::Default(DefaultCase {
                        body: vec![Node::text("Y")],
                    }),
                ],
            })]
        );
    }

    #[test]
    fn test_switch_skips_text_between_cases() {
        let program = parse("{switch v} junk {case 1}X{/switch}");
        let block = first_switch(&program);
        assert_eq!(block.cases.len(), 1);
    }

    #[test]
    fn test_switch_multiline() {
        let program = parse(
            "{switch kind}\n  {case 'a'}\n    <b>A</b>\n\n  \
             {case 'b', 'c'}\n    <i>B</i>\n{/switch}",
        );
        let block = first_switch(&program);
        assert_eq!(block.test, Expr::ident("kind"));
        assert_eq!(block.cases.len(), 2);
        match &block.cases[1] {
            SwitchCase::Case(case) => {
                assert_eq!(case.values.args, vec![Expr::string("b"), Expr::string("c")]);
                assert_eq!(case.body, vec![Node::text("<i>B</i>")]);
            }
            other => panic!("Expected case, got {other:?}"),
        }
    }

    #[test]
    fn test_case_after_default() {
        let program = parse("{switch v}{default}Y{case 1}X{/switch}");
        let block = first_switch(&program);
        assert!(matches!(block.cases[0], SwitchCase::Default(_)));
        assert!(matches!(block.cases[1], SwitchCase::Case(_)));
    }

    #[test]
    fn test_empty_switch() {
        let program = parse("{switch v}{/switch}");
        assert!(first_switch(&program).cases.is_empty());
    }

    #[test]
    fn test_case_requires_value() {
        assert_eq!(
            parse_err("{switch v}{case}x{/switch}"),
            ParseError::UnexpectedToken {
                found: "}".into(),
                expected: "expression",
                line: 1,
                column: 16,
            }
        );
    }

    #[test]
    fn test_unterminated_switch() {
        assert!(matches!(
            parse_err("{switch v}{case 1}x"),
            ParseError::UnexpectedEndOfFile { expected: "`{/switch}`", .. }
        ));
        assert!(matches!(
            parse_err("{switch v}"),
            ParseError::UnexpectedEndOfFile { .. }
        ));
    }

    // =========================================================================
    // For
    // =========================================================================

    #[test]
    fn test_for_with_index() {
        let program = parse("{for item, i in items}<li>{item}</li>{/for}");
        assert_eq!(
            program.body,
            vec![Node::For(For {
                iterator: "item".into(),
                index: Some("i".into()),
                iterable: Expr::ident("items"),
                body: vec![
                    Node::text("<li>"),
                    Node::Expression { value: Expr::ident("item") },
                    Node::text("</li>"),
                ],
            })]
        );
    }

    #[test]
    fn test_for_without_index() {
        let program = parse("{for n in user.numbers}{n}{/for}");
        let block = first_for(&program);
        assert_eq!(block.iterator, "n");
        assert_eq!(block.index, None);
        assert_eq!(block.iterable, Expr::member(Expr::ident("user"), "numbers"));
    }

    #[test]
    fn test_for_in_script() {
        let program =
            parse("<script>\nconst a = [\n  @{for n in nn}\n    @{n},\n  @{/for}\n];\n</script>");
        assert_eq!(program.body.len(), 5);
        match &program.body[2] {
            Node::For(block) => {
                assert_eq!(
                    block.body,
                    vec![Node::Expression { value: Expr::ident("n") }, Node::text(",")]
                );
            }
            other => panic!("Expected For, got {other:?}"),
        }
    }

    #[test]
    fn test_for_iterator_must_be_identifier() {
        assert_eq!(
            parse_err("{for 1 in xs}{/for}"),
            ParseError::UnexpectedToken {
                found: "1".into(),
                expected: "identifier",
                line: 1,
                column: 6,
            }
        );
    }

    #[test]
    fn test_for_missing_in() {
        assert!(matches!(
            parse_err("{for x of xs}{/for}"),
            ParseError::UnexpectedToken { expected: "for_in", .. }
        ));
    }

    #[test]
    fn test_unterminated_for() {
        assert!(matches!(
            parse_err("{for x in xs}\n<li>"),
            ParseError::UnexpectedEndOfFile { expected: "`{/for}`", line: 2, column: 5 }
        ));
    }

    // =========================================================================
    // Import
    // =========================================================================

    #[test]
    fn test_import() {
        assert_eq!(
            parse("{import \"partials/nav.html\"}").body,
            vec![Node::Import {
                path: "partials/nav.html".into(),
            }]
        );
    }

    #[test]
    fn test_import_requires_string() {
        assert_eq!(
            parse_err("{import nav}"),
            ParseError::UnexpectedToken {
                found: "nav".into(),
                expected: "string",
                line: 1,
                column: 9,
            }
        );
    }
}
