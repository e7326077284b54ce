//! Expression parser for nano templates.
//!
//! Parses the inline expression sublanguage of `{ }` / `@{ }` blocks into
//! `Expr` nodes. Handles operator precedence, member access, function calls,
//! and every literal form the scanner produces.
//!
//! Precedence, lowest to highest:
//!
//! | Level | Operators              |
//! |-------|------------------------|
//! | 0     | `? :` (right-assoc)    |
//! | 1     | `\|\|`                 |
//! | 2     | `&&`                   |
//! | 3     | `==` `!=`              |
//! | 4     | `<` `>` `<=` `>=`      |
//! | 5     | `+` `-`                |
//! | 6     | `*` `/`                |
//! | 7     | unary `-` `!`          |
//! | 8     | member, index, call    |

use crate::ast::{ArgumentList, BinaryOp, Expr, UnaryOp};
use crate::parser::Parser;
use crate::ParseError;
use nano_lexer::TokenKind;

/// Binary operator levels, lowest binding first. All are left-associative.
const BINARY_LEVELS: &[&[BinaryOp]] = &[
    &[BinaryOp::Or],
    &[BinaryOp::And],
    &[BinaryOp::Eq, BinaryOp::NotEq],
    &[BinaryOp::Lt, BinaryOp::Gt, BinaryOp::LtEq, BinaryOp::GtEq],
    &[BinaryOp::Add, BinaryOp::Sub],
    &[BinaryOp::Mul, BinaryOp::Div],
];

impl Parser {
    /// Parse a complete expression, starting at the current token.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_binary(0)?;

        if !self.check(TokenKind::QuestionMark) {
            return Ok(condition);
        }

        self.advance(); // consume `?`
        let consequent = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_expression()?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_binary(&mut self, level: usize) -> Result<Expr, ParseError> {
        let Some(operators) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };

        let mut left = self.parse_binary(level + 1)?;

        while let Some(operator) =
            BinaryOp::from_token(self.current().kind).filter(|op| operators.contains(op))
        {
            self.advance();
            let right = self.parse_binary(level + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match UnaryOp::from_token(self.current().kind) {
            Some(operator) => {
                self.advance();
                let operand = self.nested(Self::parse_unary)?;
                Ok(Expr::Unary {
                    operator,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Integer => {
                self.advance();
                let value = token.text.parse::<i64>().map_err(|e| ParseError::InvalidSyntax {
                    message: format!("integer literal {}: {e}", token.text),
                    line: token.span.line,
                    column: token.span.column,
                })?;
                Ok(Expr::Int { value })
            }
            TokenKind::Float => {
                self.advance();
                let value = token.text.parse::<f64>().map_err(|e| ParseError::InvalidSyntax {
                    message: format!("float literal {}: {e}", token.text),
                    line: token.span.line,
                    column: token.span.column,
                })?;
                Ok(Expr::Float { value })
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::String { value: token.text })
            }
            TokenKind::Boolean => {
                self.advance();
                Ok(Expr::Boolean {
                    value: token.text == "true",
                })
            }
            TokenKind::Null | TokenKind::Undefined => {
                self.advance();
                Ok(Expr::Null)
            }
            TokenKind::Identifier
            | TokenKind::ForStart
            | TokenKind::ForIn
            | TokenKind::IfStart
            | TokenKind::ElseStart
            | TokenKind::SwitchStart
            | TokenKind::CaseStart
            | TokenKind::ImportStart => {
                self.advance();
                self.parse_chain(Expr::Identifier { name: token.text })
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Fold `.name`, `[expr]` and `(args)` postfixes onto `object`, left to right.
    fn parse_chain(&mut self, mut object: Expr) -> Result<Expr, ParseError> {
        loop {
            object = match self.current().kind {
                TokenKind::Period => {
                    self.advance();
                    let property = self.parse_property_name()?;
                    Expr::Member {
                        object: Box::new(object),
                        property: Box::new(property),
                        computed: false,
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let property = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    Expr::Member {
                        object: Box::new(object),
                        property: Box::new(property),
                        computed: true,
                    }
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_argument_list(TokenKind::RParen, true)?;
                    self.expect(TokenKind::RParen)?;
                    Expr::FunctionCall {
                        callee: Box::new(object),
                        args,
                    }
                }
                _ => return Ok(object),
            };
        }
    }

    fn parse_property_name(&mut self) -> Result<Expr, ParseError> {
        if !self.current().kind.is_word() {
            return Err(self.unexpected("property name"));
        }

        let token = self.advance();
        Ok(Expr::Identifier { name: token.text })
    }

    /// Comma-separated expressions up to (not including) `end`.
    ///
    /// With `allow_empty`, an immediate `end` yields an empty list; otherwise
    /// at least one expression is required.
    pub(crate) fn parse_argument_list(
        &mut self,
        end: TokenKind,
        allow_empty: bool,
    ) -> Result<ArgumentList, ParseError> {
        let mut args = Vec::new();

        if allow_empty && self.check(end) {
            return Ok(ArgumentList { args });
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(ArgumentList { args })
    }
}
