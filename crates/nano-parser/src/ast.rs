//! Abstract Syntax Tree for nano templates.
//!
//! Contains template-level nodes (text, comments, control blocks, imports,
//! interpolation sites) and expression-level nodes (operators, member access,
//! calls, literals). The tree is built bottom-up by the parser and owned
//! top-down; nothing is shared between nodes.

use nano_lexer::TokenKind;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Template-level AST
// ---------------------------------------------------------------------------

/// A complete template, and the body of a bare `{else}` branch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    pub body: Vec<Node>,
}

/// A statement-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A bare `{else}` block found outside of an `{if}` chain.
    Program(Program),

    /// Markup, CSS or JS text, including the `<script>`/`<style>` tags.
    Text { value: String },

    /// A `// comment` line, including the slashes.
    Comment { value: String },

    /// `{if c}…{else if d}…{else}…{/if}`
    If(If),

    /// `{switch v}{case 1, 2}…{default}…{/switch}`
    Switch(Switch),

    /// `{for item, index in items}…{/for}`
    For(For),

    /// `{import "path"}`; the path is not resolved here.
    Import { path: String },

    /// A `{expr}` interpolation site.
    Expression { value: Expr },
}

/// An `{if}` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If {
    pub condition: Expr,
    pub consequent: Vec<Node>,
    pub alternate: Option<Box<Alternate>>,
}

/// What follows an `{if}` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Alternate {
    /// `{else if …}`
    ElseIf(If),
    /// `{else}`
    Else(Program),
}

/// A `{switch}` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Switch {
    pub test: Expr,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchCase {
    Case(Case),
    Default(DefaultCase),
}

/// `{case a, b}`: matches when the test equals any of `values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub values: ArgumentList,
    pub body: Vec<Node>,
}

/// `{default}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultCase {
    pub body: Vec<Node>,
}

/// A `{for}` loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct For {
    pub iterator: String,
    pub index: Option<String>,
    pub iterable: Expr,
    pub body: Vec<Node>,
}

// ---------------------------------------------------------------------------
// Expression-level AST
// ---------------------------------------------------------------------------

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    /// Ternary: `count > 0 ? 'yes' : 'no'`
    Conditional {
        condition: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    /// Binary operation: `a + b`, `count > 0`
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation: `!active`, `-count`
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    /// Member access: `user.name` (`computed: false`), `items[0]` (`computed: true`)
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },

    /// Identifier: `count`, `isActive`
    Identifier { name: String },

    /// Function call: `format(date)`, `user.name.trim()`
    FunctionCall {
        callee: Box<Expr>,
        args: ArgumentList,
    },

    /// `null`, and `undefined` folded into it
    Null,

    Int { value: i64 },

    Float { value: f64 },

    String { value: String },

    Boolean { value: bool },
}

/// Arguments of a call, or the match values of a `{case}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ArgumentList {
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// The binary operator spelled by a token kind, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Multiplication => BinaryOp::Mul,
            TokenKind::Division => BinaryOp::Div,
            TokenKind::Equal => BinaryOp::Eq,
            TokenKind::NotEqual => BinaryOp::NotEq,
            TokenKind::LessThan => BinaryOp::Lt,
            TokenKind::GreaterThan => BinaryOp::Gt,
            TokenKind::LessEqual => BinaryOp::LtEq,
            TokenKind::GreaterEqual => BinaryOp::GtEq,
            TokenKind::LogicalAnd => BinaryOp::And,
            TokenKind::LogicalOr => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn token_kind(self) -> TokenKind {
        match self {
            BinaryOp::Add => TokenKind::Plus,
            BinaryOp::Sub => TokenKind::Minus,
            BinaryOp::Mul => TokenKind::Multiplication,
            BinaryOp::Div => TokenKind::Division,
            BinaryOp::Eq => TokenKind::Equal,
            BinaryOp::NotEq => TokenKind::NotEqual,
            BinaryOp::Lt => TokenKind::LessThan,
            BinaryOp::Gt => TokenKind::GreaterThan,
            BinaryOp::LtEq => TokenKind::LessEqual,
            BinaryOp::GtEq => TokenKind::GreaterEqual,
            BinaryOp::And => TokenKind::LogicalAnd,
            BinaryOp::Or => TokenKind::LogicalOr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Exclamation => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn token_kind(self) -> TokenKind {
        match self {
            UnaryOp::Neg => TokenKind::Minus,
            UnaryOp::Not => TokenKind::Exclamation,
        }
    }
}

// Shorthand constructors, mostly for building expected trees in tests.
impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    pub fn int(value: i64) -> Self {
        Expr::Int { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String {
            value: value.into(),
        }
    }

    pub fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn unary(operator: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    /// `object.property` with an identifier property.
    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Box::new(Expr::ident(property)),
            computed: false,
        }
    }

    /// `object[property]`
    pub fn index(object: Expr, property: Expr) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Box::new(property),
            computed: true,
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            callee: Box::new(callee),
            args: ArgumentList { args },
        }
    }

    pub fn conditional(condition: Expr, consequent: Expr, alternate: Expr) -> Self {
        Expr::Conditional {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }
}
