use serde::Serialize;
use std::fmt;

/// A position in source text, tracking line and column for error reporting.
///
/// `start`/`end` are byte offsets into the source; `line`/`column` are the
/// 1-based position of the first character of the lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Token classification for nano template source.
///
/// The lexeme itself lives in [`Token::text`]; kinds carry no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // End of input
    Eof,

    // Text carriers
    Comment,
    Text,
    TextCss,
    TextJs,

    // Markers
    ExprStart,
    ExprEnd,
    JsStart,
    JsEnd,
    CssStart,
    CssEnd,
    ForEnd,
    IfEnd,
    SwitchEnd,

    // Keywords
    ForStart,
    ForIn,
    IfStart,
    ElseStart,
    SwitchStart,
    CaseStart,
    DefaultStart,
    ImportStart,

    // Operators
    Plus,
    Minus,
    Multiplication,
    Division,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    Exclamation,
    QuestionMark,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Underscore,
    Comma,
    Period,
    Colon,

    // Literals
    Boolean,
    String,
    Integer,
    Float,
    Identifier,
    Null,
    Undefined,

    /// A character no expression rule accepts.
    Invalid,
}

impl TokenKind {
    /// Stable snake_case name, used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "eof",
            TokenKind::Comment => "comment",
            TokenKind::Text => "text",
            TokenKind::TextCss => "text_css",
            TokenKind::TextJs => "text_js",
            TokenKind::ExprStart => "expr_start",
            TokenKind::ExprEnd => "expr_end",
            TokenKind::JsStart => "js_start",
            TokenKind::JsEnd => "js_end",
            TokenKind::CssStart => "css_start",
            TokenKind::CssEnd => "css_end",
            TokenKind::ForEnd => "for_end",
            TokenKind::IfEnd => "if_end",
            TokenKind::SwitchEnd => "switch_end",
            TokenKind::ForStart => "for_start",
            TokenKind::ForIn => "for_in",
            TokenKind::IfStart => "if_start",
            TokenKind::ElseStart => "else_start",
            TokenKind::SwitchStart => "switch_start",
            TokenKind::CaseStart => "case_start",
            TokenKind::DefaultStart => "default_start",
            TokenKind::ImportStart => "import_start",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Multiplication => "multiplication",
            TokenKind::Division => "division",
            TokenKind::Equal => "equal",
            TokenKind::NotEqual => "not_equal",
            TokenKind::LessThan => "less_than",
            TokenKind::GreaterThan => "greater_than",
            TokenKind::LessEqual => "less_equal",
            TokenKind::GreaterEqual => "greater_equal",
            TokenKind::LogicalAnd => "logical_and",
            TokenKind::LogicalOr => "logical_or",
            TokenKind::Exclamation => "exclamation",
            TokenKind::QuestionMark => "question_mark",
            TokenKind::LParen => "l_paren",
            TokenKind::RParen => "r_paren",
            TokenKind::LBracket => "l_bracket",
            TokenKind::RBracket => "r_bracket",
            TokenKind::Underscore => "underscore",
            TokenKind::Comma => "comma",
            TokenKind::Period => "period",
            TokenKind::Colon => "colon",
            TokenKind::Boolean => "boolean",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Identifier => "identifier",
            TokenKind::Null => "null",
            TokenKind::Undefined => "undefined",
            TokenKind::Invalid => "invalid",
        }
    }

    /// Look up the keyword (or keyword-like literal) spelled by `word`.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "for" => TokenKind::ForStart,
            "in" => TokenKind::ForIn,
            "if" => TokenKind::IfStart,
            "else" => TokenKind::ElseStart,
            "switch" => TokenKind::SwitchStart,
            "case" => TokenKind::CaseStart,
            "default" => TokenKind::DefaultStart,
            "import" => TokenKind::ImportStart,
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that carry literal markup/CSS/JS text through to the AST.
    pub fn is_markup(self) -> bool {
        matches!(
            self,
            TokenKind::Text
                | TokenKind::TextCss
                | TokenKind::TextJs
                | TokenKind::JsStart
                | TokenKind::JsEnd
                | TokenKind::CssStart
                | TokenKind::CssEnd
        )
    }

    /// Kinds spelled as a word: identifiers, keywords and word literals.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::ForStart
                | TokenKind::ForIn
                | TokenKind::IfStart
                | TokenKind::ElseStart
                | TokenKind::SwitchStart
                | TokenKind::CaseStart
                | TokenKind::DefaultStart
                | TokenKind::ImportStart
                | TokenKind::Boolean
                | TokenKind::Null
                | TokenKind::Undefined
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token produced by the nano scanner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// The matched lexeme; for string literals, the content between the quotes.
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
