use crate::token::{Span, Token, TokenKind};
use log::{debug, trace};

/// Scanner mode determines which lexical rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain markup: `<script>`, `<style>` and `{` are markers.
    Text,
    /// Inside `<style>`: `</style>` and `@{` are markers.
    Css,
    /// Inside `<script>`: `</script>` and `@{` are markers.
    Js,
    /// A `//` line comment. Always resumes in `Text`.
    Comment,
    /// Inside `{ }` or `@{ }`: the expression sublanguage.
    Expression,
}

/// Start of the lexeme currently being scanned.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

/// Nano template scanner.
///
/// Pull-based: every call to [`Scanner::next_token`] returns exactly one token
/// and advances the cursor. The same characters are classified differently
/// depending on the current [`Mode`]:
/// - markup text is emitted one line at a time, leading whitespace dropped
/// - `<script>`/`<style>` switch into JS/CSS segments
/// - `{` (markup) or `@{` (CSS/JS) switch into expression mode until `}`
///
/// Expression blocks never nest, so one saved `previous` mode is enough to
/// know where a `}` returns to.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    mode: Mode,
    previous: Mode,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            mode: Mode::Text,
            previous: Mode::Text,
        }
    }

    /// Tokenize the entire source. The last token is always `Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Scanner::new(source).tokenize_all()
    }

    /// Pull tokens until `Eof`, inclusive.
    pub fn tokenize_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.is(TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        debug!(target: "nano::scanner", "scanned {} tokens", tokens.len());
        tokens
    }

    /// The mode the next call to `next_token` will scan in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Scan the next token. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let mark = self.mark();
        let Some(ch) = self.peek() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(mark.pos, mark.pos, mark.line, mark.column),
                "",
            );
        };

        match self.mode {
            Mode::Text | Mode::Css | Mode::Js => self.scan_markup(mark),
            Mode::Comment => self.scan_comment(mark),
            Mode::Expression => self.scan_expression(mark, ch),
        }
    }

    // --- Markup ---

    /// Scan a marker at lexeme start, or a run of text up to the next marker
    /// or line break.
    fn scan_markup(&mut self, mark: Mark) -> Token {
        if self.starts_with("//") {
            self.enter(Mode::Comment);
            return self.scan_comment(mark);
        }

        if let Some(token) = self.scan_marker(mark) {
            return token;
        }

        let kind = match self.mode {
            Mode::Css => TokenKind::TextCss,
            Mode::Js => TokenKind::TextJs,
            _ => TokenKind::Text,
        };

        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' || self.at_marker() {
                break;
            }
            self.advance();
        }

        self.finish(kind, mark)
    }

    fn scan_marker(&mut self, mark: Mark) -> Option<Token> {
        match self.mode {
            Mode::Text => {
                if self.starts_with("<script>") {
                    self.consume("<script>");
                    self.enter(Mode::Js);
                    return Some(self.finish(TokenKind::JsStart, mark));
                }
                if self.starts_with("<style>") {
                    self.consume("<style>");
                    self.enter(Mode::Css);
                    return Some(self.finish(TokenKind::CssStart, mark));
                }
                if self.starts_with("{") {
                    return Some(self.open_expression(mark, "{"));
                }
            }
            Mode::Css => {
                if self.starts_with("</style>") {
                    self.consume("</style>");
                    self.enter(Mode::Text);
                    return Some(self.finish(TokenKind::CssEnd, mark));
                }
                if self.starts_with("@{") {
                    return Some(self.open_expression(mark, "@{"));
                }
            }
            Mode::Js => {
                if self.starts_with("</script>") {
                    self.consume("</script>");
                    self.enter(Mode::Text);
                    return Some(self.finish(TokenKind::JsEnd, mark));
                }
                if self.starts_with("@{") {
                    return Some(self.open_expression(mark, "@{"));
                }
            }
            Mode::Comment | Mode::Expression => {}
        }

        None
    }

    /// Whether a marker starts at the cursor. A text run stops here so the
    /// marker is emitted as its own token on the next call.
    fn at_marker(&self) -> bool {
        if self.starts_with("//") {
            return true;
        }

        match self.mode {
            Mode::Text => {
                self.starts_with("<script>") || self.starts_with("<style>") || self.starts_with("{")
            }
            Mode::Css => self.starts_with("</style>") || self.starts_with("@{"),
            Mode::Js => self.starts_with("</script>") || self.starts_with("@{"),
            Mode::Comment | Mode::Expression => false,
        }
    }

    fn open_expression(&mut self, mark: Mark, opener: &str) -> Token {
        // One saved slot: expression mode is only entered from markup.
        debug_assert!(
            matches!(self.mode, Mode::Text | Mode::Css | Mode::Js),
            "expression blocks do not nest"
        );

        self.previous = self.mode;
        self.consume(opener);
        self.enter(Mode::Expression);
        self.finish(TokenKind::ExprStart, mark)
    }

    /// Scan a `//` comment to the end of the line.
    fn scan_comment(&mut self, mark: Mark) -> Token {
        while let Some(ch) = self.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.advance();
        }

        self.enter(Mode::Text);
        self.finish(TokenKind::Comment, mark)
    }

    // --- Expressions ---

    fn scan_expression(&mut self, mark: Mark, ch: char) -> Token {
        if ch == '\'' || ch == '"' {
            return self.scan_string(mark, ch);
        }

        let kind = match ch {
            '@' if self.starts_with("@{") && matches!(self.previous, Mode::Css | Mode::Js) => {
                self.consume("@{");
                TokenKind::ExprStart
            }
            '{' => self.single(TokenKind::ExprStart),
            '}' => {
                self.advance();
                self.enter(self.previous);
                TokenKind::ExprEnd
            }
            '/' => self.scan_slash(),

            '=' => self.either('=', TokenKind::Equal, TokenKind::Equal),
            '!' => self.either('=', TokenKind::NotEqual, TokenKind::Exclamation),
            '<' => self.either('=', TokenKind::LessEqual, TokenKind::LessThan),
            '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::GreaterThan),
            '&' => self.either('&', TokenKind::LogicalAnd, TokenKind::LogicalAnd),
            '|' => self.either('|', TokenKind::LogicalOr, TokenKind::LogicalOr),

            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Multiplication),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Period),
            ':' => self.single(TokenKind::Colon),
            '?' => self.single(TokenKind::QuestionMark),
            '_' if !self.char_at(1).is_some_and(is_word_char) => {
                self.single(TokenKind::Underscore)
            }

            '0'..='9' => self.scan_number(),
            c if is_word_start(c) => self.scan_word(mark),

            _ => self.single(TokenKind::Invalid),
        };

        self.finish(kind, mark)
    }

    /// `/for`, `/if` and `/switch` close blocks; any other `/` divides.
    fn scan_slash(&mut self) -> TokenKind {
        let closers = [
            ("/for", TokenKind::ForEnd),
            ("/if", TokenKind::IfEnd),
            ("/switch", TokenKind::SwitchEnd),
        ];

        for (closer, kind) in closers {
            if self.starts_with(closer) && !self.char_at(closer.len()).is_some_and(is_word_char) {
                self.consume(closer);
                return kind;
            }
        }

        self.single(TokenKind::Division)
    }

    /// Scan an integer, or a float when a single `.` is followed by a digit.
    fn scan_number(&mut self) -> TokenKind {
        self.skip_digits();

        let fraction =
            self.peek() == Some('.') && self.char_at(1).is_some_and(|c| c.is_ascii_digit());
        if !fraction {
            return TokenKind::Integer;
        }

        self.advance(); // consume `.`
        self.skip_digits();
        TokenKind::Float
    }

    /// Scan a string literal. A backslash keeps the next character verbatim.
    /// An unterminated string runs to the end of input.
    fn scan_string(&mut self, mark: Mark, quote: char) -> Token {
        self.advance(); // consume opening quote
        let content_start = self.pos;
        let mut content_end = None;

        while let Some(ch) = self.peek() {
            if ch == quote {
                content_end = Some(self.pos);
                self.advance();
                break;
            }

            self.advance();
            if ch == '\\' {
                self.advance();
            }
        }

        let content_end = match content_end {
            Some(end) => end,
            None => {
                debug!(
                    target: "nano::scanner",
                    "unterminated string starting at {}:{}", mark.line, mark.column
                );
                self.pos
            }
        };

        Token::new(
            TokenKind::String,
            Span::new(mark.pos, self.pos, mark.line, mark.column),
            &self.source[content_start..content_end],
        )
    }

    /// Scan a word: a keyword when the whole word spells one, else an identifier.
    fn scan_word(&mut self, mark: Mark) -> TokenKind {
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }

        TokenKind::keyword(&self.source[mark.pos..self.pos]).unwrap_or(TokenKind::Identifier)
    }

    // --- Helpers ---

    fn enter(&mut self, mode: Mode) {
        if self.mode != mode {
            trace!(
                target: "nano::scanner",
                "{:?} -> {:?} at {}:{}", self.mode, mode, self.line, self.column
            );
        }
        self.mode = mode;
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn finish(&self, kind: TokenKind, mark: Mark) -> Token {
        Token::new(
            kind,
            Span::new(mark.pos, self.pos, mark.line, mark.column),
            &self.source[mark.pos..self.pos],
        )
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Consume one character, plus `next` if it follows.
    fn either(&mut self, next: char, double: TokenKind, single: TokenKind) -> TokenKind {
        self.advance();
        if self.peek() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character `offset` bytes past the cursor. Callers only step over ASCII.
    fn char_at(&self, offset: usize) -> Option<char> {
        self.rest().get(offset..).and_then(|s| s.chars().next())
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn consume(&mut self, expected: &str) {
        for _ in expected.chars() {
            self.advance();
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
