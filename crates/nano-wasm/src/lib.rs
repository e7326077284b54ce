//! WASM bindings for the nano template compiler.
//!
//! Exposes `tokenize()`, `compile()` and `version()` to JavaScript via
//! wasm-bindgen. Tokens and trees cross the boundary as plain JS objects;
//! parse errors are thrown as `SyntaxError`s carrying `line` and `column`.

use nano_parser::ParseError;
use wasm_bindgen::prelude::*;

/// Position and message of a failed compile, as reported to JavaScript.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    /// Extra properties set on the thrown JS error.
    pub fn properties(&self) -> [(&'static str, f64); 2] {
        [("line", self.line as f64), ("column", self.column as f64)]
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Tokenize nano source.
///
/// Returns an array of `{ kind, span: { start, end, line, column }, text }`
/// objects, ending with an `eof` token.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsValue> {
    let tokens = nano_lexer::tokenize(source);
    serde_wasm_bindgen::to_value(&tokens).map_err(Into::into)
}

/// Compile nano source to its syntax tree.
///
/// Returns the `Program` as a JS object. Throws a `SyntaxError` with
/// `line` and `column` properties if parsing fails.
#[wasm_bindgen]
pub fn compile(source: &str) -> Result<JsValue, JsValue> {
    match nano_parser::compile(source) {
        Ok(program) => serde_wasm_bindgen::to_value(&program).map_err(Into::into),
        Err(err) => Err(syntax_error(&Diagnostic::from(&err))?),
    }
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Build a `SyntaxError` carrying the diagnostic's position properties.
/// A failure to set a property is thrown in its place.
fn syntax_error(diagnostic: &Diagnostic) -> Result<JsValue, JsValue> {
    let error = js_sys::SyntaxError::new(&diagnostic.message);

    for (key, value) in diagnostic.properties() {
        js_sys::Reflect::set(&error, &key.into(), &value.into())?;
    }

    Ok(error.into())
}
