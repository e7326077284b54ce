mod logger;

use clap::{Parser, Subcommand};
use log::info;
use nano_lexer::Token;
use std::io;
use std::path::Path;

#[derive(Parser)]
#[command(name = "nano")]
#[command(about = "nano: HTML-embedded template compiler front end")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a template
    Tokens {
        /// Input template file
        path: String,
    },

    /// Print the syntax tree of a template
    Ast {
        /// Input template file
        path: String,
    },

    /// Check a template for syntax errors
    Check {
        /// Input template file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(logger::level_for(cli.verbose)) {
        eprintln!("Warning: logger already initialized: {e}");
    }

    let result = match &cli.command {
        Command::Tokens { path } => cmd_tokens(path),
        Command::Ast { path } => cmd_ast(path),
        Command::Check { path } => cmd_check(path),
    };

    if let Err(message) = result {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

/// Read a template, describing a missing file separately from other I/O errors.
fn read_source(path: &Path) -> Result<String, String> {
    let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => format!("file not found: {}", path.display()),
        _ => format!("cannot read {}: {e}", path.display()),
    })?;

    info!(target: "nano::cli", "read {} bytes from {}", source.len(), path.display());
    Ok(source)
}

fn compile_file(path: &str) -> Result<nano_parser::Program, String> {
    let source = read_source(Path::new(path))?;
    nano_parser::compile(&source).map_err(|e| format!("{path}: {e}"))
}

/// One token per line: position, kind, lexeme.
fn format_token(token: &Token) -> String {
    let position = format!("{}:{}", token.span.line, token.span.column);
    format!("{position:<8} {kind:<15} {text:?}", kind = token.kind.name(), text = token.text)
}

fn cmd_tokens(path: &str) -> Result<(), String> {
    let source = read_source(Path::new(path))?;

    for token in nano_lexer::tokenize(&source) {
        println!("{}", format_token(&token));
    }
    Ok(())
}

fn cmd_ast(path: &str) -> Result<(), String> {
    let program = compile_file(path)?;
    println!("{program:#?}");
    Ok(())
}

fn cmd_check(path: &str) -> Result<(), String> {
    let program = compile_file(path)?;
    info!(target: "nano::cli", "{} top-level nodes", program.body.len());
    eprintln!("OK: {path}");
    Ok(())
}
