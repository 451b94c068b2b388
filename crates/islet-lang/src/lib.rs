pub mod syntax;
pub mod runtime;
pub mod error;

pub use error::{Error, ErrorCode, RunError, RuntimeError, RuntimeErrorKind};
pub use runtime::interpreter::Interpreter;
pub use runtime::value::Value;
pub use syntax::names::NameScoping;
pub use syntax::parser::Parser;
pub use syntax::scanner::Scanner;
pub use syntax::token::{Token, TokenKind};

use runtime::interpreter::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_EVAL_DEPTH};
use syntax::parser::DEFAULT_MAX_PARSE_DEPTH;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Recursion bounds for the parser and the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Nesting of statements and expressions the parser accepts.
    pub max_parse_depth: usize,
    /// Depth of user function calls before `RecursionLimit` is raised.
    pub max_call_depth: usize,
    /// Statements and expressions being evaluated at once, across all active
    /// calls, before `NestingLimit` is raised.
    pub max_eval_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_parse_depth: DEFAULT_MAX_PARSE_DEPTH,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

/// Name scoping and recursion bounds for one parse-and-run session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub scoping: NameScoping,
    pub limits: Limits,
}

// ─── Public API ───────────────────────────────────────────────────────────────

/// Scan, parse and run `source` with default options. Returns the printed lines.
pub fn run(source: &str) -> Result<Vec<String>, RunError> {
    run_with(source, Options::default())
}

pub fn run_with(source: &str, options: Options) -> Result<Vec<String>, RunError> {
    let mut interp = Interpreter::with_options(source, options);
    interp.interpret()?;
    Ok(interp.take_output())
}

/// Parse `source` without running it.
pub fn parse(source: &str, scoping: NameScoping) -> Result<Vec<syntax::ast::Item>, Error> {
    Parser::new(Scanner::new(source), scoping).parse_all()
}
