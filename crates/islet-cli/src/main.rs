use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use console::style;
use islet_lang::{Error, Interpreter, Limits, NameScoping, Options, Parser, RunError, Scanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scoping {
    Lexical,
    Global,
}

impl From<Scoping> for NameScoping {
    fn from(s: Scoping) -> Self {
        match s {
            Scoping::Lexical => NameScoping::Lexical,
            Scoping::Global  => NameScoping::Global,
        }
    }
}

/// islet runs `.is` scripts: a small language with functions, loops, vectors
/// and two built-ins, `print` and `length`.
#[derive(ClapParser, Debug)]
#[command(name = "islet", version, about, long_about = None)]
struct Args {
    /// Script to run.
    file: PathBuf,

    /// Dump the token stream before running.
    #[arg(long)]
    tokens: bool,

    /// Dump the parsed items before running.
    #[arg(long)]
    ast: bool,

    /// How long `var` names stay known to the parser.
    #[arg(long, value_enum, default_value_t = Scoping::Lexical)]
    scoping: Scoping,

    /// Deepest chain of user function calls before the run is aborted.
    #[arg(long, default_value_t = Limits::default().max_call_depth)]
    max_call_depth: usize,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

enum Message {
    Warn(String),
    Error(String),
}

struct RunResult {
    dumps: Vec<String>,
    output: Vec<String>,
    messages: Vec<Message>,
}

impl RunResult {
    fn failed(&self) -> bool {
        self.messages.iter().any(|m| matches!(m, Message::Error(_)))
    }
}

fn run(source: &str, args: &Args) -> RunResult {
    let options = Options {
        scoping: args.scoping.into(),
        limits: Limits { max_call_depth: args.max_call_depth, ..Limits::default() },
    };
    let mut result = RunResult { dumps: vec![], output: vec![], messages: vec![] };
    let mut parser = Parser::new(Scanner::new(source), options.scoping)
        .with_max_depth(options.limits.max_parse_depth);

    // ── Tokens ────────────────────────────────────────────────────────────────
    if args.tokens {
        match parser.scanner_mut().scan_all() {
            Ok(tokens) => result.dumps.extend(tokens.iter().map(|t| {
                format!("{:>4}:{:<3} {:<16} {}", t.line, t.column, t.kind.to_string(), t.text)
            })),
            Err(e) => {
                result.messages.push(Message::Error(format!("[lex] {e}")));
                return result;
            }
        }
        parser.scanner_mut().reset();
    }

    // ── AST ───────────────────────────────────────────────────────────────────
    if args.ast {
        match parser.parse_all() {
            Ok(items) => result.dumps.extend(items.iter().map(|i| format!("{i:#?}"))),
            Err(e) => {
                result.messages.push(Message::Error(format!("[parse] {e}")));
                return result;
            }
        }
        parser.reset();
    }

    // ── Run ───────────────────────────────────────────────────────────────────
    let mut interp = Interpreter::new(parser).with_limits(options.limits);
    let outcome = interp.interpret();
    result.output = interp.take_output();
    result.messages.extend(interp.diagnostics().iter().map(warning));

    match outcome {
        Ok(()) => {}
        Err(RunError::Syntax(e)) => result.messages.push(Message::Error(format!("[parse] {e}"))),
        Err(RunError::Runtime(e)) => result.messages.push(Message::Error(e.to_string())),
    }
    result
}

fn warning(e: &Error) -> Message {
    Message::Warn(format!("[warn] {e}"))
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} cannot read '{}': {e}", style("error:").red().bold(), args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let result = run(&source, &args);

    for dump in &result.dumps {
        println!("{}", style(dump).dim());
    }
    for line in &result.output {
        println!("{line}");
    }
    for msg in &result.messages {
        match msg {
            Message::Warn(m)  => eprintln!("{}", style(m).yellow()),
            Message::Error(m) => eprintln!("{}", style(m).red().bold()),
        }
    }

    if result.failed() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
