//! Built-in functions. They are known to the parser from the start and are
//! dispatched before user functions, so a user declaration cannot shadow them.

use crate::error::RuntimeError;
use crate::runtime::value::Value;

pub const BUILTIN_NAMES: &[&str] = &["print", "length"];

/// `print` accepts between zero and this many arguments.
pub const PRINT_MAX_ARGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Length,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "print"  => Some(Builtin::Print),
            "length" => Some(Builtin::Length),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print  => "print",
            Builtin::Length => "length",
        }
    }
}

// ─── print ───────────────────────────────────────────────────────────────────

/// Render one output line: the values separated by single spaces.
pub fn print(args: &[Value], line: usize) -> Result<String, RuntimeError> {
    if args.len() > PRINT_MAX_ARGS {
        return Err(RuntimeError::ArgumentCount {
            name: Builtin::Print.name().into(),
            expected: format!("at most {PRINT_MAX_ARGS}"),
            found: args.len(),
            line,
        });
    }
    Ok(args.iter().map(Value::to_string).collect::<Vec<_>>().join(" "))
}

// ─── length ──────────────────────────────────────────────────────────────────

/// Element count of the vector bound to `name`.
pub fn length(name: &str, bound: &Value, line: usize) -> Result<Value, RuntimeError> {
    match bound {
        Value::Vector(items) => Ok(Value::Int(items.borrow().len() as i64)),
        other => Err(RuntimeError::NotAVector {
            name: name.to_string(),
            found: other.kind_name(),
            line,
        }),
    }
}

pub(crate) fn check_argc(name: &str, found: usize, expected: usize, line: usize) -> Result<(), RuntimeError> {
    if found != expected {
        Err(RuntimeError::ArgumentCount { name: name.to_string(), expected: expected.to_string(), found, line })
    } else {
        Ok(())
    }
}
