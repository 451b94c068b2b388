use thiserror::Error as ThisError;

/// Error codes prefixed by phase: L = lexer, P = parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character (skipped, warning only)
    L002, // unterminated string literal

    // Parser
    P001, // unexpected token
    P002, // unresolved identifier
    P003, // malformed literal
    P004, // nesting too deep
    P005, // duplicate parameter name
}

impl ErrorCode {
    /// `L001` is the only warning: the scanner skips the character and keeps going.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::L001)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
            Self::P004 => "P004",
            Self::P005 => "P005",
        }
    }
}

/// A lexer or parser diagnostic.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("[{}] {line}:{column}: {message}", .code.as_str())]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// Category of a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    Name,
    Operand,
    Type,
    RecursionLimit,
}

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum RuntimeError {
    #[error("[runtime] {line}: function `{name}` is not defined")]
    UndefinedFunction { name: String, line: usize },

    #[error("[runtime] {line}: variable `{name}` is not bound")]
    UnboundVariable { name: String, line: usize },

    #[error("[runtime] {line}: one of the operands of `{op}` is undefined")]
    UndefinedOperand { op: &'static str, line: usize },

    #[error("[runtime] {line}: division by zero")]
    DivisionByZero { line: usize },

    #[error("[runtime] {line}: integer overflow in `{op}`")]
    Overflow { op: &'static str, line: usize },

    #[error("[runtime] {line}: operator `{op}` not supported for `{left}` and `{right}`")]
    UnsupportedOperands { op: &'static str, left: &'static str, right: &'static str, line: usize },

    #[error("[runtime] {line}: `{name}` is `{found}`, expected vector")]
    NotAVector { name: String, found: &'static str, line: usize },

    #[error("[runtime] {line}: invalid index `{index}` for `{name}`")]
    InvalidIndex { name: String, index: String, line: usize },

    #[error("[runtime] {line}: `{name}` expects {expected} args, got {found}")]
    ArgumentCount { name: String, expected: String, found: usize, line: usize },

    #[error("[runtime] {line}: `length` must be called on a bound variable")]
    LengthTarget { line: usize },

    #[error("[runtime] {line}: call depth exceeded the limit of {limit}")]
    RecursionLimit { limit: usize, line: usize },

    #[error("[runtime] {line}: evaluation nested deeper than {limit} levels")]
    NestingLimit { limit: usize, line: usize },
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            Self::UndefinedFunction { .. } | Self::UnboundVariable { .. } => RuntimeErrorKind::Name,
            Self::UndefinedOperand { .. } | Self::DivisionByZero { .. } | Self::Overflow { .. } => {
                RuntimeErrorKind::Operand
            }
            Self::UnsupportedOperands { .. }
            | Self::NotAVector { .. }
            | Self::InvalidIndex { .. }
            | Self::ArgumentCount { .. }
            | Self::LengthTarget { .. } => RuntimeErrorKind::Type,
            Self::RecursionLimit { .. } | Self::NestingLimit { .. } => RuntimeErrorKind::RecursionLimit,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::UndefinedFunction { line, .. }
            | Self::UnboundVariable { line, .. }
            | Self::UndefinedOperand { line, .. }
            | Self::DivisionByZero { line }
            | Self::Overflow { line, .. }
            | Self::UnsupportedOperands { line, .. }
            | Self::NotAVector { line, .. }
            | Self::InvalidIndex { line, .. }
            | Self::ArgumentCount { line, .. }
            | Self::LengthTarget { line }
            | Self::RecursionLimit { line, .. }
            | Self::NestingLimit { line, .. } => *line,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// Any failure of a full scan → parse → interpret run.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum RunError {
    #[error(transparent)]
    Syntax(#[from] Error),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unknown_character_is_a_warning() {
        assert!(!ErrorCode::L001.is_error());
        assert!(ErrorCode::L002.is_error());
        assert!(ErrorCode::P002.is_error());
    }

    #[test]
    fn display_includes_code_and_position() {
        let e = Error::new(ErrorCode::P001, 3, 7, "expected `;`, found `}`");
        assert_eq!(e.to_string(), "[P001] 3:7: expected `;`, found `}`");
    }

    #[test]
    fn runtime_error_categories() {
        let e = RuntimeError::UndefinedFunction { name: "f".into(), line: 1 };
        assert_eq!(e.kind(), RuntimeErrorKind::Name);
        assert_eq!(e.line(), 1);
        let e = RuntimeError::DivisionByZero { line: 4 };
        assert_eq!(e.kind(), RuntimeErrorKind::Operand);
        let e = RuntimeError::LengthTarget { line: 2 };
        assert_eq!(e.kind(), RuntimeErrorKind::Type);
        let e = RuntimeError::RecursionLimit { limit: 8, line: 9 };
        assert_eq!(e.kind(), RuntimeErrorKind::RecursionLimit);
        assert_eq!(e.to_string(), "[runtime] 9: call depth exceeded the limit of 8");
        let e = RuntimeError::NestingLimit { limit: 64, line: 3 };
        assert_eq!(e.kind(), RuntimeErrorKind::RecursionLimit);
        assert_eq!(e.line(), 3);
        assert_eq!(e.to_string(), "[runtime] 3: evaluation nested deeper than 64 levels");
    }
}
