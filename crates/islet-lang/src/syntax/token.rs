use std::fmt;

use crate::syntax::ast::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Function,
    Var,
    Return,
    If,
    While,
    True,
    False,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Var      => "var",
            Self::Return   => "return",
            Self::If       => "if",
            Self::While    => "while",
            Self::True     => "true",
            Self::False    => "false",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Words and literals; the raw text lives on the token
    Keyword(Keyword),
    TypeName(Type),
    Ident,
    Number,
    Str,

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Eq,         // =
    EqEq,       // ==
    Gt,         // >
    Lt,         // <

    // Punctuation
    Colon,      // :
    Comma,      // ,
    Semicolon,  // ;
    Dot,        // .
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Keyword(k)  => return write!(f, "keyword `{}`", k.as_str()),
            Self::TypeName(t) => return write!(f, "type `{t}`"),
            Self::Ident     => "identifier",
            Self::Number    => "number",
            Self::Str       => "string",
            Self::Plus      => "`+`",
            Self::Minus     => "`-`",
            Self::Star      => "`*`",
            Self::Slash     => "`/`",
            Self::Eq        => "`=`",
            Self::EqEq      => "`==`",
            Self::Gt        => "`>`",
            Self::Lt        => "`<`",
            Self::Colon     => "`:`",
            Self::Comma     => "`,`",
            Self::Semicolon => "`;`",
            Self::Dot       => "`.`",
            Self::LParen    => "`(`",
            Self::RParen    => "`)`",
            Self::LBrace    => "`{`",
            Self::RBrace    => "`}`",
            Self::LBracket  => "`[`",
            Self::RBracket  => "`]`",
            Self::Eof       => "end of input",
        };
        f.write_str(s)
    }
}

/// Maps a word to its keyword or type-name token, or returns `Ident`.
pub fn classify_word(s: &str) -> TokenKind {
    match s {
        "function" => TokenKind::Keyword(Keyword::Function),
        "var"      => TokenKind::Keyword(Keyword::Var),
        "return"   => TokenKind::Keyword(Keyword::Return),
        "if"       => TokenKind::Keyword(Keyword::If),
        "while"    => TokenKind::Keyword(Keyword::While),
        "true"     => TokenKind::Keyword(Keyword::True),
        "false"    => TokenKind::Keyword(Keyword::False),
        "int"      => TokenKind::TypeName(Type::Int),
        "string"   => TokenKind::TypeName(Type::String),
        "bool"     => TokenKind::TypeName(Type::Bool),
        _          => TokenKind::Ident,
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, text: text.into(), line, column }
    }
}
