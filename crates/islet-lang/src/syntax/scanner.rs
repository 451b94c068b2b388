use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind, classify_word};

/// Pull-based tokenizer. Tokens are produced on demand; once the input is
/// exhausted every call to `scan` returns `Eof`.
///
/// Lookahead keeps no buffer: `peek(n)` scans ahead from the cursor and then
/// restores it, so peeking costs a re-scan.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<Error>,
}

#[derive(Clone, Copy)]
struct Cursor {
    pos: usize,
    line: usize,
    column: usize,
    diagnostics: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0, line: 1, column: 1, diagnostics: Vec::new() }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Consume and return the next token.
    pub fn scan(&mut self) -> Result<Token, Error> {
        loop {
            self.skip_whitespace();

            let line = self.line;
            let col = self.column;
            let start = self.pos;
            let Some(ch) = self.advance() else {
                return Ok(Token::new(TokenKind::Eof, "", line, col));
            };

            let kind = match ch {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                '.' => TokenKind::Dot,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '>' => TokenKind::Gt,
                '<' => TokenKind::Lt,
                '=' => {
                    if self.peek_char() == Some('=') { self.advance(); TokenKind::EqEq }
                    else { TokenKind::Eq }
                }

                '"' => {
                    let text = self.read_string(line, col)?;
                    return Ok(Token::new(TokenKind::Str, text, line, col));
                }
                c if c.is_ascii_digit() => {
                    self.skip_while(|c| c.is_ascii_digit());
                    TokenKind::Number
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    classify_word(&self.source[start..self.pos])
                }

                other => {
                    self.diagnostics.push(Error::new(ErrorCode::L001, line, col,
                        format!("unexpected character `{other}` skipped")));
                    continue;
                }
            };

            return Ok(Token::new(kind, &self.source[start..self.pos], line, col));
        }
    }

    /// Return the token `n` positions ahead (`peek(1)` is the next token)
    /// without moving the cursor.
    pub fn peek(&mut self, n: usize) -> Result<Token, Error> {
        let saved = self.save();
        let mut result = self.scan();
        for _ in 1..n.max(1) {
            if result.is_err() { break; }
            result = self.scan();
        }
        self.restore(saved);
        result
    }

    /// Rewind to the start of input.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.diagnostics.clear();
    }

    /// Scan everything up to and including `Eof`.
    pub fn scan_all(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.scan()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done { return Ok(tokens); }
        }
    }

    /// Warnings for characters skipped since the last `reset`.
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn save(&self) -> Cursor {
        Cursor { pos: self.pos, line: self.line, column: self.column, diagnostics: self.diagnostics.len() }
    }

    fn restore(&mut self, c: Cursor) {
        self.pos = c.pos;
        self.line = c.line;
        self.column = c.column;
        self.diagnostics.truncate(c.diagnostics);
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        Some(ch)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&pred) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.skip_while(char::is_whitespace);
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Reads up to the closing quote. No escapes; the literal may span lines.
    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<String, Error> {
        let start = self.pos;
        loop {
            match self.advance() {
                Some('"') => return Ok(self.source[start..self.pos - 1].to_string()),
                Some(_) => {}
                None => {
                    return Err(Error::new(ErrorCode::L002, start_line, start_col,
                        "unterminated string literal"));
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
