use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::syntax::names::{NameScoping, NameTable, ScopeKind};
use crate::syntax::scanner::Scanner;
use crate::syntax::token::{Keyword, Token, TokenKind};

pub const DEFAULT_MAX_PARSE_DEPTH: usize = 200;

/// Recursive-descent parser pulling tokens from a `Scanner`.
///
/// Identifiers are disambiguated through the parser's `NameTable`: a name
/// must be a declared function (or built-in) or a declared variable before it
/// can be used.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    names: NameTable,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(scanner: Scanner<'a>, scoping: NameScoping) -> Self {
        Self { scanner, names: NameTable::new(scoping), depth: 0, max_depth: DEFAULT_MAX_PARSE_DEPTH }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn scanner(&self) -> &Scanner<'a> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut Scanner<'a> {
        &mut self.scanner
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Rewind the scanner and forget every declaration seen so far.
    pub fn reset(&mut self) {
        self.scanner.reset();
        self.names = NameTable::new(self.names.scoping());
        self.depth = 0;
    }

    /// Parse items until end of input.
    pub fn parse_all(&mut self) -> Result<Vec<Item>, Error> {
        let mut items = Vec::new();
        while self.peek()?.kind != TokenKind::Eof {
            items.push(self.parse()?);
        }
        Ok(items)
    }

    /// Parse exactly one top-level item: a function declaration or a statement.
    pub fn parse(&mut self) -> Result<Item, Error> {
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Function) => Ok(Item::Function(self.parse_function()?)),
            TokenKind::Eof => Err(self.unexpected(&tok, "function declaration or statement")),
            _ => Ok(Item::Stmt(self.parse_stmt()?)),
        }
    }

    // ─── Function declaration ────────────────────────────────────────────────

    fn parse_function(&mut self) -> Result<FunctionDecl, Error> {
        let span = self.span()?;
        self.expect(TokenKind::Keyword(Keyword::Function))?;
        let name = self.expect(TokenKind::Ident)?.text;
        // known from here on so the body can call itself
        self.names.declare_function(&name);

        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let return_ty = self.parse_type()?;

        self.names.push_scope(ScopeKind::Function);
        for p in &params {
            self.names.declare_param(&p.name);
        }
        let body = self.parse_block();
        self.names.pop_scope();

        Ok(FunctionDecl { name, params, return_ty, body: body?, span })
    }

    fn parse_param_list(&mut self) -> Result<Vec<Param>, Error> {
        let mut params: Vec<Param> = Vec::new();
        while !self.check(TokenKind::RParen)? {
            let span = self.span()?;
            let ty = self.parse_type()?;
            let tok = self.expect(TokenKind::Ident)?;
            if params.iter().any(|p| p.name == tok.text) {
                return Err(Error::new(ErrorCode::P005, tok.line, tok.column,
                    format!("duplicate parameter `{}`", tok.text)));
            }
            params.push(Param { name: tok.text, ty, span });
            if !self.matches(TokenKind::Comma)? { break; }
        }
        Ok(params)
    }

    fn parse_type(&mut self) -> Result<Type, Error> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::TypeName(ty) => Ok(ty),
            _ => Err(self.unexpected(&tok, "type name")),
        }
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Vec<Stmt>, Error> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace)? && !self.check(TokenKind::Eof)? {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        self.nested(|p| match p.peek()?.kind {
            TokenKind::Keyword(Keyword::If)    => Ok(Stmt::If(p.parse_if()?)),
            TokenKind::Keyword(Keyword::While) => Ok(Stmt::While(p.parse_while()?)),
            _ => {
                let expr = p.parse_expr()?;
                p.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        })
    }

    fn parse_if(&mut self) -> Result<IfStatement, Error> {
        let span = self.span()?;
        self.expect(TokenKind::Keyword(Keyword::If))?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(IfStatement { condition, body, span })
    }

    fn parse_while(&mut self) -> Result<WhileStatement, Error> {
        let span = self.span()?;
        self.expect(TokenKind::Keyword(Keyword::While))?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(WhileStatement { condition, body, span })
    }

    fn parse_condition(&mut self) -> Result<Expr, Error> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, Error> {
        self.nested(Self::parse_expr_inner)
    }

    fn parse_expr_inner(&mut self) -> Result<Expr, Error> {
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Var)    => self.parse_var_decl(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),

            TokenKind::Ident => {
                if self.names.is_function(&tok.text) {
                    let call = self.parse_call()?;
                    return self.continue_binary(call);
                }
                if self.names.is_variable(&tok.text) {
                    if self.scanner.peek(2)?.kind == TokenKind::Dot {
                        let call = self.parse_receiver_call()?;
                        return self.continue_binary(call);
                    }
                    let var = self.parse_variable()?;
                    if self.check(TokenKind::Eq)? {
                        return self.parse_assign(var);
                    }
                    return self.continue_binary(Expr::Variable(var));
                }
                Err(self.unresolved(&tok))
            }

            TokenKind::Number
            | TokenKind::Str
            | TokenKind::Keyword(Keyword::True)
            | TokenKind::Keyword(Keyword::False)
            | TokenKind::LBracket => {
                let literal = self.parse_literal()?;
                self.continue_binary(literal)
            }

            _ => Err(self.unexpected(&tok, "expression")),
        }
    }

    fn parse_var_decl(&mut self) -> Result<Expr, Error> {
        let span = self.span()?;
        self.expect(TokenKind::Keyword(Keyword::Var))?;
        let name = self.expect(TokenKind::Ident)?.text;
        let ty = if self.matches(TokenKind::Colon)? { Some(self.parse_type()?) } else { None };
        let initializer = if self.matches(TokenKind::Eq)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        // the initializer cannot see the name it initializes
        self.names.declare_variable(&name);
        Ok(Expr::VarDecl(VariableDecl { name, ty, initializer, span }))
    }

    fn parse_return(&mut self) -> Result<Expr, Error> {
        let span = self.span()?;
        self.expect(TokenKind::Keyword(Keyword::Return))?;
        let value = self.parse_expr()?;
        Ok(Expr::Return(ReturnExpr { value: Box::new(value), span }))
    }

    fn parse_assign(&mut self, target: Variable) -> Result<Expr, Error> {
        let span = target.span;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        Ok(Expr::Assign(Assignment { target, value: Box::new(value), span }))
    }

    // ─── Binary expressions ──────────────────────────────────────────────────
    //
    //   binary := term (('+' | '-' | '==' | '>' | '<') binary)?
    //   term   := factor (('*' | '/') factor)?
    //
    // The additive/comparison tier is one level and right-associative; a term
    // takes at most one multiplicative operator.

    fn parse_binary(&mut self) -> Result<Expr, Error> {
        self.nested(|p| {
            let factor = p.parse_factor()?;
            p.continue_binary(factor)
        })
    }

    /// Continue a binary expression whose first factor is already parsed.
    fn continue_binary(&mut self, first: Expr) -> Result<Expr, Error> {
        let left = self.finish_term(first)?;
        let op = match self.peek()?.kind {
            TokenKind::Plus  => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::EqEq  => BinOp::Eq,
            TokenKind::Gt    => BinOp::Gt,
            TokenKind::Lt    => BinOp::Lt,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_binary()?;
        Ok(binary(left, op, right))
    }

    fn finish_term(&mut self, left: Expr) -> Result<Expr, Error> {
        let op = match self.peek()?.kind {
            TokenKind::Star  => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_factor()?;
        Ok(binary(left, op, right))
    }

    fn parse_factor(&mut self) -> Result<Expr, Error> {
        let tok = self.peek()?;
        if tok.kind != TokenKind::Ident {
            return self.parse_literal();
        }
        if self.names.is_function(&tok.text) {
            return self.parse_call();
        }
        if self.names.is_variable(&tok.text) {
            if self.scanner.peek(2)?.kind == TokenKind::Dot {
                return self.parse_receiver_call();
            }
            return Ok(Expr::Variable(self.parse_variable()?));
        }
        Err(self.unresolved(&tok))
    }

    // ─── Primaries ───────────────────────────────────────────────────────────

    fn parse_literal(&mut self) -> Result<Expr, Error> {
        let tok = self.advance()?;
        let span = Span::new(tok.line, tok.column);
        match tok.kind {
            TokenKind::Number => Ok(Expr::Number(self.number(&tok)?, span)),
            TokenKind::Str    => Ok(Expr::Str(tok.text, span)),
            TokenKind::Keyword(Keyword::True)  => Ok(Expr::Bool(true, span)),
            TokenKind::Keyword(Keyword::False) => Ok(Expr::Bool(false, span)),
            TokenKind::LBracket => {
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Vector(span))
            }
            _ => Err(self.unexpected(&tok, "literal")),
        }
    }

    fn parse_variable(&mut self) -> Result<Variable, Error> {
        let tok = self.expect(TokenKind::Ident)?;
        let span = Span::new(tok.line, tok.column);
        let index = if self.matches(TokenKind::LBracket)? {
            let idx = self.advance()?;
            let index = match idx.kind {
                TokenKind::Number => Index::Literal(self.number(&idx)?),
                TokenKind::Ident if self.names.is_variable(&idx.text) => Index::Variable(idx.text),
                TokenKind::Ident => return Err(self.unresolved(&idx)),
                _ => return Err(self.unexpected(&idx, "number or variable index")),
            };
            self.expect(TokenKind::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(Variable { name: tok.text, index, span })
    }

    fn parse_call(&mut self) -> Result<Expr, Error> {
        let tok = self.expect(TokenKind::Ident)?;
        let span = Span::new(tok.line, tok.column);
        let args = self.parse_arg_list()?;
        Ok(Expr::Call(FunctionCall { callee: tok.text, args, receiver: None, span }))
    }

    /// `receiver.method(args)`
    fn parse_receiver_call(&mut self) -> Result<Expr, Error> {
        let receiver = self.expect(TokenKind::Ident)?;
        let span = Span::new(receiver.line, receiver.column);
        self.expect(TokenKind::Dot)?;
        let method = self.expect(TokenKind::Ident)?;
        if !self.names.is_function(&method.text) {
            return Err(self.unresolved(&method));
        }
        let args = self.parse_arg_list()?;
        Ok(Expr::Call(FunctionCall { callee: method.text, args, receiver: Some(receiver.text), span }))
    }

    fn parse_arg_list(&mut self) -> Result<Vec<Expr>, Error> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen)? {
            args.push(self.parse_expr()?);
            if !self.matches(TokenKind::Comma)? { break; }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&mut self) -> Result<Token, Error> {
        self.scanner.peek(1)
    }

    fn advance(&mut self) -> Result<Token, Error> {
        self.scanner.scan()
    }

    fn check(&mut self, kind: TokenKind) -> Result<bool, Error> {
        Ok(self.peek()?.kind == kind)
    }

    fn matches(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if self.check(kind)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        let tok = self.advance()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(self.unexpected(&tok, &kind.to_string()))
        }
    }

    fn span(&mut self) -> Result<Span, Error> {
        let tok = self.peek()?;
        Ok(Span::new(tok.line, tok.column))
    }

    fn number(&self, tok: &Token) -> Result<i64, Error> {
        tok.text.parse().map_err(|_| Error::new(ErrorCode::P003, tok.line, tok.column,
            format!("malformed number literal `{}`", tok.text)))
    }

    /// Run `f` one nesting level deeper, failing once the limit is crossed.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= self.max_depth {
            let tok = self.peek()?;
            return Err(Error::new(ErrorCode::P004, tok.line, tok.column,
                format!("nesting deeper than {} levels", self.max_depth)));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn unexpected(&self, tok: &Token, expected: &str) -> Error {
        Error::new(ErrorCode::P001, tok.line, tok.column,
            format!("expected {expected}, found {}", describe(tok)))
    }

    fn unresolved(&self, tok: &Token) -> Error {
        Error::new(ErrorCode::P002, tok.line, tok.column,
            format!("unresolved identifier `{}`", tok.text))
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span();
    Expr::Binary(BinaryOp { left: Box::new(left), op, right: Box::new(right), span })
}

fn describe(tok: &Token) -> String {
    match tok.kind {
        TokenKind::Ident | TokenKind::Number | TokenKind::Str => format!("{} `{}`", tok.kind, tok.text),
        _ => tok.kind.to_string(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(src: &str, scoping: NameScoping) -> Vec<Item> {
        Parser::new(Scanner::new(src), scoping).parse_all().expect("parse failed")
    }

    fn parse(src: &str) -> Vec<Item> {
        parse_with(src, NameScoping::Lexical)
    }

    fn parse_err(src: &str) -> Error {
        Parser::new(Scanner::new(src), NameScoping::Lexical)
            .parse_all()
            .expect_err("expected parse error")
    }

    /// The expression of the last top-level statement.
    fn last_expr(src: &str) -> Expr {
        match parse(src).pop() {
            Some(Item::Stmt(Stmt::Expr(e))) => e,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn bin(e: &Expr) -> (&Expr, BinOp, &Expr) {
        match e {
            Expr::Binary(b) => (&b.left, b.op, &b.right),
            other => panic!("expected binary, got {other:?}"),
        }
    }

    // ── declarations ─────────────────────────────────────────────────────────

    #[test]
    fn var_decl_with_init() {
        match last_expr("var x = 3;") {
            Expr::VarDecl(v) => {
                assert_eq!(v.name, "x");
                assert!(v.ty.is_none());
                assert!(matches!(v.initializer.as_deref(), Some(Expr::Number(3, _))));
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn var_decl_without_init() {
        match last_expr("var x;") {
            Expr::VarDecl(v) => assert!(v.initializer.is_none()),
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn var_decl_with_annotation() {
        match last_expr("var s: string = \"hi\";") {
            Expr::VarDecl(v) => assert_eq!(v.ty, Some(Type::String)),
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn function_declaration() {
        let items = parse("function add(int a, int b): int { return a + b; }");
        match &items[0] {
            Item::Function(f) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["a", "b"]);
                assert_eq!(f.params[0].ty, Type::Int);
                assert_eq!(f.return_ty, Type::Int);
                assert!(matches!(&f.body[0], Stmt::Expr(Expr::Return(_))));
            }
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn function_without_params() {
        let items = parse("function one(): int { return 1; }");
        assert!(matches!(&items[0], Item::Function(f) if f.params.is_empty()));
    }

    #[test]
    fn duplicate_parameter_is_error() {
        assert_eq!(parse_err("function f(int a, int a): int { return a; }").code, ErrorCode::P005);
    }

    #[test]
    fn recursive_call_parses() {
        let items = parse("function f(int n): int { return f(n); }");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn missing_return_type_is_error() {
        let e = parse_err("function f(int n) { return n; }");
        assert_eq!(e.code, ErrorCode::P001);
        assert!(e.message.contains("expected `:`"), "{}", e.message);
    }

    // ── statements ───────────────────────────────────────────────────────────

    #[test]
    fn if_and_while_need_no_semicolon() {
        let items = parse("var x = 0; if (x == 0) { x = 1; } while (x < 3) { x = x + 1; }");
        assert!(matches!(&items[1], Item::Stmt(Stmt::If(i)) if i.body.len() == 1));
        assert!(matches!(&items[2], Item::Stmt(Stmt::While(w)) if w.body.len() == 1));
    }

    #[test]
    fn missing_semicolon_is_error() {
        let e = parse_err("var x = 1");
        assert_eq!(e.code, ErrorCode::P001);
        assert!(e.message.contains("end of input"), "{}", e.message);
    }

    #[test]
    fn unclosed_block_is_error() {
        assert_eq!(parse_err("if (true) { print(1);").code, ErrorCode::P001);
    }

    // ── expressions ──────────────────────────────────────────────────────────

    #[test]
    fn multiplication_binds_tighter() {
        let e = last_expr("2 + 3 * 4;");
        let (l, op, r) = bin(&e);
        assert!(matches!(l, Expr::Number(2, _)));
        assert_eq!(op, BinOp::Add);
        let (rl, rop, rr) = bin(r);
        assert!(matches!(rl, Expr::Number(3, _)));
        assert_eq!(rop, BinOp::Mul);
        assert!(matches!(rr, Expr::Number(4, _)));
    }

    #[test]
    fn additive_tier_is_right_associative() {
        // 10 - 4 - 3 groups as 10 - (4 - 3)
        let e = last_expr("10 - 4 - 3;");
        let (l, op, r) = bin(&e);
        assert!(matches!(l, Expr::Number(10, _)));
        assert_eq!(op, BinOp::Sub);
        let (rl, _, rr) = bin(r);
        assert!(matches!(rl, Expr::Number(4, _)));
        assert!(matches!(rr, Expr::Number(3, _)));
    }

    #[test]
    fn comparison_shares_additive_level() {
        // 1 + 2 == 3 groups as 1 + (2 == 3)
        let e = last_expr("1 + 2 == 3;");
        let (_, op, r) = bin(&e);
        assert_eq!(op, BinOp::Add);
        assert_eq!(bin(r).1, BinOp::Eq);
    }

    #[test]
    fn term_takes_a_single_multiplicative_operator() {
        assert_eq!(parse_err("2 * 3 * 4;").code, ErrorCode::P001);
    }

    #[test]
    fn assignment_vs_variable_vs_binary() {
        let items = parse("var x = 1; x = 2; x; x + 1;");
        assert!(matches!(&items[1], Item::Stmt(Stmt::Expr(Expr::Assign(_)))));
        assert!(matches!(&items[2], Item::Stmt(Stmt::Expr(Expr::Variable(v))) if v.index.is_none()));
        assert!(matches!(&items[3], Item::Stmt(Stmt::Expr(Expr::Binary(_)))));
    }

    #[test]
    fn indexed_variable_forms() {
        let items = parse("var v = []; var i = 0; v[0] = 5; v[i];");
        match &items[2] {
            Item::Stmt(Stmt::Expr(Expr::Assign(a))) => assert_eq!(a.target.index, Some(Index::Literal(0))),
            other => panic!("expected Assign, got {other:?}"),
        }
        match &items[3] {
            Item::Stmt(Stmt::Expr(Expr::Variable(v))) => assert_eq!(v.index, Some(Index::Variable("i".into()))),
            other => panic!("expected Variable, got {other:?}"),
        }
    }

    #[test]
    fn receiver_call() {
        match last_expr("var v = []; v.length();") {
            Expr::Call(c) => {
                assert_eq!(c.callee, "length");
                assert_eq!(c.receiver.as_deref(), Some("v"));
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn call_as_operand() {
        let e = last_expr("function f(int n): int { return n; } f(1) + f(2);");
        let (l, op, r) = bin(&e);
        assert!(matches!(l, Expr::Call(_)));
        assert_eq!(op, BinOp::Add);
        assert!(matches!(r, Expr::Call(_)));
    }

    #[test]
    fn literals() {
        assert!(matches!(last_expr("\"s\";"), Expr::Str(s, _) if s == "s"));
        assert!(matches!(last_expr("true;"), Expr::Bool(true, _)));
        assert!(matches!(last_expr("[];"), Expr::Vector(_)));
    }

    #[test]
    fn number_too_large_is_malformed() {
        assert_eq!(parse_err("print(99999999999999999999);").code, ErrorCode::P003);
    }

    #[test]
    fn call_arguments() {
        match last_expr("print(1, \"a\", true);") {
            Expr::Call(c) => assert_eq!(c.args.len(), 3),
            other => panic!("expected Call, got {other:?}"),
        }
    }

    // ── name resolution ──────────────────────────────────────────────────────

    #[test]
    fn unknown_identifier_is_unresolved() {
        let e = parse_err("x = 1;");
        assert_eq!(e.code, ErrorCode::P002);
        assert!(e.message.contains("`x`"));
    }

    #[test]
    fn function_used_before_declaration_is_unresolved() {
        assert_eq!(parse_err("f(1); function f(int n): int { return n; }").code, ErrorCode::P002);
    }

    #[test]
    fn parameter_not_visible_after_body() {
        let e = parse_err("function f(int a): int { return a; } print(a);");
        assert_eq!(e.code, ErrorCode::P002);
    }

    #[test]
    fn body_variable_hidden_under_lexical_scoping() {
        let src = "function f(): int { var t = 1; return t; } print(t);";
        let e = Parser::new(Scanner::new(src), NameScoping::Lexical).parse_all().unwrap_err();
        assert_eq!(e.code, ErrorCode::P002);
    }

    #[test]
    fn body_variable_leaks_under_global_scoping() {
        let src = "function f(): int { var t = 1; return t; } print(t);";
        let items = parse_with(src, NameScoping::Global);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn initializer_cannot_see_its_own_name() {
        assert_eq!(parse_err("var x = x;").code, ErrorCode::P002);
    }

    // ── driver ───────────────────────────────────────────────────────────────

    #[test]
    fn parse_takes_one_item_at_a_time() {
        let mut p = Parser::new(Scanner::new("var x = 1; print(x);"), NameScoping::Lexical);
        assert!(matches!(p.parse().unwrap(), Item::Stmt(Stmt::Expr(Expr::VarDecl(_)))));
        assert!(matches!(p.parse().unwrap(), Item::Stmt(Stmt::Expr(Expr::Call(_)))));
        assert_eq!(p.parse().unwrap_err().code, ErrorCode::P001);
    }

    #[test]
    fn reset_replays_identical_ast() {
        let src = "var v = []; var i = 0; while (i < 3) { v[i] = i * 2; i = i + 1; } print(v.length());";
        let mut p = Parser::new(Scanner::new(src), NameScoping::Lexical);
        let first = p.parse_all().unwrap();
        p.reset();
        let second = p.parse_all().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_forgets_declarations() {
        let mut p = Parser::new(Scanner::new("var x = 1;"), NameScoping::Global);
        p.parse_all().unwrap();
        assert!(p.names().is_variable("x"));
        p.reset();
        assert!(!p.names().is_variable("x"));
    }

    #[test]
    fn nesting_limit() {
        let src = "var x = 1; print(x + x + x + x + x + x + x + x + x + x);";
        let e = Parser::new(Scanner::new(src), NameScoping::Lexical)
            .with_max_depth(6)
            .parse_all()
            .unwrap_err();
        assert_eq!(e.code, ErrorCode::P004);
    }

    #[test]
    fn lexer_error_surfaces_through_parser() {
        assert_eq!(parse_err("print(\"open);").code, ErrorCode::L002);
    }
}
