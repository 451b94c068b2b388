use std::fmt;

/// Source location attached to every node for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// A top-level item is either a function declaration or a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(FunctionDecl),
    Stmt(Stmt),
}

// ─── Functions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_ty: Type,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `if (cond) { ... }`, no else branch
    If(IfStatement),
    /// `while (cond) { ... }`
    While(WhileStatement),
    /// `expr;`
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64, Span),
    Str(String, Span),
    Bool(bool, Span),
    /// `[]`
    Vector(Span),

    Variable(Variable),

    /// `var x`, `var x = expr`, `var x: int = expr`
    VarDecl(VariableDecl),

    /// `x = expr`, `v[i] = expr`
    Assign(Assignment),

    /// `a + b`, `a == b`, etc.
    Binary(BinaryOp),

    /// `name(args)` or `receiver.name()`
    Call(FunctionCall),

    /// `return expr`
    Return(ReturnExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, s) => *s,
            Expr::Str(_, s)    => *s,
            Expr::Bool(_, s)   => *s,
            Expr::Vector(s)    => *s,
            Expr::Variable(v)  => v.span,
            Expr::VarDecl(v)   => v.span,
            Expr::Assign(a)    => a.span,
            Expr::Binary(b)    => b.span,
            Expr::Call(c)      => c.span,
            Expr::Return(r)    => r.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub index: Option<Index>,
    pub span: Span,
}

/// The two accepted index forms: `v[3]` and `v[i]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    Literal(i64),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Option<Type>,
    pub initializer: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Variable,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Box<Expr>,
    pub op: BinOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub callee: String,
    pub args: Vec<Expr>,
    /// Set for receiver calls such as `v.length()`.
    pub receiver: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnExpr {
    pub value: Box<Expr>,
    pub span: Span,
}

// ─── Operators ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add, Sub, Mul, Div,
    Eq, Gt, Lt,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq  => "==",
            BinOp::Gt  => ">",
            BinOp::Lt  => "<",
        }
    }
}

// ─── Types ───────────────────────────────────────────────────────────────────

/// Declared type names. Recorded on parameters, return types and annotated
/// declarations; nothing checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    String,
    Bool,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Int    => "int",
            Type::String => "string",
            Type::Bool   => "bool",
        })
    }
}
