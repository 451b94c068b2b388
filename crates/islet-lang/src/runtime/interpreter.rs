//! Tree-walking interpreter. Parses the whole program once, then executes the
//! items in order against a global context. `print` output is collected as
//! lines and drained with `take_output`.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, RunError, RuntimeError};
use crate::runtime::builtins::{self, Builtin, check_argc};
use crate::runtime::value::Value;
use crate::syntax::ast::{BinOp, Expr, FunctionCall, FunctionDecl, Index, Item, Stmt, Variable};
use crate::syntax::parser::Parser;
use crate::syntax::scanner::Scanner;
use crate::{Limits, Options};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
/// Statements and expressions open at once, summed over every active call.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 1024;

/// Grow the stack when less than this much is left.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Variable bindings of one function call, or of the top level.
type Context = HashMap<String, Value>;

/// Result of executing a statement or evaluating an expression. `Return`
/// unwinds to the nearest enclosing call.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<T = Value> {
    Continue(T),
    Return(Value),
}

/// Unwrap a `Continue` value, or hand a `Return` straight back to the caller.
macro_rules! value {
    ($flow:expr) => {
        match $flow? {
            Flow::Continue(v) => v,
            Flow::Return(v) => return Ok(Flow::Return(v)),
        }
    };
}

// ─── Interpreter ──────────────────────────────────────────────────────────────

pub struct Interpreter<'a> {
    parser: Parser<'a>,
    functions: HashMap<String, Rc<FunctionDecl>>,
    globals: Context,
    output: Vec<String>,
    depth: usize,
    max_call_depth: usize,
    nesting: usize,
    max_eval_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(parser: Parser<'a>) -> Self {
        Self {
            parser,
            functions: HashMap::new(),
            globals: Context::new(),
            output: Vec::new(),
            depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            nesting: 0,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }

    /// Build the scanner, parser and interpreter for `source` in one go.
    pub fn with_options(source: &'a str, options: Options) -> Self {
        let parser = Parser::new(Scanner::new(source), options.scoping)
            .with_max_depth(options.limits.max_parse_depth);
        Self::new(parser).with_limits(options.limits)
    }

    /// Apply the call and evaluation bounds of `limits`. The parse bound
    /// belongs to the parser.
    pub fn with_limits(self, limits: Limits) -> Self {
        self.with_max_call_depth(limits.max_call_depth)
            .with_max_eval_depth(limits.max_eval_depth)
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_max_eval_depth(mut self, max_eval_depth: usize) -> Self {
        self.max_eval_depth = max_eval_depth;
        self
    }

    /// Parse the whole program, then run it. Nothing executes if parsing fails.
    pub fn interpret(&mut self) -> Result<(), RunError> {
        let items = self.parser.parse_all()?;
        self.execute(&items)?;
        Ok(())
    }

    /// Run already-parsed items against the global context. A top-level
    /// `return` only ends its own statement.
    pub fn execute(&mut self, items: &[Item]) -> Result<(), RuntimeError> {
        let mut globals = std::mem::take(&mut self.globals);
        let result = items.iter().try_for_each(|item| self.exec_item(item, &mut globals).map(drop));
        self.globals = globals;
        result
    }

    /// Drain the lines printed so far.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Non-fatal scanner warnings from the last parse.
    pub fn diagnostics(&self) -> &[Error] {
        self.parser.scanner().diagnostics()
    }

    // ─── Statements ───────────────────────────────────────────────────────────

    fn exec_item(&mut self, item: &Item, ctx: &mut Context) -> Result<Flow, RuntimeError> {
        match item {
            Item::Function(f) => {
                self.functions.insert(f.name.clone(), Rc::new(f.clone()));
                Ok(Flow::Continue(Value::Undefined))
            }
            Item::Stmt(s) => self.exec_stmt(s, ctx),
        }
    }

    fn exec_block(&mut self, body: &[Stmt], ctx: &mut Context) -> Result<Flow, RuntimeError> {
        let mut last = Value::Undefined;
        for stmt in body {
            last = value!(self.exec_stmt(stmt, ctx));
        }
        Ok(Flow::Continue(last))
    }

    fn exec_stmt(&mut self, stmt: &Stmt, ctx: &mut Context) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expr(e) => self.eval_expr(e, ctx),

            Stmt::If(s) => self.nested(s.span.line, |this| {
                if value!(this.eval_expr(&s.condition, ctx)).is_true() {
                    this.exec_block(&s.body, ctx)
                } else {
                    Ok(Flow::Continue(Value::Undefined))
                }
            }),

            Stmt::While(s) => self.nested(s.span.line, |this| {
                let mut last = Value::Undefined;
                while value!(this.eval_expr(&s.condition, ctx)).is_true() {
                    last = value!(this.exec_block(&s.body, ctx));
                }
                Ok(Flow::Continue(last))
            }),
        }
    }

    /// Run `f` one level deeper, failing with `NestingLimit` once the
    /// evaluation budget is spent. The stack grows on demand, so the budget
    /// holds on small thread stacks too.
    fn nested(&mut self, line: usize, f: impl FnOnce(&mut Self) -> Result<Flow, RuntimeError>) -> Result<Flow, RuntimeError> {
        if self.nesting >= self.max_eval_depth {
            return Err(RuntimeError::NestingLimit { limit: self.max_eval_depth, line });
        }
        self.nesting += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || f(self));
        self.nesting -= 1;
        result
    }

    // ─── Expressions ──────────────────────────────────────────────────────────

    fn eval_expr(&mut self, expr: &Expr, ctx: &mut Context) -> Result<Flow, RuntimeError> {
        self.nested(expr.span().line, |this| this.eval_expr_inner(expr, ctx))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, ctx: &mut Context) -> Result<Flow, RuntimeError> {
        let v = match expr {
            Expr::Number(n, _) => Value::Int(*n),
            Expr::Str(s, _)    => Value::Str(s.clone()),
            Expr::Bool(b, _)   => Value::Bool(*b),
            Expr::Vector(_)    => Value::empty_vector(),

            Expr::Variable(var) => read_variable(var, ctx)?,

            Expr::VarDecl(decl) => match &decl.initializer {
                Some(init) => {
                    let v = value!(self.eval_expr(init, ctx));
                    ctx.insert(decl.name.clone(), v.clone());
                    v
                }
                // declared but unbound: reading it is still an error
                None => Value::Undefined,
            },

            Expr::Assign(assign) => {
                let v = value!(self.eval_expr(&assign.value, ctx));
                write_variable(&assign.target, v.clone(), ctx)?;
                v
            }

            Expr::Binary(b) => {
                let l = value!(self.eval_expr(&b.left, ctx));
                let r = value!(self.eval_expr(&b.right, ctx));
                eval_binop(b.op, l, r, b.span.line)?
            }

            Expr::Call(call) => value!(self.eval_call(call, ctx)),

            Expr::Return(r) => {
                let v = value!(self.eval_expr(&r.value, ctx));
                return Ok(Flow::Return(v));
            }
        };
        Ok(Flow::Continue(v))
    }

    // ─── Calls ────────────────────────────────────────────────────────────────

    fn eval_call(&mut self, call: &FunctionCall, ctx: &mut Context) -> Result<Flow, RuntimeError> {
        let line = call.span.line;

        if let Some(builtin) = Builtin::lookup(&call.callee) {
            return self.eval_builtin(builtin, call, ctx);
        }

        let Some(func) = self.functions.get(&call.callee).cloned() else {
            return Err(RuntimeError::UndefinedFunction { name: call.callee.clone(), line });
        };

        let args = value!(self.eval_args(call, ctx));
        check_argc(&func.name, args.len(), func.params.len(), line)?;

        if self.depth >= self.max_call_depth {
            return Err(RuntimeError::RecursionLimit { limit: self.max_call_depth, line });
        }

        let mut local: Context = func.params.iter().map(|p| p.name.clone()).zip(args).collect();
        self.depth += 1;
        let result = self.exec_block(&func.body, &mut local);
        self.depth -= 1;

        match result? {
            Flow::Continue(v) | Flow::Return(v) => Ok(Flow::Continue(v)),
        }
    }

    fn eval_builtin(&mut self, builtin: Builtin, call: &FunctionCall, ctx: &mut Context) -> Result<Flow, RuntimeError> {
        let line = call.span.line;
        match builtin {
            Builtin::Print => {
                let args = value!(self.eval_args(call, ctx));
                let text = builtins::print(&args, line)?;
                self.output.push(text);
                Ok(Flow::Continue(Value::Undefined))
            }

            Builtin::Length => {
                let target = match (&call.receiver, call.args.as_slice()) {
                    (Some(name), []) => name,
                    (None, [Expr::Variable(Variable { name, index: None, .. })]) => name,
                    (None, [_]) => return Err(RuntimeError::LengthTarget { line }),
                    (Some(_), args) => return Err(argc_error(builtin, "0", args.len(), line)),
                    (None, args)    => return Err(argc_error(builtin, "1", args.len(), line)),
                };
                let bound = ctx.get(target).ok_or(RuntimeError::LengthTarget { line })?;
                Ok(Flow::Continue(builtins::length(target, bound, line)?))
            }
        }
    }

    /// Evaluate call arguments left to right in the caller's context. For
    /// `r.f(args)` the receiver's value comes first.
    fn eval_args(&mut self, call: &FunctionCall, ctx: &mut Context) -> Result<Flow<Vec<Value>>, RuntimeError> {
        let mut values = Vec::with_capacity(call.args.len() + 1);
        if let Some(receiver) = &call.receiver {
            let bound = ctx.get(receiver).cloned().ok_or_else(|| RuntimeError::UnboundVariable {
                name: receiver.clone(),
                line: call.span.line,
            })?;
            values.push(bound);
        }
        for arg in &call.args {
            values.push(value!(self.eval_expr(arg, ctx)));
        }
        Ok(Flow::Continue(values))
    }
}

// ─── Variables ────────────────────────────────────────────────────────────────

fn read_variable(var: &Variable, ctx: &Context) -> Result<Value, RuntimeError> {
    let line = var.span.line;
    let bound = ctx.get(&var.name).ok_or_else(|| RuntimeError::UnboundVariable {
        name: var.name.clone(),
        line,
    })?;
    let Some(index) = &var.index else { return Ok(bound.clone()) };
    let Value::Vector(items) = bound else {
        return Err(RuntimeError::NotAVector { name: var.name.clone(), found: bound.kind_name(), line });
    };
    let i = index_position(&var.name, index, ctx, line)?;
    Ok(items.borrow().get(i).cloned().unwrap_or(Value::Undefined))
}

/// Plain targets rebind. Indexed targets write into the shared vector,
/// padding with `Undefined` past the end, then rebind the name to it.
fn write_variable(target: &Variable, v: Value, ctx: &mut Context) -> Result<(), RuntimeError> {
    let line = target.span.line;
    let Some(index) = &target.index else {
        ctx.insert(target.name.clone(), v);
        return Ok(());
    };

    let i = index_position(&target.name, index, ctx, line)?;
    let items = match ctx.get(&target.name) {
        Some(Value::Vector(items)) => Rc::clone(items),
        Some(other) => {
            return Err(RuntimeError::NotAVector { name: target.name.clone(), found: other.kind_name(), line });
        }
        None => return Err(RuntimeError::UnboundVariable { name: target.name.clone(), line }),
    };
    {
        let mut items = items.borrow_mut();
        if i >= items.len() {
            items.resize(i + 1, Value::Undefined);
        }
        items[i] = v;
    }
    ctx.insert(target.name.clone(), Value::Vector(items));
    Ok(())
}

fn index_position(name: &str, index: &Index, ctx: &Context, line: usize) -> Result<usize, RuntimeError> {
    let n = match index {
        Index::Literal(n) => *n,
        Index::Variable(var) => match ctx.get(var) {
            Some(Value::Int(n)) => *n,
            Some(other) => {
                return Err(RuntimeError::InvalidIndex { name: name.to_string(), index: other.to_string(), line });
            }
            None => return Err(RuntimeError::UnboundVariable { name: var.clone(), line }),
        },
    };
    usize::try_from(n).map_err(|_| RuntimeError::InvalidIndex { name: name.to_string(), index: n.to_string(), line })
}

// ─── Operators ────────────────────────────────────────────────────────────────

fn eval_binop(op: BinOp, l: Value, r: Value, line: usize) -> Result<Value, RuntimeError> {
    if l.is_undefined() || r.is_undefined() {
        return Err(RuntimeError::UndefinedOperand { op: op.as_str(), line });
    }
    match (op, &l, &r) {
        (BinOp::Eq, _, _) => Ok(Value::Bool(l == r)),

        (BinOp::Add, Value::Int(a), Value::Int(b)) => checked(a.checked_add(*b), op, line),
        (BinOp::Add, Value::Str(_), _) | (BinOp::Add, _, Value::Str(_)) => Ok(Value::Str(format!("{l}{r}"))),
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => checked(a.checked_sub(*b), op, line),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => checked(a.checked_mul(*b), op, line),
        (BinOp::Div, Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivisionByZero { line }),
        (BinOp::Div, Value::Int(a), Value::Int(b)) => checked(a.checked_div(*b), op, line),

        (BinOp::Gt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Gt, Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Lt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Lt, Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a < b)),

        _ => Err(RuntimeError::UnsupportedOperands {
            op: op.as_str(),
            left: l.kind_name(),
            right: r.kind_name(),
            line,
        }),
    }
}

fn checked(result: Option<i64>, op: BinOp, line: usize) -> Result<Value, RuntimeError> {
    result.map(Value::Int).ok_or(RuntimeError::Overflow { op: op.as_str(), line })
}

fn argc_error(builtin: Builtin, expected: &str, found: usize, line: usize) -> RuntimeError {
    RuntimeError::ArgumentCount { name: builtin.name().into(), expected: expected.into(), found, line }
}
