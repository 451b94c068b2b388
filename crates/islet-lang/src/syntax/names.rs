use std::collections::HashSet;

use crate::runtime::builtins::BUILTIN_NAMES;

/// How long a `var` name stays known to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameScoping {
    /// One frame per function body; names declared inside a body are
    /// forgotten when the body ends.
    #[default]
    Lexical,
    /// Every declared name stays known for the rest of the parsing session.
    /// Parameters are still only known inside their own function body.
    Global,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScopeKind {
    Global,
    Function,
}

#[derive(Debug, Clone)]
pub struct Scope {
    kind: ScopeKind,
    names: HashSet<String>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Self { kind, names: HashSet::new() }
    }

    pub fn declare(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

// ─── NameTable ────────────────────────────────────────────────────────────────

/// Known-name registry consulted by the parser to tell calls from variable
/// uses. Owned by one parser, so separate runs never share declarations.
#[derive(Debug, Clone)]
pub struct NameTable {
    scoping: NameScoping,
    functions: HashSet<String>,
    scopes: Vec<Scope>,
}

impl NameTable {
    pub fn new(scoping: NameScoping) -> Self {
        Self {
            scoping,
            functions: BUILTIN_NAMES.iter().map(|s| s.to_string()).collect(),
            scopes: vec![Scope::new(ScopeKind::Global)],
        }
    }

    pub fn scoping(&self) -> NameScoping {
        self.scoping
    }

    pub fn declare_function(&mut self, name: &str) {
        self.functions.insert(name.to_string());
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    /// Declare a variable. Under `Lexical` it goes into the innermost scope,
    /// under `Global` always into the global one.
    pub fn declare_variable(&mut self, name: &str) {
        let scope = match self.scoping {
            NameScoping::Lexical => self.scopes.last_mut(),
            NameScoping::Global  => self.scopes.first_mut(),
        };
        if let Some(scope) = scope {
            scope.declare(name);
        }
    }

    /// Parameters are local under both policies.
    pub fn declare_param(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.declare(name);
        }
    }

    /// Innermost scope to outermost.
    pub fn is_variable(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|s| s.contains(name))
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    /// Drop the innermost function scope. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.last().is_some_and(|s| s.kind != ScopeKind::Global) {
            self.scopes.pop();
        }
    }
}

impl Default for NameTable {
    fn default() -> Self { Self::new(NameScoping::default()) }
}
