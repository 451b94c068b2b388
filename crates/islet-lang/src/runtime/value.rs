use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    /// Shared and mutable in place: every binding holding the same `Rc`
    /// observes writes through any of them.
    Vector(Rc<RefCell<Vec<Value>>>),
    Undefined,
}

impl Value {
    pub fn empty_vector() -> Self {
        Value::Vector(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_)    => "int",
            Value::Str(_)    => "string",
            Value::Bool(_)   => "bool",
            Value::Vector(_) => "vector",
            Value::Undefined => "undefined",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Only `Bool(true)` runs an `if` body or a `while` iteration.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }
}

/// Address of a vector's shared storage, used to spot cycles.
type VectorId = *const RefCell<Vec<Value>>;

/// Structural equality; values of different kinds are never equal. Two
/// vectors whose comparison is already in progress further up count as
/// equal, so cyclic vectors compare without looping.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equal(self, other, &mut Vec::new())
    }
}

fn equal(a: &Value, b: &Value, pending: &mut Vec<(VectorId, VectorId)>) -> bool {
    match (a, b) {
        (Value::Int(a), Value::Int(b))   => a == b,
        (Value::Str(a), Value::Str(b))   => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Vector(a), Value::Vector(b)) => {
            if Rc::ptr_eq(a, b) {
                return true;
            }
            let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
            if pending.contains(&pair) {
                return true;
            }
            let (xs, ys) = (a.borrow(), b.borrow());
            if xs.len() != ys.len() {
                return false;
            }
            pending.push(pair);
            let same = xs.iter().zip(ys.iter()).all(|(x, y)| equal(x, y, pending));
            pending.pop();
            same
        }
        (Value::Undefined, Value::Undefined) => true,
        _ => false,
    }
}

/// A vector already being printed further up renders as `[...]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, &mut Vec::new())
    }
}

fn render(value: &Value, f: &mut fmt::Formatter<'_>, path: &mut Vec<VectorId>) -> fmt::Result {
    match value {
        Value::Int(n)    => write!(f, "{n}"),
        Value::Str(s)    => f.write_str(s),
        Value::Bool(b)   => write!(f, "{b}"),
        Value::Undefined => f.write_str("undefined"),
        Value::Vector(items) => {
            let id = Rc::as_ptr(items);
            if path.contains(&id) {
                return f.write_str("[...]");
            }
            path.push(id);
            f.write_str("[")?;
            for (i, v) in items.borrow().iter().enumerate() {
                if i > 0 { f.write_str(", ")?; }
                render(v, f, path)?;
            }
            path.pop();
            f.write_str("]")
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n)    => write!(f, "Int({n})"),
            Value::Str(s)    => write!(f, "Str({s:?})"),
            Value::Bool(b)   => write!(f, "Bool({b})"),
            Value::Undefined => f.write_str("Undefined"),
            Value::Vector(_) => write!(f, "Vector({self})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Str("hi there".into()).to_string(), "hi there");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        let v = Value::empty_vector();
        if let Value::Vector(items) = &v {
            items.borrow_mut().extend([Value::Int(1), Value::Undefined, Value::Str("a".into())]);
        }
        assert_eq!(v.to_string(), "[1, undefined, a]");
    }

    #[test]
    fn self_containing_vector_displays() {
        let v = Value::empty_vector();
        if let Value::Vector(items) = &v {
            items.borrow_mut().push(v.clone());
        }
        assert_eq!(v.to_string(), "[[...]]");
        assert_eq!(format!("{v:?}"), "Vector([[...]])");
    }

    fn vector_of(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(RefCell::new(items)))
    }

    fn push(target: &Value, item: &Value) {
        if let Value::Vector(items) = target {
            items.borrow_mut().push(item.clone());
        }
    }

    #[test]
    fn mutually_containing_vectors_display() {
        let (a, b) = (Value::empty_vector(), Value::empty_vector());
        push(&a, &b);
        push(&b, &a);
        assert_eq!(a.to_string(), "[[[...]]]");
        assert_eq!(b.to_string(), "[[[...]]]");
    }

    #[test]
    fn shared_element_is_not_a_cycle() {
        let inner = vector_of(vec![Value::Int(1)]);
        let outer = vector_of(vec![inner.clone(), inner]);
        assert_eq!(outer.to_string(), "[[1], [1]]");
    }

    #[test]
    fn cyclic_vectors_compare() {
        let (a, b) = (Value::empty_vector(), Value::empty_vector());
        push(&a, &a);
        push(&b, &b);
        assert_eq!(a, b);

        let (c, d) = (Value::empty_vector(), Value::empty_vector());
        push(&c, &d);
        push(&d, &c);
        assert_eq!(c, d);
        assert_eq!(a, c);

        let e = Value::empty_vector();
        push(&e, &e);
        push(&e, &Value::Int(1));
        assert_ne!(a, e);
    }

    #[test]
    fn equality_is_kind_sensitive() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Str("1".into()));
        assert_ne!(Value::Bool(true), Value::Int(1));
        assert_eq!(Value::empty_vector(), Value::empty_vector());
    }

    #[test]
    fn only_true_is_true() {
        assert!(Value::Bool(true).is_true());
        assert!(!Value::Int(1).is_true());
        assert!(!Value::Str("true".into()).is_true());
        assert!(!Value::Undefined.is_true());
    }
}
