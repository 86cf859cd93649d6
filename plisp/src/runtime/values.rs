use crate::ast::{Expression, Symbol};
use crate::runtime::environment::Env;
use crate::runtime::error::RuntimeResult;
use crate::runtime::evaluator::Evaluator;
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

/// Runtime value. Also the expression representation, see [`crate::ast`].
#[derive(Clone)]
pub enum Value {
    /// The "nothing" result of `print`, an empty `begin`, a missing `if` branch.
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(Symbol),
    List(Vec<Value>),
    Function(Function),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "text",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    /// `false`, nil, zero, empty text and empty lists are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Symbol(_) | Value::Function(_) => true,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Symbol(s) => write!(f, "Symbol({})", s.0),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Function(func) => write!(f, "{func:?}"),
        }
    }
}

/// Display form used by `print`: text is written raw at the top level.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", Repr(other)),
        }
    }
}

/// Nested display form: text is quoted so list contents stay unambiguous.
struct Repr<'a>(&'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Nil => f.write_str("()"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => fmt_float(*x, f),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "[{}]", items.iter().map(Repr).join(", ")),
            Value::Function(func) => write!(f, "{func}"),
        }
    }
}

/// Positional notation with at least one fractional digit; never exponent form.
fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let digits = x.to_string();
    if x.is_finite() && !digits.contains('.') {
        write!(f, "{digits}.0")
    } else {
        f.write_str(&digits)
    }
}

/// Whether operands are evaluated before a callable runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalPolicy {
    Eager,
    /// Operand expressions are passed through unevaluated ("special forms").
    CallByName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// At least this many.
    Variadic(usize),
    /// Inclusive bounds.
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Fixed(n) => count == n,
            Arity::Variadic(min) => count >= min,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::Variadic(min) => write!(f, "at least {min}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
        }
    }
}

pub type BuiltinFn = dyn Fn(&Evaluator, &Env, Vec<Value>) -> RuntimeResult<Value>;

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: String,
    pub arity: Arity,
    pub policy: EvalPolicy,
    pub func: Rc<BuiltinFn>,
}

impl BuiltinFunction {
    pub fn new<F>(name: &str, arity: Arity, policy: EvalPolicy, func: F) -> Self
    where
        F: Fn(&Evaluator, &Env, Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        BuiltinFunction {
            name: name.to_string(),
            arity,
            policy,
            func: Rc::new(func),
        }
    }
}

/// A procedure built by `lambda`.
pub struct Closure {
    /// Scope the `lambda` form was evaluated in; free variables resolve here.
    pub env: Env,
    pub params: Vec<Symbol>,
    pub body: Expression,
}

#[derive(Clone)]
pub enum Function {
    Builtin(BuiltinFunction),
    Closure(Rc<Closure>),
}

impl Function {
    pub fn policy(&self) -> EvalPolicy {
        match self {
            Function::Builtin(builtin) => builtin.policy,
            Function::Closure(_) => EvalPolicy::Eager,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Builtin(builtin) => &builtin.name,
            Function::Closure(_) => "lambda",
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Builtin(a), Function::Builtin(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Function::Closure(a), Function::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Closures can sit inside the environment they capture, so neither Debug nor Display
// descends into `env`.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(builtin) => f
                .debug_struct("Builtin")
                .field("name", &builtin.name)
                .field("arity", &builtin.arity)
                .field("policy", &builtin.policy)
                .finish(),
            Function::Closure(closure) => f
                .debug_struct("Closure")
                .field("params", &closure.params)
                .field("body", &closure.body)
                .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(builtin) => write!(f, "#<builtin {}>", builtin.name),
            Function::Closure(closure) => {
                write!(f, "#<lambda ({})>", closure.params.iter().join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{list, sym, text};

    #[test]
    fn display_forms() {
        assert_eq!(Value::Nil.to_string(), "()");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(1.0e20).to_string(), "100000000000000000000.0");
        assert_eq!(Value::Float(0.00001).to_string(), "0.00001");
        assert_eq!(Value::Float(-2.5).to_string(), "-2.5");
        assert_eq!(list([Value::Float(1.0e20)]).to_string(), "[100000000000000000000.0]");
        assert_eq!(text("hello").to_string(), "hello");
        assert_eq!(
            list([Value::Integer(1), text("a"), sym("b"), list([])]).to_string(),
            r#"[1, "a", b, []]"#
        );
    }

    #[test]
    fn truthiness_follows_host_rules() {
        for falsy in [
            Value::Nil,
            Value::Boolean(false),
            Value::Integer(0),
            Value::Float(0.0),
            text(""),
            list([]),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [Value::Boolean(true), Value::Integer(-1), text("x"), sym("x")] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn arity_bounds() {
        assert!(Arity::Fixed(2).accepts(2));
        assert!(!Arity::Fixed(2).accepts(3));
        assert!(Arity::Variadic(0).accepts(0));
        assert!(Arity::Range(2, 3).accepts(3));
        assert!(!Arity::Range(2, 3).accepts(1));
        assert_eq!(Arity::Range(2, 3).to_string(), "2 to 3");
    }

    #[test]
    fn builtins_compare_by_identity() {
        let a = Function::Builtin(BuiltinFunction::new(
            "id",
            Arity::Fixed(1),
            EvalPolicy::Eager,
            |_, _, mut args| Ok(args.remove(0)),
        ));
        let b = Function::Builtin(BuiltinFunction::new(
            "id",
            Arity::Fixed(1),
            EvalPolicy::Eager,
            |_, _, mut args| Ok(args.remove(0)),
        ));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
