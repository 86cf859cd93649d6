//! Expression model.
//!
//! Programs are plain [`Value`]s: a symbol is a name to resolve, a non-empty list is a
//! compound form whose head sits in operator position, and everything else is an atom
//! that evaluates to itself. Sharing one representation lets `quote` hand back program
//! fragments as data and `eval` run data as a program.

use crate::runtime::values::Value;
use std::fmt;

/// An expression is any value; see [`Form`] for how the evaluator classifies it.
pub type Expression = Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.to_string())
    }
}

/// Borrowed view of an expression's shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Form<'a> {
    Atom(&'a Value),
    Symbol(&'a Symbol),
    /// Operator plus operands. May be empty, which is malformed when evaluated.
    Compound(&'a [Value]),
}

impl Value {
    pub fn form(&self) -> Form<'_> {
        match self {
            Value::Symbol(symbol) => Form::Symbol(symbol),
            Value::List(items) => Form::Compound(items),
            other => Form::Atom(other),
        }
    }
}

/// Symbol expression.
pub fn sym(name: &str) -> Expression {
    Value::Symbol(Symbol::from(name))
}

/// Text atom.
pub fn text(content: &str) -> Expression {
    Value::String(content.to_string())
}

/// Compound expression (or list literal, once quoted).
pub fn list(items: impl IntoIterator<Item = Expression>) -> Expression {
    Value::List(items.into_iter().collect())
}

/// `(quote expr)`
pub fn quote(expr: Expression) -> Expression {
    list([sym("quote"), expr])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_forms() {
        assert!(matches!(Value::Integer(5).form(), Form::Atom(_)));
        assert!(matches!(sym("x").form(), Form::Symbol(s) if s.as_str() == "x"));
        assert!(matches!(list([sym("+"), Value::Integer(1)]).form(), Form::Compound(items) if items.len() == 2));
        assert!(matches!(list([]).form(), Form::Compound(items) if items.is_empty()));
        assert!(matches!(text("hi").form(), Form::Atom(Value::String(_))));
    }

    #[test]
    fn quote_wraps_operand() {
        let quoted = quote(list([Value::Integer(1)]));
        assert_eq!(
            quoted,
            Value::List(vec![sym("quote"), Value::List(vec![Value::Integer(1)])])
        );
    }
}
