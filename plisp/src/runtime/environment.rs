// Environment for variable bindings and scope management

use crate::ast::Symbol;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A single scope: its own bindings plus the enclosing scope, if any.
#[derive(Default)]
pub struct Environment {
    parent: Option<Env>,
    bindings: IndexMap<Symbol, Value>,
}

/// Shared handle to a scope.
///
/// Child scopes and closures hold their parent through this handle, so a scope lives as
/// long as anything that can still resolve names through it.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Environment>>);

impl Env {
    /// Creates a new, empty root environment.
    pub fn new() -> Self {
        Env::default()
    }

    /// Creates a new child environment whose lookups fall back to `self`.
    pub fn child(&self) -> Self {
        Env(Rc::new(RefCell::new(Environment {
            parent: Some(self.clone()),
            bindings: IndexMap::new(),
        })))
    }

    /// Looks up a symbol by searching the current environment and then its parents.
    pub fn lookup(&self, name: &Symbol) -> RuntimeResult<Value> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.0.borrow();
            if let Some(value) = scope.bindings.get(name) {
                return Ok(value.clone());
            }
            current = scope.parent.clone();
        }
        Err(RuntimeError::UnboundSymbol(name.0.clone()))
    }

    /// Defines a new variable or updates an existing one in the current scope only.
    pub fn define(&self, name: Symbol, value: Value) {
        self.0.borrow_mut().bindings.insert(name, value);
    }

    /// Overwrites the nearest binding of `name`, walking outward from this scope.
    /// When no scope binds it, the binding is created here.
    pub fn assign(&self, name: Symbol, value: Value) {
        let owner = self.owner_of(&name).unwrap_or_else(|| self.clone());
        owner.define(name, value);
    }

    fn owner_of(&self, name: &Symbol) -> Option<Env> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let next = {
                let scope = env.0.borrow();
                if scope.bindings.contains_key(name) {
                    None
                } else {
                    Some(scope.parent.clone())
                }
            };
            match next {
                None => return Some(env),
                Some(parent) => current = parent,
            }
        }
        None
    }

    pub fn is_bound_locally(&self, name: &Symbol) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    pub fn parent(&self) -> Option<Env> {
        self.0.borrow().parent.clone()
    }

    pub fn has_parent(&self) -> bool {
        self.0.borrow().parent.is_some()
    }

    pub fn binding_count(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    /// Every name visible from this scope, sorted and deduplicated.
    pub fn symbol_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.0.borrow();
            names.extend(scope.bindings.keys().map(|s| s.0.clone()));
            current = scope.parent.clone();
        }
        names.sort();
        names.dedup();
        names
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Env")
            .field("bindings", &scope.bindings.len())
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Symbol {
        Symbol::from(name)
    }

    #[test]
    fn lookup_walks_parents() {
        let root = Env::new();
        root.define(s("x"), Value::Integer(1));
        let child = root.child().child();
        assert_eq!(child.lookup(&s("x")), Ok(Value::Integer(1)));
    }

    #[test]
    fn lookup_prefers_nearest_binding() {
        let root = Env::new();
        root.define(s("x"), Value::Integer(1));
        let child = root.child();
        child.define(s("x"), Value::Integer(2));
        assert_eq!(child.lookup(&s("x")), Ok(Value::Integer(2)));
        assert_eq!(root.lookup(&s("x")), Ok(Value::Integer(1)));
    }

    #[test]
    fn lookup_fails_when_chain_exhausted() {
        let env = Env::new().child();
        assert_eq!(
            env.lookup(&s("missing")),
            Err(RuntimeError::UnboundSymbol("missing".to_string()))
        );
    }

    #[test]
    fn assign_overwrites_owning_scope() {
        let root = Env::new();
        root.define(s("x"), Value::Integer(1));
        let middle = root.child();
        middle.define(s("x"), Value::Integer(2));
        let inner = middle.child();

        inner.assign(s("x"), Value::Integer(3));

        assert!(!inner.is_bound_locally(&s("x")));
        assert_eq!(middle.lookup(&s("x")), Ok(Value::Integer(3)));
        assert_eq!(root.lookup(&s("x")), Ok(Value::Integer(1)));
    }

    #[test]
    fn assign_defines_in_originating_scope_when_unbound() {
        let root = Env::new();
        let inner = root.child();
        inner.assign(s("fresh"), Value::Boolean(true));
        assert!(inner.is_bound_locally(&s("fresh")));
        assert!(root.lookup(&s("fresh")).is_err());
    }

    #[test]
    fn symbol_names_are_sorted_and_unique() {
        let root = Env::new();
        root.define(s("b"), Value::Nil);
        root.define(s("a"), Value::Nil);
        let child = root.child();
        child.define(s("a"), Value::Nil);
        child.define(s("c"), Value::Nil);
        assert_eq!(child.symbol_names(), vec!["a", "b", "c"]);
        assert_eq!(child.binding_count(), 2);
        assert!(child.has_parent());
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&root)));
    }
}
