//! Variable scoping.
//!
//! Scopes form a parent chain; closures keep the scope they were created in
//! alive through a [`LocalScope`] handle. The [`Environment`] is the stack of
//! block scopes of the function currently executing.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `let`, `var`, parameters and function declarations.
    Mutable,
    /// `const` and imports.
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Error returned by [`Scope::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    Immutable,
    Undefined,
}

/// Shared, single-threaded handle to a scope.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// One block's bindings.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Rc<str>, Binding>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define (or redefine) `name` in this scope.
    #[inline]
    pub fn define(&mut self, name: &str, value: Value, mutability: Mutability) {
        self.bindings
            .insert(Rc::from(name), Binding { value, mutability });
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.bindings.get(name) {
            return Some(binding.value.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        if let Some(binding) = self.bindings.get_mut(name) {
            if !binding.mutability.is_mutable() {
                return Err(AssignError::Immutable);
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(AssignError::Undefined),
        }
    }
}

/// Block scopes of the running function, innermost last.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
}

impl Environment {
    /// Environment whose outermost scope is `root`.
    pub fn new(root: LocalScope<Scope>) -> Self {
        Environment { scopes: vec![root] }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        let scope = Scope::with_parent(self.current_scope());
        self.scopes.push(LocalScope::new(scope));
    }

    /// Pop the innermost scope. The root scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn current_scope(&self) -> LocalScope<Scope> {
        // `scopes` always holds the root.
        self.scopes[self.scopes.len() - 1].clone()
    }

    #[inline]
    pub fn define(&mut self, name: &str, value: Value, mutability: Mutability) {
        self.current_scope()
            .borrow_mut()
            .define(name, value, mutability);
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.current_scope().borrow().lookup(name)
    }

    #[inline]
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        self.current_scope().borrow_mut().assign(name, value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn number(value: Option<Value>) -> Option<f64> {
        match value {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    #[test]
    fn inner_scopes_shadow_and_pop() {
        let mut env = Environment::new(LocalScope::new(Scope::new()));
        env.define("x", Value::Number(1.0), Mutability::Mutable);
        env.push_scope();
        env.define("x", Value::Number(2.0), Mutability::Mutable);
        assert_eq!(number(env.lookup("x")), Some(2.0));
        env.pop_scope();
        assert_eq!(number(env.lookup("x")), Some(1.0));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn assignment_reaches_outer_scopes() {
        let mut env = Environment::new(LocalScope::new(Scope::new()));
        env.define("x", Value::Number(1.0), Mutability::Mutable);
        env.push_scope();
        assert_eq!(env.assign("x", Value::Number(5.0)), Ok(()));
        env.pop_scope();
        assert_eq!(number(env.lookup("x")), Some(5.0));
    }

    #[test]
    fn constants_and_unknown_names() {
        let mut env = Environment::new(LocalScope::new(Scope::new()));
        env.define("c", Value::Null, Mutability::Immutable);
        assert_eq!(env.assign("c", Value::Null), Err(AssignError::Immutable));
        assert_eq!(env.assign("nope", Value::Null), Err(AssignError::Undefined));
    }

    #[test]
    fn closures_see_later_writes() {
        let mut env = Environment::new(LocalScope::new(Scope::new()));
        env.define("n", Value::Number(0.0), Mutability::Mutable);
        let captured = env.current_scope();
        env.assign("n", Value::Number(3.0)).ok();
        assert_eq!(number(captured.borrow().lookup("n")), Some(3.0));
    }
}
