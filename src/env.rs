//! Lexically scoped environments: a chain of name → value maps. Each
//! lambda invocation pushes a fresh scope whose parent is the
//! environment the lambda captured; the root scope holds the builtins
//! and the `file` binding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ErrorKind;
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Env {
    outer: Option<Rc<RefCell<Env>>>,
    store: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            outer: None,
            store: HashMap::new(),
        }
    }

    /// A child scope of `outer`.
    pub fn with_outer(outer: Rc<RefCell<Env>>) -> Self {
        Env {
            outer: Some(outer),
            store: HashMap::new(),
        }
    }

    /// Insert a new binding into this scope. Shadowing within the same
    /// scope is rejected; shadowing an outer scope is fine.
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        if self.store.contains_key(name) {
            return Err(ErrorKind::Redeclaration(name.to_owned()));
        }
        self.store.insert(name.to_owned(), value);
        Ok(())
    }

    /// Overwrite an existing binding in this scope. Outer scopes are
    /// not searched: `set` is innermost-only.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        if !self.store.contains_key(name) {
            return Err(ErrorKind::UndeclaredVariable(name.to_owned()));
        }
        self.store.insert(name.to_owned(), value);
        Ok(())
    }

    /// The innermost binding of `name`, recursing into `outer`.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().lookup(name)),
        }
    }

    /// Unconditional insert. Interpreter-internal: installing builtins
    /// and maintaining the `file` binding.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.store.insert(name.to_owned(), value);
    }

    /// Walk the `outer` links to the root environment.
    pub fn globals(env: &Rc<RefCell<Env>>) -> Rc<RefCell<Env>> {
        let mut current = Rc::clone(env);
        loop {
            let outer = current.borrow().outer.clone();
            match outer {
                Some(outer) => current = outer,
                None => return current,
            }
        }
    }
}
