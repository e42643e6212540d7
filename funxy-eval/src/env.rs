//! Lexically scoped environment.
//!
//! A scope is a mapping from name to value plus an optional parent scope.
//! Closures capture the defining scope *by reference* so later mutations to
//! that scope's bindings are visible — this is what lets `let rec` and
//! mutually recursive top-level definitions work. Scopes are `Arc<Mutex<_>>` rather than
//! `Rc<RefCell<_>>`: a task-pool worker runs a
//! closure's body on another OS thread, so its captured environment has to
//! be `Send`. A function's captured environment keeps its defining scope
//! alive, and a scope that closes over a function defined within it forms a
//! reference cycle that lives for the process's lifetime — acceptable here
//! because scopes are process-long-lived by design; nothing reclaims them
//! mid-run.

use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct ScopeData {
    bindings: HashMap<String, Value>,
    parent: Option<Env>,
}

#[derive(Debug, Clone)]
pub struct Env(Arc<Mutex<ScopeData>>);

impl Env {
    pub fn root() -> Self {
        Self(Arc::new(Mutex::new(ScopeData {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    pub fn child(parent: &Env) -> Self {
        Self(Arc::new(Mutex::new(ScopeData {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    /// Walks the parent chain; first hit wins.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let data = self.0.lock().unwrap();
        if let Some(v) = data.bindings.get(name) {
            return Some(v.clone());
        }
        data.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Creates or replaces a binding in *this* scope.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.lock().unwrap().bindings.insert(name.into(), value);
    }

    /// Reassigns an existing binding wherever it lives in the parent chain,
    /// falling back to defining it locally if it's nowhere to be found.
    /// Used by mutation-style assignment against captured closure state.
    pub fn assign(&self, name: &str, value: Value) {
        let mut scope = Some(self.clone());
        while let Some(s) = scope {
            let mut data = s.0.lock().unwrap();
            if data.bindings.contains_key(name) {
                data.bindings.insert(name.to_string(), value);
                return;
            }
            let next = data.parent.clone();
            drop(data);
            scope = next;
        }
        self.set(name, value);
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Bindings made directly in this scope, not its ancestors. Used to
    /// splice a successful pattern match's bindings into a caller's scope.
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        self.0
            .lock()
            .unwrap()
            .bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn child_sees_parent_bindings() {
        let root = Env::root();
        root.set("x", Value::Int(1));
        let child = Env::child(&root);
        assert_eq!(child.lookup("x"), Some(Value::Int(1)));
    }

    #[test]
    fn shadowing_does_not_mutate_parent() {
        let root = Env::root();
        root.set("x", Value::Int(1));
        let child = Env::child(&root);
        child.set("x", Value::Int(2));
        assert_eq!(child.lookup("x"), Some(Value::Int(2)));
        assert_eq!(root.lookup("x"), Some(Value::Int(1)));
    }

    #[test]
    fn mutation_through_closure_is_visible() {
        let root = Env::root();
        root.set("counter", Value::Int(0));
        let closure_env = root.clone();
        root.assign("counter", Value::Int(1));
        assert_eq!(closure_env.lookup("counter"), Some(Value::Int(1)));
    }
}
