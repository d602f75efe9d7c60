use crate::value::Value;
use gc::{Finalize, Gc, GcCell, Trace};
use std::collections::HashMap;

#[derive(Trace, Finalize)]
pub struct Scope {
    values: HashMap<String, Value>,
    enclosing: Option<Environment>,
}

/// A shared, mutable scope linked to its enclosing scope. Cloning yields
/// another handle to the same scope.
#[derive(Clone, Trace, Finalize)]
pub struct Environment {
    scope: Gc<GcCell<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scope: Gc::new(GcCell::new(Scope {
                values: HashMap::new(),
                enclosing: None,
            })),
        }
    }

    pub fn new_enclosed(enclosing: &Environment) -> Environment {
        Environment {
            scope: Gc::new(GcCell::new(Scope {
                values: HashMap::new(),
                enclosing: Some(enclosing.clone()),
            })),
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.scope
            .borrow_mut()
            .values
            .insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.scope.borrow();
        scope
            .values
            .get(name)
            .cloned()
            .or_else(|| scope.enclosing.as_ref().and_then(|outer| outer.get(name)))
    }

    /// Overwrites the nearest existing binding of `name`. Returns `false`
    /// when no scope in the chain defines it.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut scope = self.scope.borrow_mut();
        if let Some(slot) = scope.values.get_mut(name) {
            *slot = value;
            return true;
        }
        match &scope.enclosing {
            Some(outer) => outer.assign(name, value),
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scope.borrow().values.contains_key(name)
    }

    pub fn enclosing(&self) -> Option<Environment> {
        self.scope.borrow().enclosing.clone()
    }

    /// Bindings of this scope only, sorted by name.
    pub fn bindings(&self) -> Vec<(String, Value)> {
        let mut bindings: Vec<_> = self
            .scope
            .borrow()
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        bindings.sort_by(|(left, _), (right, _)| left.cmp(right));
        bindings
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Gc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<_> = scope.values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("enclosed", &scope.enclosing.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_the_chain() {
        let globals = Environment::new();
        globals.define("x", Value::Int(1));
        let inner = Environment::new_enclosed(&globals);
        inner.define("y", Value::Int(2));

        assert_eq!(inner.get("x"), Some(Value::Int(1)));
        assert_eq!(inner.get("y"), Some(Value::Int(2)));
        assert_eq!(globals.get("y"), None);
        assert!(inner.enclosing().is_some_and(|outer| outer.ptr_eq(&globals)));
    }

    #[test]
    fn test_shadowing() {
        let globals = Environment::new();
        globals.define("x", Value::Int(1));
        let inner = Environment::new_enclosed(&globals);
        inner.define("x", Value::from("inner"));

        assert_eq!(inner.get("x"), Some(Value::from("inner")));
        assert_eq!(globals.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let globals = Environment::new();
        globals.define("x", Value::Int(1));
        let middle = Environment::new_enclosed(&globals);
        let inner = Environment::new_enclosed(&middle);

        assert!(inner.assign("x", Value::Int(5)));
        assert_eq!(globals.get("x"), Some(Value::Int(5)));
        assert!(!inner.contains("x"));

        assert!(!inner.assign("missing", Value::Null));
        assert_eq!(globals.get("missing"), None);
    }

    #[test]
    fn test_clones_share_the_scope() {
        let env = Environment::new();
        let alias = env.clone();
        alias.define("a", Value::Bool(true));

        assert!(env.ptr_eq(&alias));
        assert_eq!(env.get("a"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_bindings_are_sorted() {
        let env = Environment::new();
        env.define("b", Value::Int(2));
        env.define("a", Value::Int(1));
        env.define("c", Value::Int(3));

        let names: Vec<_> = env.bindings().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
