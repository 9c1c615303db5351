use std::collections::HashMap;

use crate::value::Value;

/// Lexically scoped name bindings: a stack of frames where index order is
/// the enclosing-scope chain and frame 0 is the global scope. A binding of
/// `None` is a variable that was declared without an initializer; reading
/// it is a fault, assigning to it is fine.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<HashMap<String, Option<Value>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }
}

impl Environment {
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "the global scope is never popped");
        self.scopes.pop();
    }

    /// Binds `name` in the innermost scope, shadowing any enclosing binding
    /// and silently replacing a same-scope one.
    pub fn define(&mut self, name: &str, value: Option<Value>) {
        self.innermost().insert(name.to_string(), value);
    }

    /// Looks `name` up through the scope chain. `None` means the name is
    /// not bound anywhere; `Some(None)` means it is declared but was never
    /// initialized.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Overwrites `name` in the nearest scope that already binds it.
    /// Returns false if no scope does; assignment never creates a binding.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name)) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    fn innermost(&mut self) -> &mut HashMap<String, Option<Value>> {
        self.scopes.last_mut().expect("the global scope always exists")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn define_and_get() {
        let mut env = Environment::default();
        env.define("a", Some(Value::from(1.0)));
        assert_eq!(env.get("a"), Some(&Some(Value::from(1.0))));
        assert_eq!(env.get("b"), None);
    }

    #[test]
    fn redefining_replaces_in_same_scope() {
        let mut env = Environment::default();
        env.define("a", Some(Value::from(1.0)));
        env.define("a", Some(Value::from("two")));
        assert_eq!(env.get("a"), Some(&Some(Value::from("two"))));
    }

    #[test]
    fn uninitialized_binding_is_visible() {
        let mut env = Environment::default();
        env.define("a", None);
        assert_eq!(env.get("a"), Some(&None));
    }

    #[test]
    fn shadowing_hides_but_does_not_overwrite() {
        let mut env = Environment::default();
        env.define("a", Some(Value::from(1.0)));

        env.push_scope();
        env.define("a", Some(Value::from(2.0)));
        assert_eq!(env.get("a"), Some(&Some(Value::from(2.0))));

        env.pop_scope();
        assert_eq!(env.get("a"), Some(&Some(Value::from(1.0))));
    }

    #[test]
    fn assign_walks_the_chain() {
        let mut env = Environment::default();
        env.define("a", Some(Value::from(1.0)));

        env.push_scope();
        assert!(env.assign("a", Value::from(5.0)));
        env.pop_scope();

        assert_eq!(env.get("a"), Some(&Some(Value::from(5.0))));
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut env = Environment::default();
        assert!(!env.assign("ghost", Value::Nil));
        assert_eq!(env.get("ghost"), None);
    }

    #[test]
    fn assign_initializes_a_declared_variable() {
        let mut env = Environment::default();
        env.define("a", None);
        assert!(env.assign("a", Value::from(3.0)));
        assert_eq!(env.get("a"), Some(&Some(Value::from(3.0))));
    }
}
