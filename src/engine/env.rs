use crate::engine::ast::Value;
use crate::engine::error::EvalError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// One frame of the lexical environment chain. Frames are shared by
/// reference: every compound procedure holds its defining frame alive for
/// as long as the procedure itself lives, so a frame may outlive the call
/// that created it.
#[derive(Debug, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// Creates a new, empty global frame without any primitives.
    pub fn new() -> Rc<RefCell<Self>> {
        debug!("Creating new empty global frame");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            outer: None,
        }))
    }

    /// Creates a new, empty frame whose parent is `outer_env`.
    pub fn new_enclosed(outer_env: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        debug!("Creating new enclosed frame");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            outer: Some(outer_env),
        }))
    }

    /// Creates a frame binding each parameter to the corresponding argument,
    /// positionally, on top of `outer_env`. Callers are responsible for
    /// checking arity before extending.
    pub fn extend(
        params: &[String],
        args: Vec<Value>,
        outer_env: Rc<RefCell<Environment>>,
    ) -> Rc<RefCell<Self>> {
        let frame = Environment::new_enclosed(outer_env);
        {
            let mut borrowed = frame.borrow_mut();
            for (param, arg) in params.iter().zip(args) {
                borrowed.define(param.clone(), arg);
            }
        }
        frame
    }

    /// Binds `name` in this frame, overwriting any existing binding here.
    pub fn define(&mut self, name: String, value: Value) {
        trace!(name = %name, value = ?value, "Defining variable in innermost frame");
        self.bindings.insert(name, value);
    }

    /// Retrieves a variable's value, searching outward through the chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        trace!(name = %name, "Looking up variable");
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else {
            match &self.outer {
                Some(outer_env) => outer_env.borrow().get(name),
                None => {
                    debug!(name = %name, "Variable not found in any frame");
                    None
                }
            }
        }
    }

    /// Mutates the existing binding for `name` in whichever frame already
    /// holds it, searching outward. Fails if no frame binds it.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.bindings.contains_key(name) {
            trace!(name = %name, value = ?value, "Assigning existing binding");
            self.bindings.insert(name.to_string(), value);
            Ok(())
        } else {
            match &self.outer {
                Some(outer_env) => outer_env.borrow_mut().set(name, value),
                None => {
                    debug!(name = %name, "Assignment target not bound in any frame");
                    Err(EvalError::UnboundVariable(name.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ast::Value;
    use crate::logging::init_test_logging;

    #[test]
    fn define_and_get_in_global_frame() {
        init_test_logging();
        let env = Environment::new();
        env.borrow_mut()
            .define("x".to_string(), Value::Number(10.0));
        assert_eq!(env.borrow().get("x"), Some(Value::Number(10.0)));
    }

    #[test]
    fn get_from_outer_frame() {
        init_test_logging();
        let outer_env = Environment::new();
        outer_env
            .borrow_mut()
            .define("x".to_string(), Value::Number(10.0));

        let inner_env = Environment::new_enclosed(outer_env.clone());
        assert_eq!(inner_env.borrow().get("x"), Some(Value::Number(10.0)));
    }

    #[test]
    fn define_in_inner_shadows_outer() {
        init_test_logging();
        let outer_env = Environment::new();
        outer_env
            .borrow_mut()
            .define("x".to_string(), Value::Number(10.0));

        let inner_env = Environment::new_enclosed(outer_env.clone());
        inner_env
            .borrow_mut()
            .define("x".to_string(), Value::Number(20.0)); // Shadow

        assert_eq!(inner_env.borrow().get("x"), Some(Value::Number(20.0)));
        // The outer frame is untouched.
        assert_eq!(outer_env.borrow().get("x"), Some(Value::Number(10.0)));
    }

    #[test]
    fn get_undefined_variable() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(env.borrow().get("non_existent"), None);
    }

    #[test]
    fn redefine_variable_in_same_frame() {
        init_test_logging();
        let env = Environment::new();
        env.borrow_mut()
            .define("x".to_string(), Value::Number(10.0));
        env.borrow_mut()
            .define("x".to_string(), Value::Number(20.0)); // Redefine
        assert_eq!(env.borrow().get("x"), Some(Value::Number(20.0)));
    }

    #[test]
    fn set_mutates_the_holding_frame() {
        init_test_logging();
        let outer_env = Environment::new();
        outer_env
            .borrow_mut()
            .define("x".to_string(), Value::Number(1.0));

        let inner_env = Environment::new_enclosed(outer_env.clone());
        inner_env
            .borrow_mut()
            .set("x", Value::Number(2.0))
            .expect("x is bound in the outer frame");

        // The binding lives in the outer frame; no shadow was created.
        assert_eq!(outer_env.borrow().get("x"), Some(Value::Number(2.0)));
        assert!(!inner_env.borrow().bindings.contains_key("x"));
    }

    #[test]
    fn set_unbound_variable_fails() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            env.borrow_mut().set("ghost", Value::Number(1.0)),
            Err(EvalError::UnboundVariable("ghost".to_string()))
        );
    }

    #[test]
    fn extend_binds_params_positionally() {
        init_test_logging();
        let outer_env = Environment::new();
        outer_env
            .borrow_mut()
            .define("free".to_string(), Value::Number(99.0));

        let params = vec!["a".to_string(), "b".to_string()];
        let frame = Environment::extend(
            &params,
            vec![Value::Number(1.0), Value::Number(2.0)],
            outer_env,
        );

        assert_eq!(frame.borrow().get("a"), Some(Value::Number(1.0)));
        assert_eq!(frame.borrow().get("b"), Some(Value::Number(2.0)));
        // The parent chain is reachable through the new frame.
        assert_eq!(frame.borrow().get("free"), Some(Value::Number(99.0)));
    }
}
