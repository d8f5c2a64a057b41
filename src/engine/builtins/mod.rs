//! The primitive procedure table: host-native callables exposed to Scheme.
//!
//! The evaluator treats every entry opaquely and only invokes it through
//! `apply`; failure modes (type errors, division by zero, native arity
//! demands) are each primitive's own contract.

pub mod list;
pub mod log;
pub mod math;

use crate::engine::ast::{NativeFn, PrimitiveProcedure, Procedure, Value};
use crate::engine::env::Environment;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

// Name → native callable, one entry per primitive.
static PRIMITIVES: Lazy<Vec<(&'static str, NativeFn)>> = Lazy::new(|| {
    vec![
        ("+", math::native_add as NativeFn),
        ("-", math::native_subtract),
        ("*", math::native_multiply),
        ("/", math::native_divide),
        ("=", math::native_equals),
        ("<", math::native_less_than),
        (">", math::native_greater_than),
        ("<=", math::native_less_than_or_equal),
        (">=", math::native_greater_than_or_equal),
        ("cons", list::native_cons),
        ("car", list::native_car),
        ("cdr", list::native_cdr),
        ("list", list::native_list),
        ("null?", list::native_is_null),
        ("pair?", list::native_is_pair),
        ("equal?", list::native_is_equal),
        ("display", log::native_display),
        ("newline", log::native_newline),
    ]
});

/// Installs the primitive table and the `true`/`false` variable bindings
/// into the given frame.
pub fn populate_globals(env: Rc<RefCell<Environment>>) {
    let mut frame = env.borrow_mut();
    for (name, func) in PRIMITIVES.iter() {
        frame.define(
            (*name).to_string(),
            Value::Procedure(Procedure::Primitive(PrimitiveProcedure {
                name: (*name).to_string(),
                func: *func,
            })),
        );
    }
    // The boolean names are ordinary variables in the global frame; the
    // reader additionally accepts the #t/#f literals.
    frame.define("true".to_string(), Value::Bool(true));
    frame.define("false".to_string(), Value::Bool(false));
    debug!(primitives = PRIMITIVES.len(), "Populated global frame");
}

/// Builds the global environment a host passes into top-level evaluation.
pub fn setup_environment() -> Rc<RefCell<Environment>> {
    let env = Environment::new();
    populate_globals(Rc::clone(&env));
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    #[test]
    fn globals_hold_primitives_and_booleans() {
        init_test_logging();
        let env = setup_environment();
        assert!(matches!(
            env.borrow().get("+"),
            Some(Value::Procedure(Procedure::Primitive(_)))
        ));
        assert!(matches!(
            env.borrow().get("car"),
            Some(Value::Procedure(Procedure::Primitive(_)))
        ));
        assert_eq!(env.borrow().get("true"), Some(Value::Bool(true)));
        assert_eq!(env.borrow().get("false"), Some(Value::Bool(false)));
    }

    #[test]
    fn primitive_names_are_unique() {
        init_test_logging();
        let mut names: Vec<&str> = PRIMITIVES.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }
}
