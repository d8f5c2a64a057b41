use crate::engine::ast::Value;
use crate::engine::error::EvalError;
use tracing::trace;

fn check_arity(args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::ArityMismatch {
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn extract_list<'a>(value: &'a Value, op_name: &str) -> Result<&'a [Value], EvalError> {
    match value {
        Value::List(items) => Ok(items),
        _ => Err(EvalError::TypeError {
            expected: format!("list argument for '{}'", op_name),
            found: value.to_string(),
        }),
    }
}

/// `(cons x xs)` prepends to a proper list; dotted pairs are not supported.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_cons(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'cons' procedure");
    check_arity(&args, 2)?;
    let tail = extract_list(&args[1], "cons")?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::List(items))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_car(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'car' procedure");
    check_arity(&args, 1)?;
    let items = extract_list(&args[0], "car")?;
    items.first().cloned().ok_or_else(|| EvalError::TypeError {
        expected: "non-empty list for 'car'".to_string(),
        found: args[0].to_string(),
    })
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_cdr(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'cdr' procedure");
    check_arity(&args, 1)?;
    let items = extract_list(&args[0], "cdr")?;
    match items.split_first() {
        Some((_, rest)) => Ok(Value::List(rest.to_vec())),
        None => Err(EvalError::TypeError {
            expected: "non-empty list for 'cdr'".to_string(),
            found: args[0].to_string(),
        }),
    }
}

#[tracing::instrument(skip(args), ret)]
pub fn native_list(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'list' procedure");
    Ok(Value::List(args))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_is_null(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'null?' procedure");
    check_arity(&args, 1)?;
    Ok(Value::Bool(matches!(&args[0], Value::List(items) if items.is_empty())))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_is_pair(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'pair?' procedure");
    check_arity(&args, 1)?;
    Ok(Value::Bool(matches!(&args[0], Value::List(items) if !items.is_empty())))
}

/// Structural equality over any two values.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_is_equal(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'equal?' procedure");
    check_arity(&args, 2)?;
    Ok(Value::Bool(args[0] == args[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ast::Value;
    use crate::engine::builtins;
    use crate::engine::classify::classify;
    use crate::engine::error::SchemeError;
    use crate::engine::eval::eval;
    use crate::engine::parser::parse_datum;
    use crate::logging::init_test_logging;

    // Helper to evaluate one expression against the full prelude.
    fn eval_list_str(code: &str) -> Result<Value, SchemeError> {
        init_test_logging();
        let (remaining, datum) = match parse_datum(code) {
            Ok(parsed) => parsed,
            Err(e) => panic!("Test parse error for code '{}': {}", code, e),
        };
        assert!(
            remaining.is_empty(),
            "Unexpected remaining input after parsing '{}': {}",
            code,
            remaining
        );
        let env = builtins::setup_environment();
        eval(&classify(&datum)?, env)
    }

    #[test]
    fn cons_prepends_to_a_list() {
        assert_eq!(
            eval_list_str("(cons 1 '(2 3))"),
            Ok(Value::List(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
            ]))
        );
        assert_eq!(
            eval_list_str("(cons 1 '())"),
            Ok(Value::List(vec![Value::Number(1.0)]))
        );
    }

    #[test]
    fn cons_rejects_non_list_tails() {
        assert!(matches!(
            eval_list_str("(cons 1 2)"),
            Err(SchemeError::Eval(EvalError::TypeError { .. }))
        ));
    }

    #[test]
    fn car_and_cdr_split_a_list() {
        assert_eq!(eval_list_str("(car '(1 2 3))"), Ok(Value::Number(1.0)));
        assert_eq!(
            eval_list_str("(cdr '(1 2 3))"),
            Ok(Value::List(vec![Value::Number(2.0), Value::Number(3.0)]))
        );
        assert_eq!(
            eval_list_str("(cdr '(1))"),
            Ok(Value::List(vec![]))
        );
    }

    #[test]
    fn car_and_cdr_reject_empty_lists() {
        assert!(matches!(
            eval_list_str("(car '())"),
            Err(SchemeError::Eval(EvalError::TypeError { .. }))
        ));
        assert!(matches!(
            eval_list_str("(cdr '())"),
            Err(SchemeError::Eval(EvalError::TypeError { .. }))
        ));
    }

    #[test]
    fn list_collects_its_arguments() {
        assert_eq!(
            eval_list_str("(list 1 \"two\" '(3))"),
            Ok(Value::List(vec![
                Value::Number(1.0),
                Value::Text("two".to_string()),
                Value::List(vec![Value::Number(3.0)]),
            ]))
        );
        assert_eq!(eval_list_str("(list)"), Ok(Value::List(vec![])));
    }

    #[test]
    fn null_and_pair_predicates() {
        assert_eq!(eval_list_str("(null? '())"), Ok(Value::Bool(true)));
        assert_eq!(eval_list_str("(null? '(1))"), Ok(Value::Bool(false)));
        assert_eq!(eval_list_str("(null? 0)"), Ok(Value::Bool(false)));
        assert_eq!(eval_list_str("(pair? '(1))"), Ok(Value::Bool(true)));
        assert_eq!(eval_list_str("(pair? '())"), Ok(Value::Bool(false)));
    }

    #[test]
    fn equal_compares_structurally() {
        assert_eq!(eval_list_str("(equal? '(1 2) '(1 2))"), Ok(Value::Bool(true)));
        assert_eq!(eval_list_str("(equal? '(1 2) '(1 3))"), Ok(Value::Bool(false)));
        assert_eq!(eval_list_str("(equal? \"a\" \"a\")"), Ok(Value::Bool(true)));
    }

    #[test]
    fn arity_errors_surface() {
        assert!(matches!(
            eval_list_str("(car)"),
            Err(SchemeError::Eval(EvalError::ArityMismatch { .. }))
        ));
        assert!(matches!(
            eval_list_str("(cons 1)"),
            Err(SchemeError::Eval(EvalError::ArityMismatch { .. }))
        ));
    }
}
