use crate::engine::ast::Value;
use crate::engine::error::EvalError;
use tracing::{error, trace};

// Helper function, not public
fn extract_number(value: &Value, op_name: &str) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => {
            let type_error = EvalError::TypeError {
                expected: "number".to_string(),
                found: value.to_string(),
            };
            error!(operator = %op_name, error = %type_error, "Type error in native procedure");
            Err(type_error)
        }
    }
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_add(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native '+' procedure");
    // Standard behavior for (+) is 0.
    let mut sum = 0.0;
    for arg in args {
        sum += extract_number(&arg, "+")?;
    }
    Ok(Value::Number(sum))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_subtract(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native '-' procedure");
    let Some((first, rest)) = args.split_first() else {
        return Err(EvalError::ArityMismatch {
            expected: 1,
            found: 0,
        });
    };
    let first_val = extract_number(first, "-")?;

    if rest.is_empty() {
        // Negation: (- x)
        return Ok(Value::Number(-first_val));
    }

    let mut result = first_val;
    for arg in rest {
        result -= extract_number(arg, "-")?;
    }
    Ok(Value::Number(result))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_multiply(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native '*' procedure");
    // Standard behavior for (*) is 1.
    let mut product = 1.0;
    for arg in args {
        product *= extract_number(&arg, "*")?;
    }
    Ok(Value::Number(product))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_divide(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native '/' procedure");
    let Some((first, rest)) = args.split_first() else {
        return Err(EvalError::ArityMismatch {
            expected: 1,
            found: 0,
        });
    };
    let first_val = extract_number(first, "/")?;

    if rest.is_empty() {
        // Reciprocal: (/ x)
        if first_val == 0.0 {
            return Err(EvalError::DivisionByZero(
                "reciprocal of 0 in native '/'".to_string(),
            ));
        }
        return Ok(Value::Number(1.0 / first_val));
    }

    let mut result = first_val;
    for arg in rest {
        let divisor = extract_number(arg, "/")?;
        if divisor == 0.0 {
            let div_zero_error =
                EvalError::DivisionByZero(format!("{} / 0 in native '/'", result));
            error!(error = %div_zero_error, "Division by zero in native '/'");
            return Err(div_zero_error);
        }
        result /= divisor;
    }
    Ok(Value::Number(result))
}

#[tracing::instrument(skip(args), ret, err)]
pub fn native_equals(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native '=' procedure for numeric equality");
    if args.len() < 2 {
        return Err(EvalError::ArityMismatch {
            expected: 2,
            found: args.len(),
        });
    }
    let first_val = extract_number(&args[0], "=")?;
    for arg in args.iter().skip(1) {
        if first_val != extract_number(arg, "=")? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

// Helper macro to generate comparison procedures
macro_rules! define_comparison_fn {
    ($fn_name:ident, $op_str:expr, $op:tt) => {
        #[tracing::instrument(skip(args), ret, err)]
        pub fn $fn_name(args: Vec<Value>) -> Result<Value, EvalError> {
            trace!("Executing native '{}' procedure", $op_str);
            if args.len() != 2 {
                return Err(EvalError::ArityMismatch {
                    expected: 2,
                    found: args.len(),
                });
            }
            let lhs = extract_number(&args[0], $op_str)?;
            let rhs = extract_number(&args[1], $op_str)?;
            Ok(Value::Bool(lhs $op rhs))
        }
    };
}

define_comparison_fn!(native_less_than, "<", <);
define_comparison_fn!(native_greater_than, ">", >);
define_comparison_fn!(native_less_than_or_equal, "<=", <=);
define_comparison_fn!(native_greater_than_or_equal, ">=", >=);
