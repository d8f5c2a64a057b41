use crate::engine::ast::Value;
use crate::engine::error::EvalError;
use tracing::trace;

/// `(display x)` prints a value to stdout without a newline. Text prints
/// without its surrounding quotes.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_display(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'display' procedure");
    if args.len() != 1 {
        return Err(EvalError::ArityMismatch {
            expected: 1,
            found: args.len(),
        });
    }
    match &args[0] {
        Value::Text(text) => print!("{}", text),
        other => print!("{}", other),
    }
    Ok(Value::Unspecified)
}

/// `(newline)` prints a line break.
#[tracing::instrument(skip(args), ret, err)]
pub fn native_newline(args: Vec<Value>) -> Result<Value, EvalError> {
    trace!("Executing native 'newline' procedure");
    if !args.is_empty() {
        return Err(EvalError::ArityMismatch {
            expected: 0,
            found: args.len(),
        });
    }
    println!();
    Ok(Value::Unspecified)
}
