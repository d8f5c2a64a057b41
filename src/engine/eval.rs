use crate::engine::ast::{CompoundProcedure, Expr, Procedure, Value};
use crate::engine::cond::cond_to_if;
use crate::engine::env::Environment;
use crate::engine::error::{EvalError, SchemeError, SyntaxError};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Evaluates one classified expression in `env`, producing one value.
///
/// Dispatch is purely on the expression's tag; classification has already
/// happened. Errors abort the whole top-level evaluation and propagate
/// outward through every enclosing recursive call.
#[instrument(level = "debug", skip(expr, env), fields(expr = %expr), ret, err)]
pub fn eval(expr: &Expr, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable(name) => env.borrow().get(name).ok_or_else(|| {
            debug!(symbol = %name, "Variable not bound in any frame");
            EvalError::UnboundVariable(name.clone()).into()
        }),
        Expr::Quotation(datum) => Ok(datum.clone()),
        Expr::Assignment { target, value } => {
            let value = eval(value, Rc::clone(&env))?;
            env.borrow_mut().set(target, value)?;
            Ok(Value::Unspecified)
        }
        Expr::Definition { target, value } => {
            let value = eval(value, Rc::clone(&env))?;
            env.borrow_mut().define(target.clone(), value);
            Ok(Value::Unspecified)
        }
        Expr::If {
            predicate,
            consequent,
            alternative,
        } => {
            if eval(predicate, Rc::clone(&env))?.is_truthy() {
                eval(consequent, env)
            } else {
                eval(alternative, env)
            }
        }
        Expr::Lambda { params, body } => {
            trace!(params = ?params, "Capturing defining environment in compound procedure");
            Ok(Value::Procedure(Procedure::Compound(CompoundProcedure {
                params: params.clone(),
                body: body.clone(),
                env: Rc::clone(&env),
            })))
        }
        Expr::Begin(body) => eval_sequence(body, env),
        Expr::Cond(clauses) => eval(&cond_to_if(clauses)?, env),
        Expr::Application { operator, operands } => {
            let procedure = eval(operator, Rc::clone(&env))?;
            let arguments = eval_operands(operands, env)?;
            apply(procedure, arguments)
        }
    }
}

/// Invokes a procedure value on already-evaluated arguments.
///
/// A compound procedure's call frame is parented to the procedure's captured
/// defining environment, never the caller's: free variables in the body
/// resolve lexically against the environment where the procedure was
/// created.
#[instrument(level = "debug", skip(procedure, arguments), fields(procedure = %procedure), ret, err)]
pub fn apply(procedure: Value, arguments: Vec<Value>) -> Result<Value, SchemeError> {
    match procedure {
        Value::Procedure(Procedure::Primitive(primitive)) => {
            trace!(name = %primitive.name, "Invoking primitive procedure");
            (primitive.func)(arguments).map_err(SchemeError::from)
        }
        Value::Procedure(Procedure::Compound(compound)) => {
            if arguments.len() != compound.params.len() {
                return Err(EvalError::ArityMismatch {
                    expected: compound.params.len(),
                    found: arguments.len(),
                }
                .into());
            }
            let frame = Environment::extend(&compound.params, arguments, Rc::clone(&compound.env));
            eval_sequence(&compound.body, frame)
        }
        other => {
            debug!(value = %other, "Attempted to apply a non-procedure value");
            Err(EvalError::NotApplicable(other).into())
        }
    }
}

/// Evaluates a non-empty body in order. Earlier results are discarded, but
/// their side effects persist in `env` and are visible to later expressions;
/// the last expression's value is the result.
pub fn eval_sequence(body: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    let Some((last, rest)) = body.split_last() else {
        return Err(SyntaxError::EmptyBody("sequence".to_string()).into());
    };
    for expr in rest {
        eval(expr, Rc::clone(&env))?;
    }
    eval(last, env)
}

/// Evaluates operands strictly left to right into an ordered value sequence.
/// Each operand's evaluation, including any side effects, is fully committed
/// before the next operand begins.
pub fn eval_operands(
    operands: &[Expr],
    env: Rc<RefCell<Environment>>,
) -> Result<Vec<Value>, SchemeError> {
    operands
        .iter()
        .map(|operand| eval(operand, Rc::clone(&env)))
        .collect()
}
