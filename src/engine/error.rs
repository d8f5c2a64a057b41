use crate::engine::ast::{Datum, Value};
use thiserror::Error;

/// Structural failures detected while classifying or rewriting expressions.
/// Each variant carries the offending form for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("unknown expression form: {0}")]
    UnknownExpression(Datum),
    #[error("misplaced 'else' in cond: clause {0} follows it")]
    MisplacedElse(String),
    #[error("empty body in {0}")]
    EmptyBody(String),
}

/// Failures raised while evaluating an already-classified expression. The
/// type and division variants belong to the primitive procedures' contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    #[error("not a procedure: {0}")]
    NotApplicable(Value),
    #[error("arity mismatch: procedure expects {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("type error: expected {expected}, found {found}")]
    TypeError { expected: String, found: String },
    #[error("division by zero: {0}")]
    DivisionByZero(String),
}

/// Umbrella error for one top-level evaluation. The core never recovers
/// internally: any error unwinds every enclosing recursive call and reaches
/// the host, which decides whether to report-and-resume or terminate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemeError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
