//! Structural recognition of expressions.
//!
//! The classifier turns the reader's untyped [`Datum`] shape into a tagged
//! [`Expr`] exactly once per top-level form, so evaluation dispatches on a
//! discriminant instead of re-running structural predicates. Recognition
//! order is fixed: literals, then bare symbols, then each tagged special
//! form, and finally application as the fallback for any remaining compound
//! structure. Application must stay last because it has no distinguishing
//! tag of its own.

use crate::engine::ast::{CondClause, CondTest, Datum, Expr, Value};
use crate::engine::error::SyntaxError;
use crate::engine::special_forms;
use tracing::{instrument, trace};

/// Classifies one datum into a tagged expression, recursing into sub-forms.
#[instrument(level = "trace", skip(datum), fields(datum = %datum), err)]
pub fn classify(datum: &Datum) -> Result<Expr, SyntaxError> {
    match datum {
        Datum::Number(n) => Ok(Expr::Literal(Value::Number(*n))),
        Datum::Text(s) => Ok(Expr::Literal(Value::Text(s.clone()))),
        Datum::Bool(b) => Ok(Expr::Literal(Value::Bool(*b))),
        Datum::Symbol(name) => Ok(Expr::Variable(name.clone())),
        Datum::List(items) => classify_list(datum, items),
    }
}

fn classify_list(datum: &Datum, items: &[Datum]) -> Result<Expr, SyntaxError> {
    let Some((head, rest)) = items.split_first() else {
        // The empty list is neither a tagged form nor an application.
        return Err(SyntaxError::UnknownExpression(datum.clone()));
    };
    if let Datum::Symbol(tag) = head {
        match tag.as_str() {
            special_forms::QUOTE => return classify_quotation(datum, rest),
            special_forms::SET => return classify_assignment(datum, rest),
            special_forms::DEFINE => return classify_definition(datum, rest),
            special_forms::IF => return classify_if(datum, rest),
            special_forms::LAMBDA => return classify_lambda(datum, rest),
            special_forms::BEGIN | special_forms::PROGN => return classify_sequence(rest),
            special_forms::COND => return classify_cond(datum, rest),
            _ => {}
        }
    }
    trace!("No special form tag matched; classifying as application");
    classify_application(head, rest)
}

// (quote d)
fn classify_quotation(datum: &Datum, rest: &[Datum]) -> Result<Expr, SyntaxError> {
    match rest {
        [quoted] => Ok(Expr::Quotation(quote_datum(quoted))),
        _ => Err(SyntaxError::UnknownExpression(datum.clone())),
    }
}

/// Converts a quoted datum into the structured value it denotes. No
/// evaluation happens; symbols and lists pass through as data.
fn quote_datum(datum: &Datum) -> Value {
    match datum {
        Datum::Number(n) => Value::Number(*n),
        Datum::Text(s) => Value::Text(s.clone()),
        Datum::Bool(b) => Value::Bool(*b),
        Datum::Symbol(s) => Value::Symbol(s.clone()),
        Datum::List(items) => Value::List(items.iter().map(quote_datum).collect()),
    }
}

// (set! target value)
fn classify_assignment(datum: &Datum, rest: &[Datum]) -> Result<Expr, SyntaxError> {
    match rest {
        [Datum::Symbol(target), value] => Ok(Expr::Assignment {
            target: target.clone(),
            value: Box::new(classify(value)?),
        }),
        _ => Err(SyntaxError::UnknownExpression(datum.clone())),
    }
}

// (define target value), or the procedure shorthand
// (define (name param...) body...) which desugars eagerly into an
// equivalent lambda-valued definition at the moment the form is examined.
fn classify_definition(datum: &Datum, rest: &[Datum]) -> Result<Expr, SyntaxError> {
    match rest {
        [Datum::Symbol(target), value] if !special_forms::is_special_form(target) => {
            Ok(Expr::Definition {
                target: target.clone(),
                value: Box::new(classify(value)?),
            })
        }
        [Datum::List(header), body @ ..] => {
            let [Datum::Symbol(name), params @ ..] = header.as_slice() else {
                return Err(SyntaxError::UnknownExpression(datum.clone()));
            };
            if special_forms::is_special_form(name) {
                return Err(SyntaxError::UnknownExpression(datum.clone()));
            }
            trace!(name = %name, "Desugaring procedure-shorthand definition");
            Ok(Expr::Definition {
                target: name.clone(),
                value: Box::new(make_lambda(datum, params, body)?),
            })
        }
        _ => Err(SyntaxError::UnknownExpression(datum.clone())),
    }
}

// (if predicate consequent [alternative]); a missing alternative behaves as
// the literal false.
fn classify_if(datum: &Datum, rest: &[Datum]) -> Result<Expr, SyntaxError> {
    match rest {
        [predicate, consequent] => Ok(make_if(
            classify(predicate)?,
            classify(consequent)?,
            Expr::Literal(Value::Bool(false)),
        )),
        [predicate, consequent, alternative] => Ok(make_if(
            classify(predicate)?,
            classify(consequent)?,
            classify(alternative)?,
        )),
        _ => Err(SyntaxError::UnknownExpression(datum.clone())),
    }
}

/// Builds a conditional node from its three parts. Also used by the cond
/// rewriter.
pub fn make_if(predicate: Expr, consequent: Expr, alternative: Expr) -> Expr {
    Expr::If {
        predicate: Box::new(predicate),
        consequent: Box::new(consequent),
        alternative: Box::new(alternative),
    }
}

// (lambda (param...) body...)
fn classify_lambda(datum: &Datum, rest: &[Datum]) -> Result<Expr, SyntaxError> {
    match rest {
        [Datum::List(params), body @ ..] => make_lambda(datum, params, body),
        _ => Err(SyntaxError::UnknownExpression(datum.clone())),
    }
}

fn make_lambda(datum: &Datum, params: &[Datum], body: &[Datum]) -> Result<Expr, SyntaxError> {
    let mut names = Vec::with_capacity(params.len());
    for param in params {
        match param {
            Datum::Symbol(name) if !special_forms::is_special_form(name) => {
                names.push(name.clone());
            }
            _ => return Err(SyntaxError::UnknownExpression(datum.clone())),
        }
    }
    if body.is_empty() {
        return Err(SyntaxError::EmptyBody(special_forms::LAMBDA.to_string()));
    }
    Ok(Expr::Lambda {
        params: names,
        body: classify_all(body)?,
    })
}

// (begin expr...) / (progn expr...)
fn classify_sequence(rest: &[Datum]) -> Result<Expr, SyntaxError> {
    if rest.is_empty() {
        return Err(SyntaxError::EmptyBody(special_forms::BEGIN.to_string()));
    }
    Ok(Expr::Begin(classify_all(rest)?))
}

// (cond (test action...) ... [(else action...)]). Clause actions may be
// empty; whether an else clause is last is the rewriter's check, not the
// classifier's.
fn classify_cond(datum: &Datum, rest: &[Datum]) -> Result<Expr, SyntaxError> {
    let mut clauses = Vec::with_capacity(rest.len());
    for clause in rest {
        let Datum::List(parts) = clause else {
            return Err(SyntaxError::UnknownExpression(datum.clone()));
        };
        let Some((test, actions)) = parts.split_first() else {
            return Err(SyntaxError::UnknownExpression(datum.clone()));
        };
        let test = match test {
            Datum::Symbol(s) if s == special_forms::ELSE => CondTest::Else,
            other => CondTest::Predicate(classify(other)?),
        };
        clauses.push(CondClause {
            test,
            actions: classify_all(actions)?,
        });
    }
    Ok(Expr::Cond(clauses))
}

// Fallback: any remaining compound structure is an application.
fn classify_application(operator: &Datum, operands: &[Datum]) -> Result<Expr, SyntaxError> {
    Ok(Expr::Application {
        operator: Box::new(classify(operator)?),
        operands: classify_all(operands)?,
    })
}

fn classify_all(data: &[Datum]) -> Result<Vec<Expr>, SyntaxError> {
    data.iter().map(classify).collect()
}
