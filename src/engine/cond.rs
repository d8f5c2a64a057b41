//! Desugaring of the derived `cond` form into nested two-way conditionals.

use crate::engine::ast::{CondClause, CondTest, Expr, Value};
use crate::engine::classify::make_if;
use crate::engine::error::SyntaxError;
use tracing::{instrument, trace};

/// Rewrites a clause list into nested `if` expressions, processing clauses
/// in written order. An exhausted clause list yields the literal false. An
/// `else` clause must be syntactically last; any clause after it fails the
/// whole rewrite.
#[instrument(level = "trace", skip(clauses), fields(clauses = clauses.len()), err)]
pub fn cond_to_if(clauses: &[CondClause]) -> Result<Expr, SyntaxError> {
    let Some((clause, rest)) = clauses.split_first() else {
        trace!("Clause list exhausted without an else; cond falls through to false");
        return Ok(Expr::Literal(Value::Bool(false)));
    };
    match &clause.test {
        CondTest::Else => {
            if let Some(next) = rest.first() {
                return Err(SyntaxError::MisplacedElse(next.to_string()));
            }
            Ok(sequence_to_expr(&clause.actions))
        }
        CondTest::Predicate(predicate) => Ok(make_if(
            predicate.clone(),
            sequence_to_expr(&clause.actions),
            cond_to_if(rest)?,
        )),
    }
}

/// Collapses a clause body into a single expression: zero actions act as a
/// false placeholder, one action stands alone, several become a sequence in
/// order.
pub fn sequence_to_expr(actions: &[Expr]) -> Expr {
    match actions {
        [] => Expr::Literal(Value::Bool(false)),
        [action] => action.clone(),
        _ => Expr::Begin(actions.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    fn predicate_clause(test: &str, actions: &[Expr]) -> CondClause {
        CondClause {
            test: CondTest::Predicate(var(test)),
            actions: actions.to_vec(),
        }
    }

    fn else_clause(actions: &[Expr]) -> CondClause {
        CondClause {
            test: CondTest::Else,
            actions: actions.to_vec(),
        }
    }

    #[test]
    fn two_clauses_rewrite_to_a_single_conditional() {
        let rewritten = cond_to_if(&[
            predicate_clause("p1", &[var("a1")]),
            else_clause(&[var("a2")]),
        ])
        .unwrap();
        assert_eq!(rewritten, make_if(var("p1"), var("a1"), var("a2")));
    }

    #[test]
    fn clauses_nest_in_written_order() {
        let rewritten = cond_to_if(&[
            predicate_clause("p1", &[var("a1")]),
            predicate_clause("p2", &[var("a2")]),
            else_clause(&[var("a3")]),
        ])
        .unwrap();
        assert_eq!(
            rewritten,
            make_if(var("p1"), var("a1"), make_if(var("p2"), var("a2"), var("a3")))
        );
    }

    #[test]
    fn else_not_last_fails() {
        let result = cond_to_if(&[
            else_clause(&[var("a")]),
            predicate_clause("p2", &[var("b")]),
        ]);
        assert!(matches!(result, Err(SyntaxError::MisplacedElse(_))));
    }

    #[test]
    fn no_clauses_rewrite_to_false() {
        assert_eq!(
            cond_to_if(&[]).unwrap(),
            Expr::Literal(Value::Bool(false))
        );
    }

    #[test]
    fn missing_else_falls_through_to_false() {
        let rewritten = cond_to_if(&[predicate_clause("p1", &[var("a1")])]).unwrap();
        assert_eq!(
            rewritten,
            make_if(var("p1"), var("a1"), Expr::Literal(Value::Bool(false)))
        );
    }

    #[test]
    fn empty_clause_body_acts_as_false() {
        let rewritten = cond_to_if(&[predicate_clause("p1", &[]), else_clause(&[var("a")])])
            .unwrap();
        assert_eq!(
            rewritten,
            make_if(var("p1"), Expr::Literal(Value::Bool(false)), var("a"))
        );
    }

    #[test]
    fn multiple_actions_wrap_in_a_sequence() {
        let rewritten =
            cond_to_if(&[predicate_clause("p1", &[var("a1"), var("a2")])]).unwrap();
        assert_eq!(
            rewritten,
            make_if(
                var("p1"),
                Expr::Begin(vec![var("a1"), var("a2")]),
                Expr::Literal(Value::Bool(false)),
            )
        );
    }
}
