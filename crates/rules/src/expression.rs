//! Building and reading back threshold comparisons.
//!
//! A statistical condition is a single comparison between a numeric series
//! reference and a literal. Reading one back is lenient: anything else yields
//! a threshold of `0.0` and a warning rather than an error.

use tracing::warn;

use wizard_core::{Result, WizardError};

use crate::schema::{ComparisonOp, Expression};

/// Build `series(reference_id) <operator> threshold`.
pub fn build_expression(operator: &str, reference_id: &str, threshold: f64) -> Result<Expression> {
    let op: ComparisonOp = operator
        .parse()
        .map_err(|_| WizardError::UnsupportedOperator(operator.to_string()))?;
    Ok(comparison(op, reference_id, threshold))
}

/// Build a comparison from an already-parsed operator.
pub fn comparison(op: ComparisonOp, reference_id: &str, threshold: f64) -> Expression {
    let left = Box::new(Expression::number_ref(reference_id));
    let right = Box::new(Expression::number(threshold));
    match op {
        ComparisonOp::Greater => Expression::Greater { left, right },
        ComparisonOp::GreaterEqual => Expression::GreaterEqual { left, right },
        ComparisonOp::Lesser => Expression::Lesser { left, right },
        ComparisonOp::LesserEqual => Expression::LesserEqual { left, right },
        ComparisonOp::Equal => Expression::Equal { left, right },
    }
}

/// Literal right-hand operand of a comparison, or `0.0` if the expression is
/// not a comparison against a number.
pub fn extract_threshold(expression: &Expression) -> f64 {
    let Some((_, _, right)) = expression.as_comparison() else {
        warn!(
            kind = expression.kind_name(),
            "Can't get threshold, expression is not a comparison"
        );
        return 0.0;
    };
    match right {
        Expression::NumberValue { value } => *value,
        other => {
            warn!(
                kind = other.kind_name(),
                "Can't get threshold, right operand is not a number"
            );
            0.0
        }
    }
}

/// User-facing token (`>`, `>=`, `<`, `<=`, `=`) of a comparison node.
pub fn operator_token(expression: &Expression) -> Option<&'static str> {
    expression.as_comparison().map(|(op, _, _)| op.token())
}

/// Series id referenced by the left operand of a comparison.
pub fn referenced_series(expression: &Expression) -> Option<&str> {
    match expression.as_comparison()? {
        (_, Expression::NumberReference { reference }, _) => Some(reference.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_then_extract_round_trips_all_operators() {
        for token in [">", ">=", "<", "<=", "="] {
            let expr = build_expression(token, "series-1", 42.5).unwrap();
            assert_eq!(extract_threshold(&expr), 42.5, "operator {token}");
            assert_eq!(operator_token(&expr), Some(token));
            assert_eq!(referenced_series(&expr), Some("series-1"));
        }
    }

    #[test]
    fn unsupported_operator_is_rejected() {
        for token in ["!=", "==", "", "gt"] {
            match build_expression(token, "s", 1.0) {
                Err(WizardError::UnsupportedOperator(t)) => assert_eq!(t, token),
                other => panic!("Expected UnsupportedOperator for {token:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_comparison_yields_zero() {
        let inner = build_expression(">", "s", 9.0).unwrap();
        let and = Expression::And {
            left: Box::new(inner.clone()),
            right: Box::new(inner.clone()),
        };
        assert_eq!(extract_threshold(&and), 0.0);
        assert_eq!(operator_token(&and), None);

        let not = Expression::Not {
            left: Box::new(inner),
        };
        assert_eq!(extract_threshold(&not), 0.0);
        assert_eq!(extract_threshold(&Expression::number(3.0)), 0.0);
    }

    #[test]
    fn non_literal_right_operand_yields_zero() {
        let expr = Expression::Lesser {
            left: Box::new(Expression::number_ref("a")),
            right: Box::new(Expression::number_ref("b")),
        };
        assert_eq!(extract_threshold(&expr), 0.0);
        // The operator is still readable.
        assert_eq!(operator_token(&expr), Some("<"));
    }
}
