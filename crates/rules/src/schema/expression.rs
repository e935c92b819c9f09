//! Engine expression language used by statistical conditions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A node of the engine's boolean/number expression tree.
///
/// Serialized in the engine's wire format, e.g.
/// `{"expr": ">", "left": {"expr": "number-ref", "ref": "…"}, "right": {"expr": "number", "value": 100.0}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr")]
pub enum Expression {
    #[serde(rename = ">")]
    Greater {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = ">=")]
    GreaterEqual {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "<")]
    Lesser {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "<=")]
    LesserEqual {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "==")]
    Equal {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "&&")]
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "||")]
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "!")]
    Not { left: Box<Expression> },
    #[serde(rename = "number-ref")]
    NumberReference {
        #[serde(rename = "ref")]
        reference: String,
    },
    #[serde(rename = "number")]
    NumberValue { value: f64 },
}

impl Expression {
    pub fn number_ref(reference: impl Into<String>) -> Self {
        Expression::NumberReference {
            reference: reference.into(),
        }
    }

    pub fn number(value: f64) -> Self {
        Expression::NumberValue { value }
    }

    /// The comparison operator and operands, if this node is a comparison.
    pub fn as_comparison(&self) -> Option<(ComparisonOp, &Expression, &Expression)> {
        match self {
            Expression::Greater { left, right } => Some((ComparisonOp::Greater, left, right)),
            Expression::GreaterEqual { left, right } => {
                Some((ComparisonOp::GreaterEqual, left, right))
            }
            Expression::Lesser { left, right } => Some((ComparisonOp::Lesser, left, right)),
            Expression::LesserEqual { left, right } => {
                Some((ComparisonOp::LesserEqual, left, right))
            }
            Expression::Equal { left, right } => Some((ComparisonOp::Equal, left, right)),
            _ => None,
        }
    }

    /// Short name of the node kind, for log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Greater { .. } => "greater",
            Expression::GreaterEqual { .. } => "greater_equal",
            Expression::Lesser { .. } => "lesser",
            Expression::LesserEqual { .. } => "lesser_equal",
            Expression::Equal { .. } => "equal",
            Expression::And { .. } => "and",
            Expression::Or { .. } => "or",
            Expression::Not { .. } => "not",
            Expression::NumberReference { .. } => "number_ref",
            Expression::NumberValue { .. } => "number",
        }
    }
}

/// The five comparisons a wizard threshold can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
    Equal,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 5] = [
        ComparisonOp::Greater,
        ComparisonOp::GreaterEqual,
        ComparisonOp::Lesser,
        ComparisonOp::LesserEqual,
        ComparisonOp::Equal,
    ];

    /// User-facing token (`threshold_type` value).
    pub fn token(&self) -> &'static str {
        match self {
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterEqual => ">=",
            ComparisonOp::Lesser => "<",
            ComparisonOp::LesserEqual => "<=",
            ComparisonOp::Equal => "=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ComparisonOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ">" => Ok(ComparisonOp::Greater),
            ">=" => Ok(ComparisonOp::GreaterEqual),
            "<" => Ok(ComparisonOp::Lesser),
            "<=" => Ok(ComparisonOp::LesserEqual),
            "=" => Ok(ComparisonOp::Equal),
            other => Err(format!("unknown comparison operator: '{}'", other)),
        }
    }
}
