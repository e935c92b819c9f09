//! Condition kind selected by the user-facing condition tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine tag for statistical (field value) conditions.
pub const ENGINE_TAG_FIELD_VALUE: &str = "field_value";
/// Engine tag for two-stream correlation conditions.
pub const ENGINE_TAG_CORRELATION: &str = "com.airbus_cyber_security.graylog.CorrelationCount";
/// Engine tag for single-stream aggregation count conditions.
pub const ENGINE_TAG_AGGREGATION: &str = "com.airbus_cyber_security.graylog.AggregationCount";

/// Order in which the two streams of a correlation must produce events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageOrder {
    /// Events of the second stream must follow those of the first.
    After,
    Any,
}

impl fmt::Display for MessageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageOrder::After => write!(f, "AFTER"),
            MessageOrder::Any => write!(f, "ANY"),
        }
    }
}

/// The three condition families a wizard rule can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Aggregation,
    Correlation(MessageOrder),
    Statistical,
}

impl ConditionKind {
    /// Classify a user-facing condition tag. Unknown tags are aggregations.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "STATISTICAL" => ConditionKind::Statistical,
            "THEN" => ConditionKind::Correlation(MessageOrder::After),
            "AND" => ConditionKind::Correlation(MessageOrder::Any),
            _ => ConditionKind::Aggregation,
        }
    }

    /// Engine-side condition type tag for this kind.
    pub fn engine_tag(&self) -> &'static str {
        match self {
            ConditionKind::Statistical => ENGINE_TAG_FIELD_VALUE,
            ConditionKind::Correlation(_) => ENGINE_TAG_CORRELATION,
            ConditionKind::Aggregation => ENGINE_TAG_AGGREGATION,
        }
    }

    pub fn is_correlation(&self) -> bool {
        matches!(self, ConditionKind::Correlation(_))
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::Aggregation => write!(f, "AGGREGATION"),
            ConditionKind::Correlation(MessageOrder::After) => write!(f, "THEN"),
            ConditionKind::Correlation(MessageOrder::Any) => write!(f, "AND"),
            ConditionKind::Statistical => write!(f, "STATISTICAL"),
        }
    }
}
