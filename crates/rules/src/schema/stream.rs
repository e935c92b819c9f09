//! Streams, their matching rules, and the field rules shown to users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a stream combines its matching rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchingType {
    /// A message must match all rules.
    And,
    /// A message must match at least one rule.
    Or,
}

impl fmt::Display for MatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingType::And => write!(f, "AND"),
            MatchingType::Or => write!(f, "OR"),
        }
    }
}

/// Kind of a stream matching rule, serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum StreamRuleType {
    Exact,
    Regex,
    Greater,
    Smaller,
    Presence,
    Contains,
    AlwaysMatch,
    MatchInput,
}

impl StreamRuleType {
    pub fn code(self) -> i32 {
        match self {
            StreamRuleType::Exact => 1,
            StreamRuleType::Regex => 2,
            StreamRuleType::Greater => 3,
            StreamRuleType::Smaller => 4,
            StreamRuleType::Presence => 5,
            StreamRuleType::Contains => 6,
            StreamRuleType::AlwaysMatch => 7,
            StreamRuleType::MatchInput => 8,
        }
    }
}

impl TryFrom<i32> for StreamRuleType {
    type Error = String;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        match code {
            1 => Ok(StreamRuleType::Exact),
            2 => Ok(StreamRuleType::Regex),
            3 => Ok(StreamRuleType::Greater),
            4 => Ok(StreamRuleType::Smaller),
            5 => Ok(StreamRuleType::Presence),
            6 => Ok(StreamRuleType::Contains),
            7 => Ok(StreamRuleType::AlwaysMatch),
            8 => Ok(StreamRuleType::MatchInput),
            other => Err(format!("unknown stream rule type: {}", other)),
        }
    }
}

impl From<StreamRuleType> for i32 {
    fn from(t: StreamRuleType) -> Self {
        t.code()
    }
}

/// A persisted stream matching rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRule {
    pub id: String,
    pub field: String,
    #[serde(rename = "type")]
    pub rule_type: StreamRuleType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub inverted: bool,
}

/// A stream as returned by the stream store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub matching_type: MatchingType,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub rules: Vec<StreamRule>,
}

/// User-facing matching predicate. A negative `rule_type` is the inverted
/// form of the positive stream rule type code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(default)]
    pub id: Option<String>,
    pub field: String,
    #[serde(rename = "type")]
    pub rule_type: i32,
    #[serde(default)]
    pub value: String,
}

impl From<&StreamRule> for FieldRule {
    fn from(rule: &StreamRule) -> Self {
        let code = rule.rule_type.code();
        FieldRule {
            id: Some(rule.id.clone()),
            field: rule.field.clone(),
            rule_type: if rule.inverted { -code } else { code },
            value: rule.value.clone(),
        }
    }
}

/// A stream as seen from an alert rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRuleStream {
    pub id: String,
    pub matching_type: MatchingType,
    #[serde(default)]
    pub field_rule: Vec<FieldRule>,
}

/// One alert raised on a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub stream_id: String,
    #[serde(default)]
    pub condition_id: Option<String>,
    pub triggered_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}
