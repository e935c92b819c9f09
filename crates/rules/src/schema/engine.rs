//! Engine-side condition configurations and the event definition wrapping them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{AggregationSeries, Expression, MessageOrder};

/// A condition configuration as stored by the engine, one variant per
/// condition family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineConfig {
    #[serde(rename = "aggregation-count")]
    AggregationCount(AggregationCountConfig),
    #[serde(rename = "correlation-count")]
    CorrelationCount(CorrelationCountConfig),
    #[serde(rename = "aggregation-v1")]
    Aggregation(AggregationEventConfig),
}

impl EngineConfig {
    /// Engine type tag written in the `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            EngineConfig::AggregationCount(_) => "aggregation-count",
            EngineConfig::CorrelationCount(_) => "correlation-count",
            EngineConfig::Aggregation(_) => "aggregation-v1",
        }
    }

    pub fn search_within_ms(&self) -> u64 {
        match self {
            EngineConfig::AggregationCount(c) => c.search_within_ms,
            EngineConfig::CorrelationCount(c) => c.search_within_ms,
            EngineConfig::Aggregation(c) => c.search_within_ms,
        }
    }

    pub fn execute_every_ms(&self) -> u64 {
        match self {
            EngineConfig::AggregationCount(c) => c.execute_every_ms,
            EngineConfig::CorrelationCount(c) => c.execute_every_ms,
            EngineConfig::Aggregation(c) => c.execute_every_ms,
        }
    }
}

/// Single-stream count of matching messages, optionally grouped and
/// counting distinct values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationCountConfig {
    pub stream: String,
    pub threshold_type: String,
    pub threshold: i64,
    pub search_within_ms: u64,
    pub execute_every_ms: u64,
    #[serde(default)]
    pub grouping_fields: BTreeSet<String>,
    #[serde(default)]
    pub distinction_fields: BTreeSet<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub search_query: String,
}

/// Two-stream count correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCountConfig {
    pub stream: String,
    pub threshold_type: String,
    pub threshold: i64,
    pub additional_stream: String,
    pub additional_threshold_type: String,
    pub additional_threshold: i64,
    pub messages_order: MessageOrder,
    pub search_within_ms: u64,
    pub execute_every_ms: u64,
    #[serde(default)]
    pub grouping_fields: BTreeSet<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub search_query: String,
}

/// Generic aggregation: numeric series evaluated by a condition expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationEventConfig {
    #[serde(default)]
    pub query: String,
    pub streams: BTreeSet<String>,
    #[serde(default)]
    pub group_by: Vec<String>,
    pub series: Vec<AggregationSeries>,
    #[serde(default)]
    pub conditions: Option<AggregationConditions>,
    pub search_within_ms: u64,
    pub execute_every_ms: u64,
}

impl AggregationEventConfig {
    pub fn expression(&self) -> Option<&Expression> {
        self.conditions.as_ref().and_then(|c| c.expression.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConditions {
    #[serde(default)]
    pub expression: Option<Expression>,
}

// ── Event definition ────────────────────────────────────────────────

/// A stored engine condition: the configuration plus the metadata the
/// engine keeps around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: u32,
    pub alert: bool,
    pub config: EngineConfig,
    #[serde(default)]
    pub field_spec: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub key_spec: Vec<String>,
    pub notification_settings: EventNotificationSettings,
    #[serde(default)]
    pub notifications: Vec<NotificationHandlerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNotificationSettings {
    pub grace_period_ms: u64,
    pub backlog_size: u32,
}

/// Reference from an event definition to a notification definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationHandlerConfig {
    pub notification_id: String,
}
