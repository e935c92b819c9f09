//! Alert rule records, incoming requests, and the assembled rule view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertRuleStream, FieldRule, ParameterMap};

/// An alert rule as persisted by the rule store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub title: String,
    pub stream_id: String,
    /// Identifier of the condition (event) definition.
    pub event_id: String,
    pub notification_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub creator_user_id: Option<String>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    pub condition_type: String,
    #[serde(default)]
    pub second_stream_id: Option<String>,
    /// Field rules attached to the rule itself rather than to the stream.
    #[serde(default)]
    pub pipeline_field_rules: Option<Vec<FieldRule>>,
    #[serde(default)]
    pub second_pipeline_field_rules: Option<Vec<FieldRule>>,
}

impl AlertRule {
    /// The second stream id, if set and non-empty.
    pub fn second_stream(&self) -> Option<&str> {
        self.second_stream_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A create/update request coming from the user-facing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRuleRequest {
    pub title: String,
    pub severity: String,
    #[serde(default)]
    pub description: Option<String>,
    pub condition_type: String,
    #[serde(default)]
    pub condition_parameters: ParameterMap,
    pub stream: AlertRuleStream,
    #[serde(default)]
    pub second_stream: Option<AlertRuleStream>,
}

/// Everything the user-facing layer shows about one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleView {
    pub title: String,
    pub title_condition: String,
    pub severity: Option<String>,
    /// Condition definition id.
    pub condition: Option<String>,
    /// Notification definition id.
    pub notification: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub creator_user_id: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub disabled: bool,
    pub description: Option<String>,
    pub alert_count: u64,
    pub condition_type: Option<String>,
    pub condition_parameters: Option<ParameterMap>,
    pub stream: Option<AlertRuleStream>,
    pub second_stream: Option<AlertRuleStream>,
}
