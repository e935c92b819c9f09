//! Logging notification configuration and its stored definition.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Severity attached to the log line emitted for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityType {
    Info,
    Low,
    Medium,
    High,
}

impl SeverityType {
    /// Lowercase name shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityType::Info => "info",
            SeverityType::Low => "low",
            SeverityType::Medium => "medium",
            SeverityType::High => "high",
        }
    }
}

impl fmt::Display for SeverityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityType {
    type Err = String;

    /// Case-insensitive, so both the user form (`high`) and the engine form
    /// (`HIGH`) parse.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(SeverityType::Info),
            "low" => Ok(SeverityType::Low),
            "medium" => Ok(SeverityType::Medium),
            "high" => Ok(SeverityType::High),
            _ => Err(format!("unknown severity: '{}'", s)),
        }
    }
}

/// Configuration of a notification that writes alerts to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingNotificationConfig {
    pub severity: SeverityType,
    pub log_body: String,
    #[serde(default)]
    pub split_fields: BTreeSet<String>,
    #[serde(default)]
    pub aggregation_stream: Option<String>,
    /// Minutes during which alerts of the same rule share one identifier.
    #[serde(default)]
    pub aggregation_time: u32,
    #[serde(default)]
    pub limit_overflow: u32,
    #[serde(default)]
    pub field_alert_id: Option<String>,
    pub alert_tag: String,
    #[serde(default)]
    pub overflow_tag: Option<String>,
    #[serde(default)]
    pub single_message: bool,
}

/// A stored notification: configuration plus title and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDefinition {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub config: LoggingNotificationConfig,
}
