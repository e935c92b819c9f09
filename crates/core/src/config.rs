use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub settings: WizardSettings,
    pub defaults: DefaultValues,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WIZARD_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("WIZARD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            settings: WizardSettings::from_env_profiled(p),
            defaults: DefaultValues::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  settings:  query={:?}, history_limit={}, alert_tag={}, priority={}",
            self.settings.search_query,
            self.settings.alert_history_limit,
            self.settings.default_alert_tag,
            self.settings.event_priority
        );
        tracing::info!(
            "  defaults:  threshold {} {}, time={}m, grace={}m, matching={}",
            self.defaults.threshold_type,
            self.defaults.threshold,
            self.defaults.time,
            self.defaults.grace,
            self.defaults.matching_type
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            settings: WizardSettings::default(),
            defaults: DefaultValues::default(),
        }
    }
}

// ── Settings ──────────────────────────────────────────────────

pub const COMMENT_ALERT_WIZARD: &str = "Generated by the alert wizard";
pub const DEFAULT_ALERT_TAG: &str = "LoggingAlert";
pub const DEFAULT_LOG_BODY: &str = "type: alert\n\
id: ${logging_alert.id}\n\
severity: ${logging_alert.severity}\n\
app: graylog\n\
subject: ${event_definition_title}\n\
body: ${event_definition_description}";

/// Fixed values stamped onto every engine object the wizard writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WizardSettings {
    /// Comment / description marking objects as wizard-generated.
    pub comment: String,
    /// Match-all search query for count conditions.
    pub search_query: String,
    /// Upper bound on alert records fetched when counting alerts.
    pub alert_history_limit: usize,
    pub default_alert_tag: String,
    pub default_log_body: String,
    pub event_priority: u32,
    pub notification_backlog: u32,
    pub notification_grace_ms: u64,
}

impl WizardSettings {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            comment: profiled_env_or(p, "WIZARD_COMMENT", &d.comment),
            search_query: profiled_env_or(p, "WIZARD_SEARCH_QUERY", &d.search_query),
            alert_history_limit: profiled_env_parse(
                p,
                "WIZARD_ALERT_HISTORY_LIMIT",
                d.alert_history_limit,
            ),
            default_alert_tag: profiled_env_or(p, "WIZARD_DEFAULT_ALERT_TAG", &d.default_alert_tag),
            default_log_body: profiled_env_or(p, "WIZARD_DEFAULT_LOG_BODY", &d.default_log_body),
            event_priority: profiled_env_parse(p, "WIZARD_EVENT_PRIORITY", d.event_priority),
            notification_backlog: profiled_env_parse(
                p,
                "WIZARD_NOTIFICATION_BACKLOG",
                d.notification_backlog,
            ),
            notification_grace_ms: profiled_env_parse(
                p,
                "WIZARD_NOTIFICATION_GRACE_MS",
                d.notification_grace_ms,
            ),
        }
    }
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            comment: COMMENT_ALERT_WIZARD.to_string(),
            search_query: "*".to_string(),
            alert_history_limit: 999,
            default_alert_tag: DEFAULT_ALERT_TAG.to_string(),
            default_log_body: DEFAULT_LOG_BODY.to_string(),
            event_priority: 2,
            notification_backlog: 500,
            notification_grace_ms: 0,
        }
    }
}

// ── Default values ────────────────────────────────────────────

/// Values used for parameters the user left out when creating a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultValues {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    pub matching_type: String,
    pub threshold_type: String,
    pub threshold: i64,
    /// Search window in minutes.
    pub time: u64,
    pub time_type: u32,
    #[serde(default)]
    pub field: Option<String>,
    pub field_type: i32,
    #[serde(default)]
    pub field_value: Option<String>,
    /// Grace period in minutes.
    pub grace: u64,
    pub backlog: u32,
}

impl DefaultValues {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            title: profiled_env_opt(p, "DEFAULT_TITLE"),
            severity: profiled_env_opt(p, "DEFAULT_SEVERITY").or(d.severity),
            matching_type: profiled_env_or(p, "DEFAULT_MATCHING_TYPE", &d.matching_type),
            threshold_type: profiled_env_or(p, "DEFAULT_THRESHOLD_TYPE", &d.threshold_type),
            threshold: profiled_env_parse(p, "DEFAULT_THRESHOLD", d.threshold),
            time: profiled_env_parse(p, "DEFAULT_TIME", d.time),
            time_type: profiled_env_parse(p, "DEFAULT_TIME_TYPE", d.time_type),
            field: profiled_env_opt(p, "DEFAULT_FIELD"),
            field_type: profiled_env_parse(p, "DEFAULT_FIELD_TYPE", d.field_type),
            field_value: profiled_env_opt(p, "DEFAULT_FIELD_VALUE"),
            grace: profiled_env_parse(p, "DEFAULT_GRACE", d.grace),
            backlog: profiled_env_parse(p, "DEFAULT_BACKLOG", d.backlog),
        }
    }
}

impl Default for DefaultValues {
    fn default() -> Self {
        Self {
            title: None,
            severity: Some("info".to_string()),
            matching_type: "AND".to_string(),
            threshold_type: ">".to_string(),
            threshold: 0,
            time: 1,
            time_type: 1,
            field: None,
            field_type: 1,
            field_value: None,
            grace: 1,
            backlog: 500,
        }
    }
}
