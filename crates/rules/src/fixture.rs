//! File-backed snapshot of collaborator state.
//!
//! A fixture is one YAML (or JSON) document listing streams, condition and
//! notification definitions, alert history and alert rules. Loading it fills
//! the in-memory stores so a [`RuleAssemblyService`] can be run offline.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use wizard_core::{Result, WizardError};

use crate::factory::ConditionFactory;
use crate::memory::{
    MemoryAlertHistory, MemoryConditionStore, MemoryNotificationStore, MemoryRuleStore,
    MemoryStreamStore,
};
use crate::schema::{AlertRecord, AlertRule, EventDefinition, NotificationDefinition, Stream};
use crate::service::{Collaborators, RuleAssemblyService};
use crate::store::{ConditionDefinitionStore, NotificationDefinitionStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub streams: Vec<Stream>,
    #[serde(default)]
    pub conditions: Vec<EventDefinition>,
    #[serde(default)]
    pub notifications: Vec<NotificationDefinition>,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub rules: Vec<AlertRule>,
}

impl Fixture {
    /// Parse a fixture document. JSON is accepted as a subset of YAML.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| WizardError::Serialize(format!("invalid fixture: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let fixture = Self::parse(&content)?;
        info!(
            path = %path.display(),
            streams = fixture.streams.len(),
            rules = fixture.rules.len(),
            "Loaded fixture"
        );
        Ok(fixture)
    }

    pub fn rule(&self, title: &str) -> Result<&AlertRule> {
        self.rules
            .iter()
            .find(|r| r.title == title)
            .ok_or_else(|| WizardError::not_found("Alert rule", title))
    }

    /// Fill fresh in-memory stores and wrap them in a service.
    ///
    /// Definitions without an id get a generated one.
    pub fn into_service(&self, factory: ConditionFactory) -> Result<RuleAssemblyService> {
        let streams = Arc::new(MemoryStreamStore::new());
        for stream in &self.streams {
            streams.insert(stream.clone())?;
        }

        let conditions = Arc::new(MemoryConditionStore::new());
        for definition in &self.conditions {
            conditions.create(definition.clone())?;
        }

        let notifications = Arc::new(MemoryNotificationStore::new());
        for definition in &self.notifications {
            notifications.create(definition.clone())?;
        }

        let alerts = Arc::new(MemoryAlertHistory::new());
        for alert in &self.alerts {
            alerts.record(alert.clone())?;
        }

        Ok(RuleAssemblyService::new(
            Collaborators {
                rules: Arc::new(MemoryRuleStore),
                streams,
                alerts,
                conditions,
                notifications,
            },
            factory,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
streams:
  - id: S1
    title: Firewall
    matching_type: AND
    rules:
      - id: r1
        field: action
        type: 1
        value: deny
conditions:
  - id: E1
    title: Denied connections
    priority: 2
    alert: true
    config:
      type: aggregation-count
      stream: S1
      threshold_type: MORE
      threshold: 20
      search_within_ms: 600000
      execute_every_ms: 60000
    notification_settings:
      grace_period_ms: 0
      backlog_size: 500
notifications:
  - id: N1
    title: Denied connections
    config:
      severity: HIGH
      log_body: "type: alert"
      alert_tag: LoggingAlert
rules:
  - title: Denied connections
    stream_id: S1
    event_id: E1
    notification_id: N1
    created_at: 2024-05-01T12:00:00Z
    last_modified: 2024-05-01T12:00:00Z
    condition_type: COUNT
"#;

    #[test]
    fn fixture_assembles_view() {
        let fixture = Fixture::parse(FIXTURE).unwrap();
        let service = fixture.into_service(ConditionFactory::default()).unwrap();
        let view = service
            .assemble_view(fixture.rule("Denied connections").unwrap())
            .unwrap();
        assert_eq!(view.severity.as_deref(), Some("high"));
        assert_eq!(view.alert_count, 0);
        let params = view.condition_parameters.unwrap();
        assert_eq!(params["time"], serde_json::json!(10));
        assert_eq!(params["threshold"], serde_json::json!(20));
    }

    #[test]
    fn unknown_rule_is_not_found() {
        let fixture = Fixture::parse(FIXTURE).unwrap();
        assert!(matches!(
            fixture.rule("nope"),
            Err(WizardError::NotFound { kind: "Alert rule", .. })
        ));
    }

    #[test]
    fn fixture_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.yaml");
        fs::write(&path, FIXTURE).unwrap();
        let fixture = Fixture::load(&path).unwrap();
        assert_eq!(fixture.conditions.len(), 1);

        let missing = Fixture::load(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(WizardError::Io(_))));
    }
}
