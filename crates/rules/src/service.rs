//! Rule assembly: joins the codec and factory with the collaborator stores.
//!
//! Read side: [`RuleAssemblyService::assemble_view`] builds the user-facing
//! [`RuleView`] of a stored rule. Write side: conditions and notifications
//! are created or updated from an [`AlertRuleRequest`], either one at a time
//! or together through [`RuleAssemblyService::apply_request`].
//!
//! All collaborator calls within one operation are sequential.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use wizard_core::{keys, Result, WizardError, WizardSettings};

use crate::codec::{decode_condition, decode_notification, field_rules_from_stream_rules};
use crate::factory::ConditionFactory;
use crate::schema::{
    decode_params, AlertRule, AlertRuleRequest, AlertRuleStream, EngineConfig, EventDefinition,
    EventNotificationSettings, FieldRule, LoggingNotificationConfig, NotificationDefinition,
    NotificationHandlerConfig, NotificationParams, ParameterMap, RuleView, SeverityType, Stream,
};
use crate::store::{
    AlertHistoryStore, ConditionDefinitionStore, NotificationDefinitionStore, RuleStore,
    StreamStore,
};

/// Handles to every external collaborator the service talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub rules: Arc<dyn RuleStore>,
    pub streams: Arc<dyn StreamStore>,
    pub alerts: Arc<dyn AlertHistoryStore>,
    pub conditions: Arc<dyn ConditionDefinitionStore>,
    pub notifications: Arc<dyn NotificationDefinitionStore>,
}

/// Ids of the definitions backing one alert rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionIds {
    pub condition_id: String,
    pub notification_id: String,
}

pub struct RuleAssemblyService {
    stores: Collaborators,
    factory: ConditionFactory,
}

impl RuleAssemblyService {
    pub fn new(stores: Collaborators, factory: ConditionFactory) -> Self {
        Self { stores, factory }
    }

    fn settings(&self) -> &WizardSettings {
        self.factory.settings()
    }

    /// Reject requests the rule store does not accept.
    pub fn validate_request(&self, request: &AlertRuleRequest) -> Result<()> {
        if !self.stores.rules.is_valid_request(request) {
            error!(title = %request.title, "Invalid alert rule request");
            return Err(WizardError::InvalidRequest(
                "Invalid alert rule request.".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of alerts raised on a stream since `since`, capped at the
    /// configured history limit.
    pub fn count_alerts_since(&self, stream_id: &str, since: DateTime<Utc>) -> Result<usize> {
        let alerts = self.stores.alerts.load_recent(
            stream_id,
            since,
            self.settings().alert_history_limit,
        )?;
        Ok(alerts.len())
    }

    // ── Read side ───────────────────────────────────────────────────

    /// Build the user-facing view of a stored rule.
    ///
    /// The second stream is only loaded when the rule names one; if it
    /// cannot be loaded the whole view fails with `NotFound`.
    pub fn assemble_view(&self, rule: &AlertRule) -> Result<RuleView> {
        let stream = self.stores.streams.load(&rule.stream_id)?;

        let event = self.stores.conditions.get(&rule.event_id)?;
        debug!(
            title = %rule.title,
            event_type = event.config.type_name(),
            "Assembling rule view"
        );
        let condition_parameters = decode_condition(&event.config);

        let primary = alert_rule_stream(&stream, rule.pipeline_field_rules.as_deref());

        let second_stream = match rule.second_stream() {
            Some(id) => {
                let stream2 = self.stores.streams.load(id)?;
                Some(alert_rule_stream(
                    &stream2,
                    rule.second_pipeline_field_rules.as_deref(),
                ))
            }
            None => None,
        };

        let notification = self.stores.notifications.get(&rule.notification_id)?;
        let severity = decode_notification(&notification.config)
            .get(keys::SEVERITY)
            .and_then(|v| v.as_str())
            .map(str::to_string);
        debug!(severity = ?severity, "Notification decoded");

        let alert_count = self.count_alerts_since(&rule.stream_id, rule.last_modified)?;

        Ok(RuleView {
            title: rule.title.clone(),
            title_condition: event.title,
            severity,
            condition: Some(rule.event_id.clone()),
            notification: Some(rule.notification_id.clone()),
            created_at: Some(rule.created_at),
            creator_user_id: rule.creator_user_id.clone(),
            last_modified: Some(rule.last_modified),
            disabled: stream.disabled,
            description: rule.description.clone(),
            alert_count: alert_count as u64,
            condition_type: Some(rule.condition_type.clone()),
            condition_parameters: Some(condition_parameters),
            stream: Some(primary),
            second_stream,
        })
    }

    /// Full notification parameters of a stored notification.
    pub fn notification_parameters(&self, notification_id: &str) -> Result<ParameterMap> {
        let notification = self.stores.notifications.get(notification_id)?;
        Ok(decode_notification(&notification.config))
    }

    // ── Conditions ──────────────────────────────────────────────────

    /// Store a new condition definition pointing at `notification_id`.
    pub fn create_condition(
        &self,
        title: &str,
        notification_id: &str,
        config: EngineConfig,
    ) -> Result<String> {
        info!(title, "Create condition definition");
        let settings = self.settings();
        let definition = EventDefinition {
            id: None,
            title: title.to_string(),
            description: settings.comment.clone(),
            priority: settings.event_priority,
            alert: true,
            config,
            field_spec: Default::default(),
            key_spec: Vec::new(),
            notification_settings: EventNotificationSettings {
                grace_period_ms: settings.notification_grace_ms,
                backlog_size: settings.notification_backlog,
            },
            notifications: vec![NotificationHandlerConfig {
                notification_id: notification_id.to_string(),
            }],
        };
        self.stores.conditions.create(definition)
    }

    /// Replace the title and configuration of a stored condition, keeping
    /// everything else.
    pub fn update_condition(&self, title: &str, condition_id: &str, config: EngineConfig) -> Result<()> {
        let existing = self.stores.conditions.get(condition_id)?;
        self.replace_condition(title, condition_id, existing, config)
    }

    fn replace_condition(
        &self,
        title: &str,
        condition_id: &str,
        existing: EventDefinition,
        config: EngineConfig,
    ) -> Result<()> {
        info!(title, condition_id, "Update condition definition");
        let definition = EventDefinition {
            id: Some(condition_id.to_string()),
            title: title.to_string(),
            config,
            ..existing
        };
        self.stores.conditions.update(definition)
    }

    /// Engine condition for `request`. Touches no store.
    pub fn build_condition(&self, request: &AlertRuleRequest) -> Result<EngineConfig> {
        self.factory.dispatch(
            &request.condition_type,
            &request.condition_parameters,
            &request.stream.id,
            request.second_stream.as_ref().map(|s| s.id.as_str()),
        )
    }

    /// Build the engine condition for `request` and create it, or update
    /// `condition_id` when given.
    pub fn create_or_update_condition(
        &self,
        request: &AlertRuleRequest,
        condition_id: Option<&str>,
        notification_id: &str,
    ) -> Result<String> {
        let config = self.build_condition(request)?;
        match condition_id {
            Some(id) => {
                self.update_condition(&request.title, id, config)?;
                Ok(id.to_string())
            }
            None => self.create_condition(&request.title, notification_id, config),
        }
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Store a logging notification with default formatting.
    pub fn create_notification(&self, title: &str, severity: &str) -> Result<String> {
        let settings = self.settings();
        let config = LoggingNotificationConfig {
            severity: parse_severity(severity)?,
            log_body: settings.default_log_body.clone(),
            split_fields: Default::default(),
            aggregation_stream: None,
            aggregation_time: 0,
            limit_overflow: 0,
            field_alert_id: None,
            alert_tag: settings.default_alert_tag.clone(),
            overflow_tag: None,
            single_message: false,
        };
        self.store_notification(title, config)
    }

    /// Store a logging notification from simplified notification parameters.
    pub fn create_notification_from_parameters(
        &self,
        title: &str,
        params: &ParameterMap,
    ) -> Result<String> {
        let p: NotificationParams = decode_params(params, "notification")?;
        let config = LoggingNotificationConfig {
            severity: parse_severity(&p.severity)?,
            log_body: p.log_body,
            split_fields: p.split_fields,
            aggregation_stream: None,
            aggregation_time: p.aggregation_time,
            limit_overflow: 0,
            field_alert_id: None,
            alert_tag: p
                .alert_tag
                .unwrap_or_else(|| self.settings().default_alert_tag.clone()),
            overflow_tag: None,
            single_message: p.single_notification,
        };
        self.store_notification(title, config)
    }

    fn store_notification(&self, title: &str, config: LoggingNotificationConfig) -> Result<String> {
        info!(title, severity = %config.severity, "Create notification definition");
        self.stores.notifications.create(NotificationDefinition {
            id: None,
            title: title.to_string(),
            description: self.settings().comment.clone(),
            config,
        })
    }

    /// Update title and severity of a stored notification.
    ///
    /// Nothing is written when both are unchanged. Returns whether an update
    /// was issued.
    pub fn update_notification(
        &self,
        title: &str,
        notification_id: &str,
        severity: &str,
    ) -> Result<bool> {
        let severity = parse_severity(severity)?;
        let mut notification = self.stores.notifications.get(notification_id)?;

        let old_severity = notification.config.severity;
        if old_severity == severity && notification.title == title {
            debug!(notification_id, "Notification unchanged");
            return Ok(false);
        }

        if old_severity != severity {
            info!(
                notification_id,
                old = %old_severity,
                new = %severity,
                "Update notification severity"
            );
        }
        notification.id = Some(notification_id.to_string());
        notification.title = title.to_string();
        notification.config.severity = severity;
        self.stores.notifications.update(notification)?;
        Ok(true)
    }

    pub fn create_or_update_notification(
        &self,
        request: &AlertRuleRequest,
        notification_id: Option<&str>,
    ) -> Result<String> {
        match notification_id {
            Some(id) => {
                self.update_notification(&request.title, id, &request.severity)?;
                Ok(id.to_string())
            }
            None => self.create_notification(&request.title, &request.severity),
        }
    }

    /// Validate `request` and write its notification and condition.
    ///
    /// With `existing`, both definitions of that rule are updated in place;
    /// otherwise new ones are created, notification first so the condition
    /// can reference it. The condition is built, the severity parsed and the
    /// existing condition loaded before anything is written, so a rejected
    /// request leaves both stores untouched.
    pub fn apply_request(
        &self,
        request: &AlertRuleRequest,
        existing: Option<&AlertRule>,
    ) -> Result<DefinitionIds> {
        self.validate_request(request)?;
        parse_severity(&request.severity)?;
        let config = self.build_condition(request)?;
        let stored_condition = match existing {
            Some(rule) => Some((
                rule.event_id.as_str(),
                self.stores.conditions.get(&rule.event_id)?,
            )),
            None => None,
        };

        let notification_id = self.create_or_update_notification(
            request,
            existing.map(|r| r.notification_id.as_str()),
        )?;
        let condition_id = match stored_condition {
            Some((id, definition)) => {
                self.replace_condition(&request.title, id, definition, config)?;
                id.to_string()
            }
            None => self.create_condition(&request.title, &notification_id, config)?,
        };
        Ok(DefinitionIds {
            condition_id,
            notification_id,
        })
    }
}

fn parse_severity(severity: &str) -> Result<SeverityType> {
    severity.parse().map_err(WizardError::InvalidRequest)
}

/// Stream view with the rule's own field rules first, then the stream's.
fn alert_rule_stream(stream: &Stream, attached: Option<&[FieldRule]>) -> AlertRuleStream {
    let mut field_rule: Vec<FieldRule> = attached.map(<[FieldRule]>::to_vec).unwrap_or_default();
    field_rule.extend(field_rules_from_stream_rules(&stream.rules));
    AlertRuleStream {
        id: stream.id.clone(),
        matching_type: stream.matching_type,
        field_rule,
    }
}
