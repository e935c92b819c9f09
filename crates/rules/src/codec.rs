//! Read direction: engine objects to simplified parameters.
//!
//! Every function here is pure. Durations are stored by the engine in
//! milliseconds and shown to users in whole minutes (integer division).
//! Unreadable parts of a statistical expression degrade to a zero threshold
//! with a warning instead of failing the whole decode.

use serde_json::{json, Value};
use tracing::warn;

use wizard_core::{keys, Result, WizardError};

use crate::expression::{extract_threshold, operator_token, referenced_series};
use crate::schema::{
    AggregationCountConfig, AggregationEventConfig, AggregationSeries, ConditionKind,
    CorrelationCountConfig, EngineConfig, FieldRule, LoggingNotificationConfig, ParameterMap,
    StatisticalFunction, StreamRule,
};

pub const MS_PER_MINUTE: u64 = 60_000;

pub fn ms_to_minutes(ms: u64) -> u64 {
    ms / MS_PER_MINUTE
}

pub fn minutes_to_ms(minutes: u64) -> u64 {
    minutes.saturating_mul(MS_PER_MINUTE)
}

/// Severities accepted for logging notifications. Case-sensitive.
pub const VALID_SEVERITIES: &[&str] = &["info", "low", "medium", "high"];

pub fn is_valid_severity(severity: &str) -> bool {
    VALID_SEVERITIES.contains(&severity)
}

/// Map a user-facing condition tag to the engine's condition type tag.
pub fn engine_tag_for(condition_type: &str) -> &'static str {
    ConditionKind::from_tag(condition_type).engine_tag()
}

// ── Conditions ──────────────────────────────────────────────────────

/// Decode any engine condition configuration.
pub fn decode_condition(config: &EngineConfig) -> ParameterMap {
    match config {
        EngineConfig::AggregationCount(c) => decode_aggregation_count(c),
        EngineConfig::CorrelationCount(c) => decode_correlation_count(c),
        EngineConfig::Aggregation(c) => decode_statistical(c),
    }
}

pub fn decode_aggregation_count(config: &AggregationCountConfig) -> ParameterMap {
    let mut params = ParameterMap::new();
    params.insert(keys::THRESHOLD.into(), json!(config.threshold));
    params.insert(keys::THRESHOLD_TYPE.into(), json!(config.threshold_type));
    params.insert(keys::TIME.into(), json!(ms_to_minutes(config.search_within_ms)));
    params.insert(keys::GRACE.into(), json!(ms_to_minutes(config.execute_every_ms)));
    params.insert(keys::GROUPING_FIELDS.into(), json!(config.grouping_fields));
    params.insert(keys::DISTINCTION_FIELDS.into(), json!(config.distinction_fields));
    params
}

pub fn decode_correlation_count(config: &CorrelationCountConfig) -> ParameterMap {
    let mut params = ParameterMap::new();
    params.insert(keys::THRESHOLD.into(), json!(config.threshold));
    params.insert(keys::THRESHOLD_TYPE.into(), json!(config.threshold_type));
    params.insert(
        keys::ADDITIONAL_THRESHOLD.into(),
        json!(config.additional_threshold),
    );
    params.insert(
        keys::ADDITIONAL_THRESHOLD_TYPE.into(),
        json!(config.additional_threshold_type),
    );
    params.insert(keys::TIME.into(), json!(ms_to_minutes(config.search_within_ms)));
    params.insert(keys::GRACE.into(), json!(ms_to_minutes(config.execute_every_ms)));
    params.insert(keys::GROUPING_FIELDS.into(), json!(config.grouping_fields));
    params
}

/// The threshold always reads back as a JSON float: the engine keeps number
/// literals as `f64`, so a threshold written as `100` decodes to `100.0`.
/// Compare it numerically.
pub fn decode_statistical(config: &AggregationEventConfig) -> ParameterMap {
    let mut params = ParameterMap::new();
    params.insert(keys::TIME.into(), json!(ms_to_minutes(config.search_within_ms)));
    params.insert(keys::GRACE.into(), json!(ms_to_minutes(config.execute_every_ms)));

    let expression = config.expression();
    match expression {
        Some(expr) => {
            params.insert(keys::THRESHOLD.into(), json!(extract_threshold(expr)));
            if let Some(token) = operator_token(expr) {
                params.insert(keys::THRESHOLD_TYPE.into(), json!(token));
            }
        }
        None => {
            warn!("Statistical condition has no expression, reporting threshold 0");
            params.insert(keys::THRESHOLD.into(), json!(0.0));
        }
    }

    match pick_series(config, expression.and_then(referenced_series)) {
        Some(series) => {
            params.insert(
                keys::TYPE.into(),
                json!(StatisticalFunction::display_name(series.function)),
            );
            if let Some(field) = &series.field {
                params.insert(keys::FIELD.into(), json!(field));
            }
        }
        None => warn!("Statistical condition has no aggregation series"),
    }

    params
}

/// The series referenced by the expression, falling back to the first one.
fn pick_series<'a>(
    config: &'a AggregationEventConfig,
    reference: Option<&str>,
) -> Option<&'a AggregationSeries> {
    reference
        .and_then(|id| config.series.iter().find(|s| s.id == id))
        .or_else(|| config.series.first())
}

/// Parse a foreign JSON document as an engine condition configuration.
pub fn parse_engine_config(value: Value) -> Result<EngineConfig> {
    serde_json::from_value(value).map_err(|e| WizardError::DecodeAnomaly(e.to_string()))
}

// ── Notifications ───────────────────────────────────────────────────

pub fn decode_notification(config: &LoggingNotificationConfig) -> ParameterMap {
    let mut params = ParameterMap::new();
    params.insert(keys::SEVERITY.into(), json!(config.severity.as_str()));
    params.insert(keys::LOG_BODY.into(), json!(config.log_body));
    params.insert(keys::SPLIT_FIELDS.into(), json!(config.split_fields));
    params.insert(keys::AGGREGATION_TIME.into(), json!(config.aggregation_time));
    params.insert(keys::ALERT_TAG.into(), json!(config.alert_tag));
    params.insert(keys::SINGLE_NOTIFICATION.into(), json!(config.single_message));
    params
}

// ── Streams ─────────────────────────────────────────────────────────

/// Field rules for a stream's matching rules. Inverted rules get a negated
/// type code.
pub fn field_rules_from_stream_rules(rules: &[StreamRule]) -> Vec<FieldRule> {
    rules.iter().map(FieldRule::from).collect()
}
