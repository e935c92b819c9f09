//! Simplified parameter map and its typed, validated views.
//!
//! The map itself is the wire form exchanged with the user-facing layer
//! (keys in [`wizard_core::keys`]). Before building engine objects it is
//! decoded into one of the structs below so that a malformed value surfaces
//! as a single [`WizardError::InvalidRequest`] naming the key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use wizard_core::{keys, DefaultValues, Result, WizardError};

use super::ConditionKind;

/// Simplified parameters keyed by the fixed vocabulary.
pub type ParameterMap = BTreeMap<String, Value>;

/// Parameters of a single-stream count condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationParams {
    pub threshold: i64,
    pub threshold_type: String,
    /// Minutes.
    pub time: u64,
    /// Minutes.
    pub grace: u64,
    #[serde(default)]
    pub grouping_fields: BTreeSet<String>,
    #[serde(default)]
    pub distinction_fields: BTreeSet<String>,
}

/// Parameters of a two-stream correlation condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationParams {
    pub threshold: i64,
    pub threshold_type: String,
    pub additional_threshold: i64,
    pub additional_threshold_type: String,
    pub time: u64,
    pub grace: u64,
    #[serde(default)]
    pub grouping_fields: BTreeSet<String>,
}

/// Parameters of a statistical condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalParams {
    /// Function name (`MEAN`, `MIN`, `MAX`, `SUM`, `STDDEV`).
    #[serde(rename = "type")]
    pub function: String,
    pub field: String,
    pub threshold: f64,
    pub threshold_type: String,
    pub time: u64,
    pub grace: u64,
}

/// Parameters of a logging notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationParams {
    pub severity: String,
    pub log_body: String,
    #[serde(default)]
    pub split_fields: BTreeSet<String>,
    #[serde(default)]
    pub aggregation_time: u32,
    #[serde(default)]
    pub alert_tag: Option<String>,
    #[serde(default)]
    pub single_notification: bool,
}

/// Decode a parameter map into a typed view.
pub fn decode_params<T: DeserializeOwned>(params: &ParameterMap, what: &str) -> Result<T> {
    let value = serde_json::to_value(params)?;
    serde_json::from_value(value)
        .map_err(|e| WizardError::InvalidRequest(format!("{} parameters: {}", what, e)))
}

/// Copy of `params` with absent (or null) keys filled from `defaults`.
///
/// Only keys meaningful for `kind` are filled. Keys without a configured
/// default (e.g. a statistical `type`) stay absent and fail typed decoding.
pub fn with_defaults(
    params: &ParameterMap,
    kind: ConditionKind,
    defaults: &DefaultValues,
) -> ParameterMap {
    let mut filled = params.clone();
    let mut fill = |key: &str, value: Value| {
        let slot = filled.entry(key.to_string()).or_insert(Value::Null);
        if slot.is_null() {
            *slot = value;
        }
    };

    fill(keys::THRESHOLD_TYPE, Value::from(defaults.threshold_type.clone()));
    fill(keys::THRESHOLD, Value::from(defaults.threshold));
    fill(keys::TIME, Value::from(defaults.time));
    fill(keys::GRACE, Value::from(defaults.grace));

    match kind {
        ConditionKind::Aggregation => {
            fill(keys::GROUPING_FIELDS, Value::Array(Vec::new()));
            fill(keys::DISTINCTION_FIELDS, Value::Array(Vec::new()));
        }
        ConditionKind::Correlation(_) => {
            fill(
                keys::ADDITIONAL_THRESHOLD_TYPE,
                Value::from(defaults.threshold_type.clone()),
            );
            fill(keys::ADDITIONAL_THRESHOLD, Value::from(defaults.threshold));
            fill(keys::GROUPING_FIELDS, Value::Array(Vec::new()));
        }
        ConditionKind::Statistical => {
            if let Some(field) = &defaults.field {
                fill(keys::FIELD, Value::from(field.clone()));
            }
        }
    }

    filled.retain(|_, v| !v.is_null());
    filled
}
