//! Structural validation of alert rule requests.
//!
//! Returns a [`ValidationResult`] with errors (block save) and warnings
//! (advisory), each located by a JSON-path-like string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use wizard_core::keys;

use crate::codec::is_valid_severity;
use crate::schema::*;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"condition_parameters.threshold_type"`.
    pub path: String,
    pub message: String,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate an [`AlertRuleRequest`].
pub fn validate_request(request: &AlertRuleRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if request.title.trim().is_empty() {
        result.error("title", "Title must not be empty");
    }
    if !is_valid_severity(&request.severity) {
        result.error(
            "severity",
            format!(
                "Severity must be one of info, low, medium, high, got '{}'",
                request.severity
            ),
        );
    }

    validate_stream(&request.stream, "stream", &mut result);

    let kind = ConditionKind::from_tag(&request.condition_type);
    match (&request.second_stream, kind) {
        (Some(second), ConditionKind::Correlation(_)) => {
            validate_stream(second, "second_stream", &mut result);
        }
        (None, ConditionKind::Correlation(_)) => {
            result.error(
                "second_stream",
                format!("Condition type '{}' requires a second stream", request.condition_type),
            );
        }
        (Some(_), _) => {
            result.warn("second_stream", "Second stream is ignored for this condition type");
        }
        (None, _) => {}
    }

    validate_parameters(&request.condition_parameters, kind, &mut result);
    result
}

fn validate_stream(stream: &AlertRuleStream, path: &str, result: &mut ValidationResult) {
    if stream.id.trim().is_empty() {
        result.error(format!("{path}.id"), "Stream id must not be empty");
    }
    for (i, rule) in stream.field_rule.iter().enumerate() {
        if rule.field.trim().is_empty() {
            result.error(format!("{path}.field_rule[{i}].field"), "Field must not be empty");
        }
        let known = rule
            .rule_type
            .checked_abs()
            .is_some_and(|code| StreamRuleType::try_from(code).is_ok());
        if !known {
            result.error(
                format!("{path}.field_rule[{i}].type"),
                format!("Unknown field rule type {}", rule.rule_type),
            );
        }
    }
}

fn validate_parameters(params: &ParameterMap, kind: ConditionKind, result: &mut ValidationResult) {
    let path = |key: &str| format!("condition_parameters.{key}");

    for key in [keys::TIME, keys::GRACE] {
        if let Some(v) = params.get(key) {
            if !v.is_u64() {
                result.error(path(key), "Expected a non-negative whole number of minutes");
            }
        }
    }

    match kind {
        ConditionKind::Statistical => {
            match params.get(keys::TYPE).and_then(Value::as_str) {
                Some(name) if name.parse::<StatisticalFunction>().is_ok() => {}
                Some(name) => result.error(
                    path(keys::TYPE),
                    format!("Unknown function '{name}', expected MEAN, MIN, MAX, SUM or STDDEV"),
                ),
                None => result.error(path(keys::TYPE), "Statistical condition requires 'type'"),
            }
            if params.get(keys::FIELD).and_then(Value::as_str).is_none() {
                result.error(path(keys::FIELD), "Statistical condition requires 'field'");
            }
            if let Some(token) = params.get(keys::THRESHOLD_TYPE).and_then(Value::as_str) {
                if token.parse::<ComparisonOp>().is_err() {
                    result.error(
                        path(keys::THRESHOLD_TYPE),
                        format!("Unknown comparison '{token}', expected >, >=, <, <= or ="),
                    );
                }
            }
        }
        ConditionKind::Aggregation | ConditionKind::Correlation(_) => {
            if let Some(v) = params.get(keys::THRESHOLD) {
                if !v.is_i64() {
                    result.error(path(keys::THRESHOLD), "Expected a whole number");
                }
            }
            if !kind.is_correlation() && params.contains_key(keys::ADDITIONAL_THRESHOLD) {
                result.warn(
                    path(keys::ADDITIONAL_THRESHOLD),
                    "Additional threshold is only used by correlations",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream(id: &str) -> AlertRuleStream {
        AlertRuleStream {
            id: id.to_string(),
            matching_type: MatchingType::And,
            field_rule: vec![FieldRule {
                id: None,
                field: "source".to_string(),
                rule_type: -1,
                value: "fw".to_string(),
            }],
        }
    }

    fn request(condition_type: &str, params: serde_json::Value) -> AlertRuleRequest {
        AlertRuleRequest {
            title: "Brute force".to_string(),
            severity: "high".to_string(),
            description: None,
            condition_type: condition_type.to_string(),
            condition_parameters: serde_json::from_value(params).unwrap(),
            stream: stream("S1"),
            second_stream: None,
        }
    }

    #[test]
    fn valid_count_request() {
        let result = validate_request(&request("COUNT", json!({"threshold": 5, "time": 10})));
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn severity_and_title_checked() {
        let mut req = request("COUNT", json!({}));
        req.title = "  ".to_string();
        req.severity = "INFO".to_string();
        let result = validate_request(&req);
        assert!(!result.valid);
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["title", "severity"]);
    }

    #[test]
    fn correlation_needs_second_stream() {
        let mut req = request("THEN", json!({}));
        let result = validate_request(&req);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "second_stream");

        req.second_stream = Some(stream("S2"));
        assert!(validate_request(&req).valid);
    }

    #[test]
    fn statistical_parameters_checked() {
        let result = validate_request(&request(
            "STATISTICAL",
            json!({"type": "MEDIAN", "threshold_type": "!=", "time": -1}),
        ));
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"condition_parameters.time"));
        assert!(paths.contains(&"condition_parameters.type"));
        assert!(paths.contains(&"condition_parameters.field"));
        assert!(paths.contains(&"condition_parameters.threshold_type"));
    }

    #[test]
    fn unknown_field_rule_type_rejected() {
        let mut req = request("COUNT", json!({}));
        req.stream.field_rule[0].rule_type = 12;
        let result = validate_request(&req);
        assert_eq!(result.errors[0].path, "stream.field_rule[0].type");
    }

    #[test]
    fn ignored_second_stream_warns() {
        let mut req = request("COUNT", json!({"additional_threshold": 2}));
        req.second_stream = Some(stream("S2"));
        let result = validate_request(&req);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
    }
}
