//! Tests for schema types.

use super::*;
use serde_json::json;
use wizard_core::{keys, DefaultValues, WizardError};

const STATISTICAL_CONFIG_JSON: &str = r#"
{
  "type": "aggregation-v1",
  "query": "",
  "streams": ["S1"],
  "group_by": [],
  "series": [{"id": "series-1", "function": "AVG", "field": "bytes"}],
  "conditions": {
    "expression": {
      "expr": ">=",
      "left": {"expr": "number-ref", "ref": "series-1"},
      "right": {"expr": "number", "value": 100}
    }
  },
  "search_within_ms": 300000,
  "execute_every_ms": 60000
}
"#;

const CORRELATION_CONFIG_JSON: &str = r#"
{
  "type": "correlation-count",
  "stream": "S1",
  "threshold_type": "MORE",
  "threshold": 3,
  "additional_stream": "S2",
  "additional_threshold_type": "LESS",
  "additional_threshold": 7,
  "messages_order": "AFTER",
  "search_within_ms": 600000,
  "execute_every_ms": 120000,
  "grouping_fields": ["source", "user"],
  "comment": "Generated by the alert wizard",
  "search_query": "*"
}
"#;

#[test]
fn parse_statistical_config() {
    let config: EngineConfig = serde_json::from_str(STATISTICAL_CONFIG_JSON).unwrap();
    assert_eq!(config.type_name(), "aggregation-v1");
    let EngineConfig::Aggregation(agg) = &config else {
        panic!("Expected aggregation-v1 config");
    };
    assert_eq!(agg.series.len(), 1);
    assert_eq!(agg.series[0].function, AggregationFunction::Avg);
    assert_eq!(agg.series[0].field.as_deref(), Some("bytes"));

    let (op, left, right) = agg.expression().unwrap().as_comparison().unwrap();
    assert_eq!(op, ComparisonOp::GreaterEqual);
    assert_eq!(left, &Expression::number_ref("series-1"));
    assert_eq!(right, &Expression::number(100.0));
}

#[test]
fn parse_correlation_config() {
    let config: EngineConfig = serde_json::from_str(CORRELATION_CONFIG_JSON).unwrap();
    let EngineConfig::CorrelationCount(corr) = &config else {
        panic!("Expected correlation-count config");
    };
    assert_eq!(corr.messages_order, MessageOrder::After);
    assert_eq!(corr.additional_threshold, 7);
    assert_eq!(corr.grouping_fields.len(), 2);
    assert_eq!(config.search_within_ms(), 600_000);
    assert_eq!(config.execute_every_ms(), 120_000);
}

#[test]
fn unknown_engine_type_is_rejected() {
    let doc = json!({"type": "aggregation-v2", "stream": "S1"});
    assert!(serde_json::from_value::<EngineConfig>(doc).is_err());
}

#[test]
fn equal_uses_engine_token_on_the_wire() {
    let expr = Expression::Equal {
        left: Box::new(Expression::number_ref("a")),
        right: Box::new(Expression::number(1.0)),
    };
    let value = serde_json::to_value(&expr).unwrap();
    assert_eq!(value["expr"], "==");
    assert_eq!(value["left"]["ref"], "a");
    // The user-facing token stays "=".
    assert_eq!(expr.as_comparison().unwrap().0.token(), "=");
}

#[test]
fn comparison_tokens_parse() {
    for op in ComparisonOp::ALL {
        assert_eq!(op.token().parse::<ComparisonOp>().unwrap(), op);
    }
    assert!("==".parse::<ComparisonOp>().is_err());
    assert!("!=".parse::<ComparisonOp>().is_err());
}

#[test]
fn condition_kind_from_tag() {
    assert_eq!(ConditionKind::from_tag("STATISTICAL"), ConditionKind::Statistical);
    assert_eq!(
        ConditionKind::from_tag("THEN"),
        ConditionKind::Correlation(MessageOrder::After)
    );
    assert_eq!(
        ConditionKind::from_tag("AND"),
        ConditionKind::Correlation(MessageOrder::Any)
    );
    assert_eq!(ConditionKind::from_tag("COUNT"), ConditionKind::Aggregation);
    assert_eq!(ConditionKind::from_tag(""), ConditionKind::Aggregation);
    assert_eq!(ConditionKind::from_tag("then"), ConditionKind::Aggregation);
}

#[test]
fn stream_rule_type_codes() {
    let rule: StreamRule = serde_json::from_value(json!({
        "id": "r1", "field": "source", "type": 6, "value": "fw", "inverted": true
    }))
    .unwrap();
    assert_eq!(rule.rule_type, StreamRuleType::Contains);

    let field_rule = FieldRule::from(&rule);
    assert_eq!(field_rule.rule_type, -6);
    assert_eq!(field_rule.id.as_deref(), Some("r1"));

    let bad = json!({"id": "r2", "field": "x", "type": 42});
    assert!(serde_json::from_value::<StreamRule>(bad).is_err());
}

#[test]
fn severity_parses_case_insensitively() {
    assert_eq!("high".parse::<SeverityType>().unwrap(), SeverityType::High);
    assert_eq!("INFO".parse::<SeverityType>().unwrap(), SeverityType::Info);
    assert!("critical".parse::<SeverityType>().is_err());
    assert_eq!(serde_json::to_value(SeverityType::Medium).unwrap(), "MEDIUM");
}

#[test]
fn second_stream_ignores_empty_id() {
    let mut rule: AlertRule = serde_json::from_value(json!({
        "title": "r",
        "stream_id": "S1",
        "event_id": "e1",
        "notification_id": "n1",
        "created_at": "2024-01-01T00:00:00Z",
        "last_modified": "2024-01-02T00:00:00Z",
        "condition_type": "COUNT",
        "second_stream_id": ""
    }))
    .unwrap();
    assert_eq!(rule.second_stream(), None);
    rule.second_stream_id = Some("S2".to_string());
    assert_eq!(rule.second_stream(), Some("S2"));
}

#[test]
fn defaults_fill_only_missing_keys() {
    let mut params = ParameterMap::new();
    params.insert(keys::THRESHOLD.to_string(), json!(10));
    params.insert(keys::TIME.to_string(), serde_json::Value::Null);

    let defaults = DefaultValues::default();
    let filled = with_defaults(&params, ConditionKind::Aggregation, &defaults);
    assert_eq!(filled[keys::THRESHOLD], json!(10));
    assert_eq!(filled[keys::TIME], json!(defaults.time));
    assert_eq!(filled[keys::THRESHOLD_TYPE], json!(">"));
    assert_eq!(filled[keys::DISTINCTION_FIELDS], json!([]));
    assert!(!filled.contains_key(keys::ADDITIONAL_THRESHOLD));

    let filled = with_defaults(
        &params,
        ConditionKind::Correlation(MessageOrder::Any),
        &defaults,
    );
    assert_eq!(filled[keys::ADDITIONAL_THRESHOLD], json!(defaults.threshold));
    assert!(!filled.contains_key(keys::DISTINCTION_FIELDS));
}

#[test]
fn malformed_parameter_is_invalid_request() {
    let mut params = ParameterMap::new();
    params.insert(keys::THRESHOLD.to_string(), json!("ten"));
    params.insert(keys::THRESHOLD_TYPE.to_string(), json!(">"));
    params.insert(keys::TIME.to_string(), json!(5));
    params.insert(keys::GRACE.to_string(), json!(1));

    let err = decode_params::<AggregationParams>(&params, "aggregation").unwrap_err();
    match err {
        WizardError::InvalidRequest(msg) => assert!(msg.starts_with("aggregation parameters")),
        other => panic!("Expected InvalidRequest, got {other:?}"),
    }
}
