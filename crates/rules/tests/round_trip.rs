//! Encode then decode through the public API: parameters built by the
//! factory come back unchanged from the codec.

use serde_json::json;

use wizard_core::{DefaultValues, WizardSettings};
use wizard_rules::codec::{decode_condition, parse_engine_config};
use wizard_rules::schema::{AggregationFunction, EngineConfig, ParameterMap};
use wizard_rules::ConditionFactory;

fn params(value: serde_json::Value) -> ParameterMap {
    serde_json::from_value(value).unwrap()
}

fn factory() -> ConditionFactory {
    ConditionFactory::new(WizardSettings::default(), DefaultValues::default())
}

/// Encode, push through the engine's JSON form, and decode again.
fn round_trip(kind: &str, input: &ParameterMap, stream2: Option<&str>) -> ParameterMap {
    let config = factory().dispatch(kind, input, "S1", stream2).unwrap();
    let stored = serde_json::to_value(&config).unwrap();
    let reloaded = parse_engine_config(stored).unwrap();
    assert_eq!(reloaded, config);
    decode_condition(&reloaded)
}

#[test]
fn count_round_trip() {
    let input = params(json!({
        "threshold": 3,
        "threshold_type": "MORE",
        "time": 5,
        "grace": 2,
        "grouping_fields": ["user"],
        "distinction_fields": []
    }));
    assert_eq!(round_trip("COUNT", &input, None), input);
}

#[test]
fn group_distinct_round_trip() {
    let input = params(json!({
        "threshold": 0,
        "threshold_type": "LESS",
        "time": 60,
        "grace": 0,
        "grouping_fields": ["host", "user"],
        "distinction_fields": ["process"]
    }));
    assert_eq!(round_trip("GROUP_DISTINCT", &input, None), input);
}

#[test]
fn correlation_round_trip() {
    let input = params(json!({
        "threshold": 10,
        "threshold_type": "MORE",
        "additional_threshold": 1,
        "additional_threshold_type": "LESS",
        "time": 15,
        "grace": 1,
        "grouping_fields": []
    }));
    for kind in ["THEN", "AND"] {
        assert_eq!(round_trip(kind, &input, Some("S2")), input, "kind {}", kind);
    }
}

#[test]
fn statistical_round_trip_for_every_function() {
    for function in ["MEAN", "MIN", "MAX", "SUM", "STDDEV"] {
        let input = params(json!({
            "type": function,
            "field": "latency_ms",
            "threshold": 250.5,
            "threshold_type": "<=",
            "time": 10,
            "grace": 3
        }));
        assert_eq!(round_trip("STATISTICAL", &input, None), input, "function {}", function);
    }
}

#[test]
fn statistical_integer_threshold_reads_back_as_float() {
    let input = params(json!({
        "type": "MEAN", "field": "bytes", "threshold_type": ">",
        "threshold": 100, "time": 5, "grace": 1
    }));
    let decoded = round_trip("STATISTICAL", &input, None);
    assert_eq!(decoded["threshold"].as_f64(), Some(100.0));
    assert_eq!(decoded["threshold"], json!(100.0));
    assert_eq!(decoded["type"], json!("MEAN"));
    assert_eq!(decoded["time"], json!(5));
}

#[test]
fn mean_is_stored_as_avg() {
    let input = params(json!({"type": "MEAN", "field": "bytes", "threshold": 1}));
    let EngineConfig::Aggregation(config) = factory().dispatch("STATISTICAL", &input, "S1", None).unwrap()
    else {
        panic!("Expected aggregation-v1 config");
    };
    assert_eq!(config.series[0].function, AggregationFunction::Avg);
    let stored = serde_json::to_value(&config).unwrap();
    assert_eq!(stored["series"][0]["function"], json!("AVG"));
}

#[test]
fn equal_operator_uses_engine_token() {
    let input = params(json!({
        "type": "SUM", "field": "errors", "threshold": 0, "threshold_type": "="
    }));
    let config = factory().dispatch("STATISTICAL", &input, "S1", None).unwrap();
    let stored = serde_json::to_value(&config).unwrap();
    assert_eq!(stored["type"], json!("aggregation-v1"));
    assert_eq!(stored["conditions"]["expression"]["expr"], json!("=="));

    let decoded = decode_condition(&config);
    assert_eq!(decoded["threshold_type"], json!("="));
}

#[test]
fn minutes_and_milliseconds() {
    let input = params(json!({"threshold": 1, "time": 5, "grace": 0}));
    let config = factory().dispatch("COUNT", &input, "S1", None).unwrap();
    assert_eq!(config.search_within_ms(), 300_000);
    assert_eq!(config.execute_every_ms(), 0);

    let foreign = json!({
        "type": "aggregation-count",
        "stream": "S1",
        "threshold_type": "MORE",
        "threshold": 1,
        "search_within_ms": 1500,
        "execute_every_ms": 119_999
    });
    let decoded = decode_condition(&parse_engine_config(foreign).unwrap());
    assert_eq!(decoded["time"], json!(0));
    assert_eq!(decoded["grace"], json!(1));
}

#[test]
fn foreign_config_with_unknown_type_is_a_decode_anomaly() {
    let err = parse_engine_config(json!({"type": "geo-fence"})).unwrap_err();
    assert!(matches!(err, wizard_core::WizardError::DecodeAnomaly(_)));
}
