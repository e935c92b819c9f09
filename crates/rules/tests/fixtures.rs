//! Integration tests that assemble rule views from the sample fixture in
//! `data/fixtures/`.

use serde_json::json;

use wizard_core::WizardError;
use wizard_rules::fixture::Fixture;
use wizard_rules::schema::{MatchingType, RuleView};
use wizard_rules::{ConditionFactory, RuleAssemblyService};

/// Resolve the fixtures directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn fixtures_dir() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data/fixtures")
}

fn load() -> (Fixture, RuleAssemblyService) {
    let fixture = Fixture::load(&fixtures_dir().join("alert-rules.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load fixture: {}", e));
    let service = fixture.into_service(ConditionFactory::default()).unwrap();
    (fixture, service)
}

fn view(title: &str) -> RuleView {
    let (fixture, service) = load();
    service.assemble_view(fixture.rule(title).unwrap()).unwrap()
}

fn field_rules(stream: &wizard_rules::schema::AlertRuleStream) -> Vec<(&str, i32)> {
    stream
        .field_rule
        .iter()
        .map(|r| (r.field.as_str(), r.rule_type))
        .collect()
}

// ── Denied connections burst (count) ────────────────────────

#[test]
fn count_rule_view() {
    let view = view("Denied connections burst");
    assert_eq!(view.title_condition, "Denied connections burst");
    assert_eq!(view.severity.as_deref(), Some("medium"));
    assert_eq!(view.condition.as_deref(), Some("ev-count"));
    assert_eq!(view.notification.as_deref(), Some("nt-count"));
    assert_eq!(view.creator_user_id.as_deref(), Some("admin"));
    assert_eq!(view.condition_type.as_deref(), Some("GROUP_DISTINCT"));
    assert!(!view.disabled);
    // One alert predates last_modified.
    assert_eq!(view.alert_count, 2);

    let params = view.condition_parameters.unwrap();
    assert_eq!(params["threshold"], json!(50));
    assert_eq!(params["threshold_type"], json!("MORE"));
    assert_eq!(params["time"], json!(5));
    assert_eq!(params["grace"], json!(1));
    assert_eq!(params["grouping_fields"], json!(["src_ip"]));
    assert_eq!(params["distinction_fields"], json!(["dst_port"]));

    let stream = view.stream.unwrap();
    assert_eq!(stream.id, "fw-deny");
    assert_eq!(stream.matching_type, MatchingType::And);
    assert_eq!(field_rules(&stream), vec![("action", 1), ("src_ip", -5)]);

    assert!(view.second_stream.is_none());
}

// ── Brute force then success (correlation) ──────────────────

#[test]
fn correlation_rule_view() {
    let view = view("Brute force then success");
    assert_eq!(view.severity.as_deref(), Some("high"));
    assert!(view.disabled);
    assert_eq!(view.alert_count, 0);

    let params = view.condition_parameters.unwrap();
    assert_eq!(params["threshold"], json!(10));
    assert_eq!(params["additional_threshold"], json!(0));
    assert_eq!(params["additional_threshold_type"], json!("MORE"));
    assert_eq!(params["time"], json!(10));
    assert_eq!(params["grace"], json!(1));
    assert!(!params.contains_key("distinction_fields"));

    let primary = view.stream.unwrap();
    assert_eq!(primary.matching_type, MatchingType::Or);
    assert_eq!(field_rules(&primary), vec![("event", 6)]);

    let second = view.second_stream.unwrap();
    assert_eq!(second.id, "auth-ok");
    assert_eq!(field_rules(&second), vec![("app", 1), ("event", 1)]);
}

// ── Large average transfer (statistical) ────────────────────

#[test]
fn statistical_rule_view() {
    let view = view("Large average transfer");
    assert_eq!(view.severity.as_deref(), Some("low"));

    let params = view.condition_parameters.unwrap();
    assert_eq!(params["type"], json!("MEAN"));
    assert_eq!(params["field"], json!("bytes"));
    assert_eq!(params["threshold"], json!(1048576.0));
    assert_eq!(params["threshold_type"], json!(">="));
    assert_eq!(params["time"], json!(15));
    // 1500 ms rounds down to zero minutes.
    assert_eq!(params["grace"], json!(0));

    let stream = view.stream.unwrap();
    assert!(stream.field_rule.is_empty());
}

#[test]
fn notification_parameters_from_fixture() {
    let (_, service) = load();
    let params = service.notification_parameters("nt-then").unwrap();
    assert_eq!(params["severity"], json!("high"));
    assert_eq!(params["split_fields"], json!(["user"]));
    assert_eq!(params["aggregation_time"], json!(30));
    assert_eq!(params["single_notification"], json!(true));
}

#[test]
fn rule_with_missing_stream_fails() {
    let (fixture, service) = load();
    let mut rule = fixture.rule("Brute force then success").unwrap().clone();
    rule.second_stream_id = Some("deleted-stream".to_string());
    let err = service.assemble_view(&rule).unwrap_err();
    assert!(matches!(err, WizardError::NotFound { kind: "Stream", .. }));
    assert!(err.is_client_error());
}

#[test]
fn view_serializes_with_stable_field_names() {
    let view = view("Denied connections burst");
    let value = serde_json::to_value(&view).unwrap();
    for key in [
        "title",
        "title_condition",
        "severity",
        "condition",
        "notification",
        "created_at",
        "creator_user_id",
        "last_modified",
        "disabled",
        "description",
        "alert_count",
        "condition_type",
        "condition_parameters",
        "stream",
        "second_stream",
    ] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
    assert!(value["second_stream"].is_null());
}
