use serde_json::json;

use design_viewer::design::decode::{
    decode_analyze_response, decode_design_detail, decode_design_list, decode_design_result,
    error_message,
};
use design_viewer::{ApiError, ModelType, Stats};

// =========================================================================
// List envelope
// =========================================================================

#[test]
fn list_decodes_json_encoded_fields() {
    let body = json!({
        "data": [{
            "id": 7,
            "name": "隐影坦克",
            "prompt": "高机动性隐身侦察坦克",
            "created_at": "2024-05-01 08:30:00",
            "equipment_type": "tank",
            "stats": "{\"speed\":80,\"armor\":\"70\",\"firepower\":90.4,\"stealth\":95}",
            "design_suggestions": "[\"降低热信号\",\"加装主动防护\"]",
            "technical_specs": "{\"weight\":\"45吨\",\"crew\":3}",
            "analysis": "\"综合性能优秀\""
        }]
    });

    let designs = decode_design_list(&body).unwrap();
    assert_eq!(designs.len(), 1);

    let d = &designs[0];
    assert_eq!(d.id, "7");
    assert_eq!(d.name, "隐影坦克");
    assert_eq!(d.prompt, "高机动性隐身侦察坦克");
    assert_eq!(d.created_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    assert_eq!(d.result.equipment_type, "tank");
    assert_eq!(d.result.stats, Stats::new(80, 70, 90, 95));
    assert_eq!(d.result.design_suggestions, vec!["降低热信号", "加装主动防护"]);
    assert_eq!(d.result.spec("weight"), Some("45吨"));
    assert_eq!(d.result.spec("crew"), Some("3"));
    assert_eq!(d.result.spec("range"), None);
    assert_eq!(d.result.analysis, "综合性能优秀");
}

#[test]
fn list_decodes_nested_result_object() {
    let body = json!({
        "data": [{
            "id": "abc",
            "name": "东风-41",
            "prompt": "洲际导弹",
            "createdAt": "2024-05-02T10:00:00Z",
            "result": {
                "equipmentType": "missile",
                "modelType": "missile",
                "name": "东风-41",
                "stats": {"speed": 100, "armor": 10, "firepower": 100, "stealth": 40},
                "designSuggestions": ["多弹头"],
                "technicalSpecs": {"range": "12000km"}
            }
        }]
    });

    let designs = decode_design_list(&body).unwrap();
    let r = &designs[0].result;
    assert_eq!(r.model_type, Some(ModelType::Missile));
    assert_eq!(r.stats.speed, 100);
    assert_eq!(r.design_suggestions, vec!["多弹头"]);
    assert_eq!(r.spec("range"), Some("12000km"));
}

#[test]
fn malformed_fields_fall_back_to_defaults() {
    let body = json!({
        "data": [{
            "id": "1",
            "name": "broken",
            "prompt": "p",
            "createdAt": "not a date",
            "stats": "{speed: fast",
            "designSuggestions": "not json",
            "technicalSpecs": 42,
            "analysis": null,
            "modelType": "battleship"
        }]
    });

    let designs = decode_design_list(&body).unwrap();
    let d = &designs[0];
    assert_eq!(d.result.stats, Stats::default());
    assert!(d.result.design_suggestions.is_empty());
    assert!(d.result.technical_specs.is_empty());
    assert_eq!(d.result.analysis, "");
    assert_eq!(d.result.model_type, None);
    assert_eq!(d.created_at.timestamp(), 0);
}

#[test]
fn stats_are_clamped_to_range() {
    let r = decode_design_result(
        &json!({"stats": {"speed": 250, "armor": -5, "firepower": "101", "stealth": null}}),
        "test",
    );
    assert_eq!(r.stats, Stats { speed: 100, armor: 0, firepower: 100, stealth: 0 });
}

#[test]
fn rows_without_id_are_skipped() {
    let body = json!({
        "data": [
            {"name": "no id", "createdAt": "2024-01-01T00:00:00Z"},
            {"id": "", "name": "empty id"},
            {"id": "2", "name": "kept", "createdAt": "2024-01-02T00:00:00Z"}
        ]
    });

    let designs = decode_design_list(&body).unwrap();
    assert_eq!(designs.len(), 1);
    assert_eq!(designs[0].id, "2");
}

#[test]
fn list_keeps_server_order() {
    let body = json!({
        "data": [
            {"id": "new", "createdAt": "2024-03-01T00:00:00Z"},
            {"id": "mid", "createdAt": "2024-02-01T00:00:00Z"},
            {"id": "old", "createdAt": "2024-01-01T00:00:00Z"}
        ]
    });

    let ids: Vec<String> = decode_design_list(&body)
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);

    // Decoding the same payload again yields the same order.
    let again: Vec<String> = decode_design_list(&body)
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, again);
}

#[test]
fn unparseable_timestamp_does_not_reorder_rows() {
    let body = json!({
        "data": [
            {"id": "3", "createdAt": "2024-03-01T00:00:00Z"},
            {"id": "2", "createdAt": "yesterday"},
            {"id": "1", "createdAt": "2024-01-01T00:00:00Z"}
        ]
    });

    let designs = decode_design_list(&body).unwrap();
    let ids: Vec<&str> = designs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
    assert_eq!(designs[1].created_at, chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
}

#[test]
fn name_falls_back_to_result_name() {
    let body = json!({"data": [{"id": "1", "result": {"name": "歼-20"}}]});
    let designs = decode_design_list(&body).unwrap();
    assert_eq!(designs[0].name, "歼-20");
}

#[test]
fn missing_data_is_a_malformed_payload() {
    let err = decode_design_list(&json!({"designs": []})).unwrap_err();
    assert!(matches!(err, ApiError::MalformedPayload { .. }));

    let err = decode_design_list(&json!({"data": {"id": 1}})).unwrap_err();
    assert!(matches!(err, ApiError::MalformedPayload { .. }));

    let err = decode_design_detail(&serde_json::Value::Null).unwrap_err();
    assert!(matches!(err, ApiError::MalformedPayload { .. }));
}

// =========================================================================
// Detail, analyze, error bodies
// =========================================================================

#[test]
fn detail_accepts_encoded_data() {
    let body = json!({"data": "{\"name\":\"辽宁舰\",\"equipmentType\":\"carrier\"}"});
    let r = decode_design_detail(&body).unwrap();
    assert_eq!(r.name, "辽宁舰");
    assert_eq!(r.equipment_type, "carrier");
}

#[test]
fn analyze_response_carries_design_id() {
    let body = json!({
        "data": {"name": "隐影坦克", "equipmentType": "tank", "modelType": "tank"},
        "designId": 12
    });
    let outcome = decode_analyze_response(&body).unwrap();
    assert_eq!(outcome.design_id.as_deref(), Some("12"));
    assert_eq!(outcome.result.name, "隐影坦克");

    let outcome = decode_analyze_response(&json!({"data": {}})).unwrap();
    assert_eq!(outcome.design_id, None);
}

#[test]
fn error_message_extraction() {
    assert_eq!(error_message(&json!({"error": "额度不足"})), Some("额度不足".to_string()));
    assert_eq!(
        error_message(&json!({"error": {"message": "bad prompt"}})),
        Some("bad prompt".to_string())
    );
    assert_eq!(error_message(&json!({"error": "  "})), None);
    assert_eq!(error_message(&serde_json::Value::Null), None);
}
