use design_viewer::{
    ModelType,
    api::mock::MockDesignApi,
    session::reconciler::DesignSession,
    session::session_model::SessionState,
    trace::{logger::TraceLogger, trace::TraceEvent},
};
use serde_json::Value;

use crate::common::fixtures::{TOKEN, auth, result};

mod common;

fn read_events(path: &std::path::Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn session_operations_are_traced_as_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let api = MockDesignApi::new(TOKEN);
    api.seed("隐身坦克", result("隐影坦克", "tank"));
    let mut session = DesignSession::new(api, Some(auth()))
        .with_tracer(TraceLogger::new(path.to_str().unwrap()));

    session.refresh().unwrap();
    session.delete("1").unwrap();

    let events = read_events(&path);
    assert_eq!(events.len(), 2);

    assert_eq!(events[0]["operation"], "refresh");
    assert_eq!(events[0]["state"], "Loaded");
    assert_eq!(events[0]["selected_id"], "1");
    assert_eq!(events[0]["model"], "tank");
    assert_eq!(events[0]["list_len"], 1);
    assert_eq!(events[0]["fingerprint"].as_str().unwrap().len(), 40);

    assert_eq!(events[1]["operation"], "delete");
    assert_eq!(events[1]["state"], "Empty");
    assert_eq!(events[1]["step"], 1);
}

#[test]
fn failures_are_traced_with_their_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let mut session = DesignSession::new(MockDesignApi::new(TOKEN), Some(auth()))
        .with_tracer(TraceLogger::new(path.to_str().unwrap()));
    let _ = session.select("missing");

    let events = read_events(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["operation"], "select");
    assert!(events[0]["outcome"].as_str().unwrap().contains("404"));
}

#[test]
fn unopenable_trace_path_disables_tracing() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("missing-dir").join("trace.jsonl");

    let tracer = TraceLogger::new(bad.to_str().unwrap());
    assert!(!tracer.is_enabled());

    // Logging to a disabled tracer is a no-op.
    tracer.log(&TraceEvent::now(0, SessionState::Empty, "refresh"));
    assert!(!bad.exists());
}

#[test]
fn trace_event_builder_fields() {
    let event = TraceEvent::now(3, SessionState::Viewing, "select")
        .with_outcome("applied")
        .with_selection(Some("7"), Some(ModelType::Drone))
        .with_list_len(4);

    let json: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(json["step"], 3);
    assert_eq!(json["state"], "Viewing");
    assert_eq!(json["outcome"], "applied");
    assert_eq!(json["selected_id"], "7");
    assert_eq!(json["model"], "drone");
    assert_eq!(json["list_len"], 4);
    assert!(json["fingerprint"].is_null());
}

#[test]
fn fingerprint_tracks_classification_fields_only() {
    let a = result("隐影坦克", "tank");
    let mut b = a.clone();
    b.description = "different prose".to_string();
    b.stats.speed = 1;
    assert_eq!(a.fingerprint(), b.fingerprint());

    let mut c = a.clone();
    c.model_type = Some(ModelType::Armor);
    assert_ne!(a.fingerprint(), c.fingerprint());
}
