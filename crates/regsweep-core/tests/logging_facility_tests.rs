#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{vendor_store, APP};
use regsweep_core::errors::RegistryError;
use regsweep_core::logging_facility::test_capture::init_test_capture;
use regsweep_core::{log_op_end, log_op_error, log_op_start};
use regsweep_core::{QueryEngine, QueryItem, RootKeyType};
use regsweep_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = RegistryError::UnknownRoot {
        name: "HKXX".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field("err_code"), Some("ERR_UNKNOWN_ROOT"));
    assert_eq!(error_events[0].level, Level::ERROR);
}

#[test]
fn test_query_logs_start_and_end_with_counts() {
    let capture = init_test_capture();
    let store = vendor_store();
    let mut engine = QueryEngine::new(&store);

    engine
        .query(
            &[QueryItem::new(RootKeyType::Hklm, "SOFTWARE\\Vendor")],
            vec![],
            vec![],
        )
        .unwrap();

    let events = capture.events_for_session(engine.session_id().as_str());
    let starts: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("query") && e.event.as_deref() == Some(EVENT_START))
        .collect();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("query") && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].field("target_count"), Some("1"));
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].field("result_count"), Some("10"));
    assert_eq!(ends[0].field("error_count"), Some("0"));
}

#[test]
fn test_recoverable_failure_emits_warning() {
    let capture = init_test_capture();
    let mut store = vendor_store();
    store.deny_key(APP).unwrap();
    let mut engine = QueryEngine::new(&store);

    engine
        .query(
            &[QueryItem::new(RootKeyType::Hklm, "SOFTWARE\\Vendor")],
            vec![],
            vec![],
        )
        .unwrap();

    let warnings = capture.count_events(|e| {
        e.level == Level::WARN
            && e.field("session_id") == Some(engine.session_id().as_str())
            && e.field("key_path") == Some(APP)
    });
    assert_eq!(warnings, 2);
}

#[test]
fn test_fatal_query_logs_end_error() {
    let capture = init_test_capture();
    let mut store = vendor_store();
    store
        .fail_value(
            APP,
            "Version",
            RegistryError::Internal {
                message: "corrupt".to_string(),
            },
        )
        .unwrap();
    let mut engine = QueryEngine::new(&store);

    let _ = engine.query(
        &[QueryItem::new(RootKeyType::Hklm, "SOFTWARE\\Vendor")],
        vec![],
        vec![],
    );

    let events = capture.events_for_session(engine.session_id().as_str());
    assert!(events.iter().any(|e| e.op.as_deref() == Some("query")
        && e.event.as_deref() == Some(EVENT_END_ERROR)
        && e.field("err_code") == Some("ERR_INTERNAL")));
}
