use crate::integration::test_utils::{capturer, example_scenario, query};
use std::collections::BTreeMap;
use tempfile::TempDir;
use vertrace::{CaptureConfig, CaptureOutcome, TraceStore};

#[test]
fn test_capture_load_and_project() {
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job42", &CaptureConfig::default());
    let scenario = example_scenario();

    let outcome = capturer.capture(&scenario);
    assert!(matches!(outcome, CaptureOutcome::Captured(_)));
    assert!(temp_dir.path().join("job42/tr_stp_3_vid_7.tr").is_file());

    let query = query(&temp_dir);
    let loaded = query.load_scenario("job42", 3, "7").unwrap();
    assert_eq!(loaded, scenario);

    let edges: Vec<Option<String>> = loaded
        .context
        .neighbors
        .iter()
        .map(|n| n.edge_value.as_ref().map(|v| v.to_string()))
        .collect();
    assert_eq!(edges, vec![None, Some("1".to_string())]);

    let view = query.project_for_display(&loaded);
    assert_eq!(view.vertex_id, "7");
    assert_eq!(view.vertex_value, "6");
    assert_eq!(view.neighbors, vec!["3", "9"]);
    assert_eq!(
        view.outgoing_messages,
        BTreeMap::from([
            ("3".to_string(), "10".to_string()),
            ("9".to_string(), "11".to_string()),
        ])
    );
    assert_eq!(view.vertex_value_before, "5");
    assert_eq!(view.inbound_messages, vec!["2", "4"]);
}

#[test]
fn test_listing_after_capture() {
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job42", &CaptureConfig::default());
    capturer.capture(&example_scenario());

    let query = query(&temp_dir);
    let vertices: Vec<String> = query.list_vertices("job42", 3).unwrap().into_iter().collect();
    assert_eq!(vertices, vec!["7"]);
    assert!(query.list_vertices("job42", 4).unwrap().is_empty());
    assert_eq!(query.list_steps("job42").unwrap().into_iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_recapture_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job42", &CaptureConfig::default());
    let first = example_scenario();
    let mut second = example_scenario();
    second
        .context
        .set_vertex_value_after(Box::new(vertrace::value::IntValue(99)));

    capturer.capture(&first);
    capturer.capture(&second);

    let loaded = query(&temp_dir).load_scenario("job42", 3, "7").unwrap();
    assert_eq!(loaded, second);
}

#[test]
fn test_fault_trace_round_trips_anomaly() {
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job42", &CaptureConfig::default());

    let outcome = capturer.capture_fault(&example_scenario(), "division by zero");
    let address = outcome.address().unwrap().clone();
    let bytes = capturer.store().read(&address).unwrap();
    assert!(!bytes.is_empty());

    let view = query(&temp_dir)
        .project_for_display(&query(&temp_dir).load_scenario("job42", 3, "7").unwrap());
    assert_eq!(view.anomaly.as_deref(), Some("fault: division by zero"));
}
