use crate::integration::test_utils::{capturer_at, example_scenario};
use std::fs;
use tempfile::TempDir;
use vertrace::cli::{map_error, Commands, OutputFormat, RunContext};
use vertrace::CaptureConfig;

fn run_context(temp_dir: &TempDir) -> RunContext {
    let config_path = temp_dir.path().join("vertrace.toml");
    fs::write(
        &config_path,
        format!("trace_root = {:?}\n", temp_dir.path().join("traces")),
    )
    .unwrap();
    RunContext::new(temp_dir.path().to_path_buf(), Some(config_path), None).unwrap()
}

fn capture_example(temp_dir: &TempDir) {
    let traces = temp_dir.path().join("traces");
    let capturer = capturer_at(&traces, "job42", &CaptureConfig::default());
    capturer.capture(&example_scenario());
}

#[test]
fn test_show_json() {
    let temp_dir = TempDir::new().unwrap();
    capture_example(&temp_dir);
    let context = run_context(&temp_dir);

    let output = context
        .execute(&Commands::Show {
            job: "job42".to_string(),
            step: 3,
            vertex: "7".to_string(),
            format: OutputFormat::Json,
        })
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["vertexId"], "7");
    assert_eq!(json["vertexValue"], "6");
    assert_eq!(json["neighbors"], serde_json::json!(["3", "9"]));
    assert_eq!(json["outgoingMessages"], serde_json::json!({"3": "10", "9": "11"}));
}

#[test]
fn test_vertices_and_steps_text() {
    let temp_dir = TempDir::new().unwrap();
    capture_example(&temp_dir);
    let context = run_context(&temp_dir);

    let vertices = context
        .execute(&Commands::Vertices {
            job: "job42".to_string(),
            step: 3,
            format: OutputFormat::Text,
        })
        .unwrap();
    assert!(vertices.contains("1 vertices captured at step 3"));

    let steps = context
        .execute(&Commands::Steps {
            job: "job42".to_string(),
            format: OutputFormat::Text,
        })
        .unwrap();
    assert_eq!(steps, "Steps captured in job 'job42': 3");
}

#[test]
fn test_missing_trace_message() {
    let temp_dir = TempDir::new().unwrap();
    capture_example(&temp_dir);
    let context = run_context(&temp_dir);

    let err = context
        .execute(&Commands::Show {
            job: "job42".to_string(),
            step: 3,
            vertex: "8".to_string(),
            format: OutputFormat::Text,
        })
        .unwrap_err();
    assert_eq!(
        map_error(&err),
        "No trace for vertex '8' at step 3 of job 'job42'"
    );
}
