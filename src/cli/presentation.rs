//! CLI presentation: text tables and JSON for query results.

use crate::config::VertraceConfig;
use crate::error::ApiError;
use crate::query::ScenarioView;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;
use std::collections::BTreeSet;

fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::OutputError(format!("Failed to serialize output: {}", e)))
}

pub fn format_vertices_text(job_id: &str, step: u64, vertices: &BTreeSet<String>) -> String {
    if vertices.is_empty() {
        return format!("No vertices captured at step {} of job '{}'", step, job_id);
    }
    let mut out = format!(
        "{} vertices captured at step {} of job '{}'\n\n",
        vertices.len(),
        step,
        job_id
    );
    for vertex in vertices {
        out.push_str(&format!("  {}\n", vertex));
    }
    out.trim_end().to_string()
}

pub fn format_vertices_json(
    job_id: &str,
    step: u64,
    vertices: &BTreeSet<String>,
) -> Result<String, ApiError> {
    to_json(&json!({
        "job": job_id,
        "step": step,
        "vertices": vertices,
    }))
}

pub fn format_steps_text(job_id: &str, steps: &BTreeSet<u64>) -> String {
    if steps.is_empty() {
        return format!("No traces in job '{}'", job_id);
    }
    let listed: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
    format!("Steps captured in job '{}': {}", job_id, listed.join(", "))
}

pub fn format_steps_json(job_id: &str, steps: &BTreeSet<u64>) -> Result<String, ApiError> {
    to_json(&json!({
        "job": job_id,
        "steps": steps,
    }))
}

pub fn format_scenario_text(view: &ScenarioView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Vertex {} at step {}\n", view.vertex_id, view.step));
    out.push_str(&format!(
        "  Value: {} -> {}\n",
        view.vertex_value_before, view.vertex_value
    ));
    if let Some(ref anomaly) = view.anomaly {
        out.push_str(&format!("  Anomaly: {}\n", anomaly));
    }
    out.push_str(&format!("  Neighbors: {}\n", view.neighbors.join(", ")));
    out.push_str(&format!(
        "  Inbound messages: {}\n\n",
        view.inbound_messages.join(", ")
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Destination", "Message"]);
    for (destination, message) in &view.outgoing_messages {
        table.add_row(vec![destination.clone(), message.clone()]);
    }
    out.push_str(&format!("{}", table));
    out
}

pub fn format_scenario_json(view: &ScenarioView) -> Result<String, ApiError> {
    serde_json::to_string_pretty(view)
        .map_err(|e| ApiError::OutputError(format!("Failed to serialize scenario: {}", e)))
}

pub fn format_config_toml(config: &VertraceConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(config)
        .map(|out| out.trim_end().to_string())
        .map_err(|e| ApiError::OutputError(format!("Failed to serialize configuration: {}", e)))
}
