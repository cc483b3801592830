//! Query Layer
//!
//! Read-side facade used by inspection and reproduction tooling. Every
//! failure here is fatal to the request; there is no best-effort read.

use crate::error::ApiError;
use crate::scenario::{Scenario, ScenarioMarshaler};
use crate::store::{TraceAddress, TraceStore};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Display-friendly projection of a scenario.
///
/// `outgoing_messages` keeps one message per destination; when a destination
/// received several in one step only the last is shown. Not suitable for
/// reproduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioView {
    pub vertex_id: String,
    pub vertex_value: String,
    pub neighbors: Vec<String>,
    pub outgoing_messages: BTreeMap<String, String>,
    pub step: u64,
    pub vertex_value_before: String,
    pub inbound_messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<String>,
}

impl From<&Scenario> for ScenarioView {
    fn from(scenario: &Scenario) -> Self {
        let context = &scenario.context;
        let mut outgoing_messages = BTreeMap::new();
        for outbound in &context.outbound_messages {
            outgoing_messages.insert(outbound.destination.to_string(), outbound.message.to_string());
        }

        Self {
            vertex_id: context.vertex_id.to_string(),
            vertex_value: context.vertex_value_after.to_string(),
            neighbors: context.neighbors.iter().map(|n| n.id.to_string()).collect(),
            outgoing_messages,
            step: context.step,
            vertex_value_before: context.vertex_value_before.to_string(),
            inbound_messages: context
                .inbound_messages
                .iter()
                .map(|m| m.to_string())
                .collect(),
            anomaly: scenario.anomaly.as_ref().map(|a| a.to_string()),
        }
    }
}

pub fn project_for_display(scenario: &Scenario) -> ScenarioView {
    ScenarioView::from(scenario)
}

/// Trace queries over a store.
pub struct TraceQuery<S: TraceStore> {
    store: S,
    marshaler: ScenarioMarshaler,
}

impl<S: TraceStore> TraceQuery<S> {
    pub fn new(store: S, marshaler: ScenarioMarshaler) -> Self {
        Self { store, marshaler }
    }

    pub fn list_vertices(&self, job_id: &str, step: u64) -> Result<BTreeSet<String>, ApiError> {
        Ok(self.store.list_vertices(job_id, step)?)
    }

    pub fn list_steps(&self, job_id: &str) -> Result<BTreeSet<u64>, ApiError> {
        Ok(self.store.list_steps(job_id)?)
    }

    pub fn load_scenario(
        &self,
        job_id: &str,
        step: u64,
        vertex_id: &str,
    ) -> Result<Scenario, ApiError> {
        let address = TraceAddress::new(job_id, step, vertex_id)?;
        let bytes = self.store.read(&address)?;
        let scenario = self.marshaler.from_bytes(&bytes)?;
        debug!(trace = %address, "Loaded scenario");
        Ok(scenario)
    }

    pub fn project_for_display(&self, scenario: &Scenario) -> ScenarioView {
        project_for_display(scenario)
    }
}
