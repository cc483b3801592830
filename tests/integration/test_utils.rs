//! Shared fixtures for integration tests

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vertrace::value::{IntValue, LongValue};
use vertrace::{
    CaptureConfig, Capturer, Computation, Context, FsTraceStore, Scenario, ScenarioMarshaler,
    ScenarioTypes, TraceQuery, TypeRegistry,
};

/// Computation type recorded in fixture traces.
pub struct ConnectedComponents;

impl Computation for ConnectedComponents {
    const TYPE_NAME: &'static str = "acme.graph.ConnectedComponents";
}

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_computation::<ConnectedComponents>();
    registry
}

pub fn marshaler() -> ScenarioMarshaler {
    ScenarioMarshaler::new(Arc::new(registry()))
}

pub fn types() -> ScenarioTypes {
    ScenarioTypes::of::<ConnectedComponents, LongValue, IntValue, IntValue, IntValue, IntValue>()
}

/// Minimal scenario for vertex `vertex` at `step`.
pub fn scenario(step: u64, vertex: i64) -> Scenario {
    let context = Context::new(step, Box::new(LongValue(vertex)), Box::new(IntValue(0)));
    Scenario::new(types(), context)
}

/// Vertex 7 at step 3: value 5 -> 6, two neighbors, two messages each way.
pub fn example_scenario() -> Scenario {
    let mut context = Context::new(3, Box::new(LongValue(7)), Box::new(IntValue(5)));
    context
        .set_vertex_value_after(Box::new(IntValue(6)))
        .add_neighbor(Box::new(LongValue(3)), None)
        .add_neighbor(Box::new(LongValue(9)), Some(Box::new(IntValue(1))))
        .add_inbound_message(Box::new(IntValue(2)))
        .add_inbound_message(Box::new(IntValue(4)))
        .add_outbound_message(Box::new(LongValue(3)), Box::new(IntValue(10)))
        .add_outbound_message(Box::new(LongValue(9)), Box::new(IntValue(11)));
    Scenario::new(types(), context)
}

pub fn capturer(dir: &TempDir, job_id: &str, config: &CaptureConfig) -> Capturer<FsTraceStore> {
    capturer_at(dir.path(), job_id, config)
}

pub fn capturer_at(root: &Path, job_id: &str, config: &CaptureConfig) -> Capturer<FsTraceStore> {
    let store = FsTraceStore::new(root).unwrap();
    Capturer::new(job_id, config, marshaler(), store).unwrap()
}

pub fn query(dir: &TempDir) -> TraceQuery<FsTraceStore> {
    TraceQuery::new(FsTraceStore::open(dir.path()), marshaler())
}
