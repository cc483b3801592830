//! vertrace: record/replay tracing for vertex-centric graph computations
//!
//! Captures one vertex's activity during one computation step as a
//! self-describing trace, stores it under a deterministic path on a shared
//! filesystem, and loads it back for inspection.

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod scenario;
pub mod selection;
pub mod store;
pub mod value;

pub use capture::{CaptureOutcome, Capturer, IntegrityCheck};
pub use error::{ApiError, CodecError, ScenarioError, StorageError};
pub use query::{project_for_display, ScenarioView, TraceQuery};
pub use scenario::{Anomaly, Context, Scenario, ScenarioMarshaler, ScenarioTypes};
pub use selection::{CaptureConfig, Decision, SelectionPolicy, SelectionState, SkipReason};
pub use store::{FsTraceStore, TraceAddress, TraceStore};
pub use value::{Computation, TypeDescriptor, TypeRegistry, TypedValue, Value};
