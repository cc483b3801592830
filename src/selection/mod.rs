//! Selection Policy
//!
//! Decides per (step, vertex) whether to capture. Rules are evaluated in
//! precedence order, first match wins:
//!
//! 1. capture ceiling reached: skip
//! 2. step allow-list configured and step not listed: skip
//! 3. vertex allow-list configured: capture listed vertices (and their
//!    neighbors when enabled), skip the rest
//! 4. random sampling configured: capture up to `R` vertices per step
//! 5. otherwise capture everything
//!
//! Anomalies bypass these rules and are gated by their own ceiling.
//!
//! Counters live in a [`SelectionState`] owned by the capturing worker.
//! Ceilings are therefore per worker; a cluster-wide total may exceed them
//! by up to the worker count.
//!
//! Deciding runs once per vertex per step. Ids are rendered into a buffer
//! owned by the state, and only when a rule has to compare them.

pub mod sampling;

pub use sampling::StepSampler;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Write};
use tracing::trace;

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Maximum traces captured by one worker
    #[serde(default = "default_max_captures")]
    pub max_captures: u64,

    /// Maximum anomaly traces captured by one worker
    #[serde(default = "default_max_anomalies")]
    pub max_anomalies: u64,

    /// Only capture these steps
    #[serde(default)]
    pub steps: Option<Vec<u64>>,

    /// Only capture these vertices (string form of the vertex id)
    #[serde(default)]
    pub vertices: Option<Vec<String>>,

    /// Also capture direct neighbors of listed vertices
    #[serde(default)]
    pub include_neighbors: bool,

    /// Capture this many vertices per step
    #[serde(default)]
    pub random_vertices_per_step: Option<usize>,

    /// Sampling seed; drawn at startup when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Persist faults and integrity violations
    #[serde(default = "default_true")]
    pub capture_anomalies: bool,

    /// Run the vertex value integrity check
    #[serde(default)]
    pub check_vertex_values: bool,

    /// Run the outbound message integrity check
    #[serde(default)]
    pub check_messages: bool,
}

fn default_max_captures() -> u64 {
    50
}

fn default_max_anomalies() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_captures: default_max_captures(),
            max_anomalies: default_max_anomalies(),
            steps: None,
            vertices: None,
            include_neighbors: false,
            random_vertices_per_step: None,
            seed: None,
            capture_anomalies: default_true(),
            check_vertex_values: false,
            check_messages: false,
        }
    }
}

impl CaptureConfig {
    /// Every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.random_vertices_per_step == Some(0) {
            errors.push("random_vertices_per_step must be at least 1".to_string());
        }
        if matches!(&self.vertices, Some(vertices) if vertices.is_empty()) {
            errors.push("vertices allow-list is empty".to_string());
        }
        if self.vertices.is_some() && self.random_vertices_per_step.is_some() {
            errors.push(
                "vertices and random_vertices_per_step are mutually exclusive".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Outcome of a capture decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Capture,
    Skip(SkipReason),
}

impl Decision {
    pub fn is_capture(self) -> bool {
        matches!(self, Decision::Capture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    CaptureLimit,
    StepNotSelected,
    VertexNotSelected,
    NotSampled,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::CaptureLimit => "capture_limit",
            SkipReason::StepNotSelected => "step_not_selected",
            SkipReason::VertexNotSelected => "vertex_not_selected",
            SkipReason::NotSampled => "not_sampled",
        }
    }
}

/// A candidate capture point.
///
/// Ids are compared by their `Display` form, the same form used in trace
/// addresses.
pub struct Candidate<'a, N: fmt::Display = String> {
    pub step: u64,
    pub vertex_id: &'a dyn fmt::Display,
    pub neighbor_ids: &'a [N],
}

impl<N: fmt::Display> Clone for Candidate<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: fmt::Display> Copy for Candidate<'_, N> {}

/// Running counters for one capturing worker.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    captures: u64,
    anomalies: u64,
    sampler: StepSampler,
    /// Reused for rendering ids.
    scratch: String,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }

    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }
}

/// Immutable selection rules built from [`CaptureConfig`].
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    max_captures: u64,
    max_anomalies: u64,
    steps: Option<HashSet<u64>>,
    vertices: Option<HashSet<String>>,
    include_neighbors: bool,
    random_vertices_per_step: Option<usize>,
    seed: u64,
}

impl SelectionPolicy {
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self {
            max_captures: config.max_captures,
            max_anomalies: config.max_anomalies,
            steps: config.steps.as_ref().map(|s| s.iter().copied().collect()),
            vertices: config.vertices.as_ref().map(|v| v.iter().cloned().collect()),
            include_neighbors: config.include_neighbors,
            random_vertices_per_step: config.random_vertices_per_step,
            seed: config.seed.unwrap_or_else(rand::random),
        }
    }

    /// Announce the vertices a worker will visit in `step`.
    ///
    /// Only affects random sampling; a no-op otherwise.
    pub fn begin_step(&self, state: &mut SelectionState, step: u64, candidates: &[String]) {
        if self.vertices.is_some() {
            return;
        }
        if let Some(per_step) = self.random_vertices_per_step {
            state.sampler.announce(step, candidates, per_step, self.seed);
        }
    }

    /// Decide whether to capture `candidate`, counting approved captures.
    pub fn decide<N: fmt::Display>(
        &self,
        state: &mut SelectionState,
        candidate: &Candidate<'_, N>,
    ) -> Decision {
        let decision = self.evaluate(state, candidate);
        if decision.is_capture() {
            state.captures += 1;
        }
        trace!(
            step = candidate.step,
            vertex_id = %candidate.vertex_id,
            ?decision,
            "Selection decision"
        );
        decision
    }

    fn evaluate<N: fmt::Display>(
        &self,
        state: &mut SelectionState,
        candidate: &Candidate<'_, N>,
    ) -> Decision {
        if state.captures >= self.max_captures {
            return Decision::Skip(SkipReason::CaptureLimit);
        }

        if let Some(steps) = &self.steps {
            if !steps.contains(&candidate.step) {
                return Decision::Skip(SkipReason::StepNotSelected);
            }
        }

        let SelectionState {
            sampler, scratch, ..
        } = state;

        if let Some(vertices) = &self.vertices {
            let listed = vertices.contains(render(scratch, candidate.vertex_id));
            let adjacent = !listed
                && self.include_neighbors
                && candidate
                    .neighbor_ids
                    .iter()
                    .any(|n| vertices.contains(render(scratch, n)));
            return if listed || adjacent {
                Decision::Capture
            } else {
                Decision::Skip(SkipReason::VertexNotSelected)
            };
        }

        if let Some(per_step) = self.random_vertices_per_step {
            let vertex_id = render(scratch, candidate.vertex_id);
            return if sampler.admit(candidate.step, vertex_id, per_step) {
                Decision::Capture
            } else {
                Decision::Skip(SkipReason::NotSampled)
            };
        }

        Decision::Capture
    }

    /// Count an observed anomaly; `true` if it may still be persisted.
    pub fn admit_anomaly(&self, state: &mut SelectionState) -> bool {
        if state.anomalies >= self.max_anomalies {
            return false;
        }
        state.anomalies += 1;
        true
    }
}

fn render<'s>(buf: &'s mut String, id: &dyn fmt::Display) -> &'s str {
    buf.clear();
    // Writing to a String fails only if the Display impl itself fails,
    // which leaves a partial id that simply matches nothing.
    let _ = write!(buf, "{}", id);
    buf
}
