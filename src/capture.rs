//! Capture entry point
//!
//! The host framework hands each materialized [`Scenario`] to a [`Capturer`],
//! which consults the selection policy and, when approved, marshals and
//! writes the trace. Capture is best-effort instrumentation: failures are
//! logged and reported in the returned [`CaptureOutcome`], never propagated
//! into the host computation.

use crate::error::{ApiError, StorageError};
use crate::scenario::{Anomaly, Scenario, ScenarioMarshaler};
use crate::selection::{
    CaptureConfig, Candidate, Decision, SelectionPolicy, SelectionState, SkipReason,
};
use crate::store::address::validate_job_id;
use crate::store::{TraceAddress, TraceStore};
use crate::value::Value;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Host-supplied integrity checks. Both accept everything unless overridden.
pub trait IntegrityCheck: Send + Sync {
    fn is_vertex_value_correct(&self, _vertex_id: &dyn Value, _value: &dyn Value) -> bool {
        true
    }

    fn is_message_correct(
        &self,
        _source: &dyn Value,
        _destination: &dyn Value,
        _message: &dyn Value,
        _step: u64,
    ) -> bool {
        true
    }
}

/// Result of one capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(TraceAddress),
    AnomalyCaptured(TraceAddress),
    Skipped(SkipReason),
    /// Anomaly observed but not persisted (ceiling reached or disabled).
    AnomalyDropped,
    /// Approved but the trace could not be written; already logged.
    Failed,
}

impl CaptureOutcome {
    pub fn address(&self) -> Option<&TraceAddress> {
        match self {
            CaptureOutcome::Captured(address) | CaptureOutcome::AnomalyCaptured(address) => {
                Some(address)
            }
            _ => None,
        }
    }
}

/// Per-worker capturer for one job.
pub struct Capturer<S: TraceStore> {
    job_id: String,
    policy: SelectionPolicy,
    state: Mutex<SelectionState>,
    marshaler: ScenarioMarshaler,
    store: S,
    integrity: Option<Box<dyn IntegrityCheck>>,
    capture_anomalies: bool,
    check_vertex_values: bool,
    check_messages: bool,
}

impl<S: TraceStore> Capturer<S> {
    pub fn new(
        job_id: impl Into<String>,
        config: &CaptureConfig,
        marshaler: ScenarioMarshaler,
        store: S,
    ) -> Result<Self, StorageError> {
        let job_id = job_id.into();
        validate_job_id(&job_id)?;
        Ok(Self {
            job_id,
            policy: SelectionPolicy::from_config(config),
            state: Mutex::new(SelectionState::new()),
            marshaler,
            store,
            integrity: None,
            capture_anomalies: config.capture_anomalies,
            check_vertex_values: config.check_vertex_values,
            check_messages: config.check_messages,
        })
    }

    pub fn with_integrity_check(mut self, check: impl IntegrityCheck + 'static) -> Self {
        self.integrity = Some(Box::new(check));
        self
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn captures(&self) -> u64 {
        self.state.lock().captures()
    }

    pub fn anomalies(&self) -> u64 {
        self.state.lock().anomalies()
    }

    /// Announce the vertices this worker will visit in `step`.
    pub fn begin_step(&self, step: u64, candidates: &[String]) {
        self.policy.begin_step(&mut self.state.lock(), step, candidates);
    }

    /// Capture `scenario` if the selection policy approves it.
    ///
    /// Integrity violations found by the configured checks are captured as
    /// anomalies instead, bypassing selection.
    pub fn capture(&self, scenario: &Scenario) -> CaptureOutcome {
        if let Some(anomaly) = self.check_integrity(scenario) {
            let flagged = scenario.clone().with_anomaly(anomaly);
            match self.capture_anomaly(&flagged) {
                CaptureOutcome::AnomalyDropped => {}
                outcome => return outcome,
            }
        }

        let context = &scenario.context;
        let candidate = Candidate {
            step: context.step,
            vertex_id: &context.vertex_id,
            neighbor_ids: &context.neighbors,
        };

        let decision = self.policy.decide(&mut self.state.lock(), &candidate);
        match decision {
            Decision::Skip(reason) => CaptureOutcome::Skipped(reason),
            Decision::Capture => match self.persist(scenario) {
                Ok(address) => CaptureOutcome::Captured(address),
                Err(e) => {
                    warn!(
                        job_id = %self.job_id,
                        step = scenario.step(),
                        vertex_id = %context.vertex_id,
                        error = %e,
                        "Failed to capture trace"
                    );
                    CaptureOutcome::Failed
                }
            },
        }
    }

    /// Persist a scenario carrying an anomaly, subject only to the anomaly ceiling.
    pub fn capture_anomaly(&self, scenario: &Scenario) -> CaptureOutcome {
        if !self.capture_anomalies {
            debug!(step = scenario.step(), "Anomaly capture disabled");
            return CaptureOutcome::AnomalyDropped;
        }
        if !self.policy.admit_anomaly(&mut self.state.lock()) {
            debug!(
                step = scenario.step(),
                vertex_id = %scenario.context.vertex_key(),
                anomaly = ?scenario.anomaly,
                "Anomaly ceiling reached, dropping"
            );
            return CaptureOutcome::AnomalyDropped;
        }

        match self.persist(scenario) {
            Ok(address) => CaptureOutcome::AnomalyCaptured(address),
            Err(e) => {
                warn!(
                    job_id = %self.job_id,
                    step = scenario.step(),
                    vertex_id = %scenario.context.vertex_key(),
                    error = %e,
                    "Failed to capture anomaly trace"
                );
                CaptureOutcome::Failed
            }
        }
    }

    /// Record an uncaught failure of user logic while processing `scenario`.
    pub fn capture_fault(&self, scenario: &Scenario, message: impl Into<String>) -> CaptureOutcome {
        let faulted = scenario.clone().with_anomaly(Anomaly::Fault {
            message: message.into(),
        });
        self.capture_anomaly(&faulted)
    }

    /// First integrity violation in `scenario`, if checks are enabled.
    pub fn check_integrity(&self, scenario: &Scenario) -> Option<Anomaly> {
        let check = self.integrity.as_deref()?;
        let context = &scenario.context;

        if self.check_vertex_values
            && !check.is_vertex_value_correct(&*context.vertex_id, &*context.vertex_value_after)
        {
            return Some(Anomaly::VertexValueViolation {
                value: context.vertex_value_after.to_string(),
            });
        }

        if self.check_messages {
            for outbound in &context.outbound_messages {
                if !check.is_message_correct(
                    &*context.vertex_id,
                    &*outbound.destination,
                    &*outbound.message,
                    context.step,
                ) {
                    return Some(Anomaly::MessageViolation {
                        destination: outbound.destination.to_string(),
                        message: outbound.message.to_string(),
                    });
                }
            }
        }

        None
    }

    fn persist(&self, scenario: &Scenario) -> Result<TraceAddress, ApiError> {
        let address =
            TraceAddress::new(&self.job_id, scenario.step(), scenario.context.vertex_key())?;
        let bytes = self.marshaler.to_bytes(scenario)?;
        self.store.write(&address, &bytes)?;
        Ok(address)
    }
}
