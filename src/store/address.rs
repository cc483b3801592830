//! Trace addressing
//!
//! A trace is addressed by `(job, step, vertex)` and stored at
//! `<job>/tr_stp_<step>_vid_<vertex>.tr`. The path is the index: listing a
//! job directory and matching file names is how traces are enumerated.

use crate::error::StorageError;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

const TRACE_PREFIX: &str = "tr_stp_";
const VERTEX_MARKER: &str = "_vid_";
const TRACE_EXTENSION: &str = ".tr";

// Step numbers are written without leading zeros, so only canonical decimal
// forms are accepted back.
const TRACE_FILE_PATTERN: &str = r"^tr_stp_(0|[1-9][0-9]*)_vid_(.*)\.tr$";

fn trace_file_pattern() -> Result<&'static Regex, StorageError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(TRACE_FILE_PATTERN))
        .as_ref()
        .map_err(|e| StorageError::InvalidAddress(format!("trace file pattern: {}", e)))
}

/// Identity of one trace: a vertex's activity during one step of one job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceAddress {
    job_id: String,
    step: u64,
    vertex_id: String,
}

impl TraceAddress {
    /// Build an address, rejecting ids that would escape the job directory.
    pub fn new(
        job_id: impl Into<String>,
        step: u64,
        vertex_id: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let job_id = job_id.into();
        let vertex_id = vertex_id.into();
        validate_job_id(&job_id)?;
        validate_component("vertex id", &vertex_id)?;
        Ok(Self {
            job_id,
            step,
            vertex_id,
        })
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn vertex_id(&self) -> &str {
        &self.vertex_id
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}{}{}{}{}",
            TRACE_PREFIX, self.step, VERTEX_MARKER, self.vertex_id, TRACE_EXTENSION
        )
    }

    /// Path relative to the trace root.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.job_id).join(self.file_name())
    }

    /// Recover an address from a file name found in `job_id`'s directory.
    ///
    /// Returns `Ok(None)` for anything that is not a trace file.
    pub fn parse(job_id: &str, file_name: &str) -> Result<Option<Self>, StorageError> {
        let Some(caps) = trace_file_pattern()?.captures(file_name) else {
            return Ok(None);
        };
        let (Some(step), Some(vertex_id)) = (caps.get(1), caps.get(2)) else {
            return Ok(None);
        };
        // Out-of-range step numbers were never written by this store.
        let Ok(step) = step.as_str().parse::<u64>() else {
            return Ok(None);
        };
        Ok(Some(Self {
            job_id: job_id.to_string(),
            step,
            vertex_id: vertex_id.as_str().to_string(),
        }))
    }
}

impl fmt::Display for TraceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.job_id, self.file_name())
    }
}

/// Job ids name a directory directly under the trace root.
pub fn validate_job_id(job_id: &str) -> Result<(), StorageError> {
    validate_component("job id", job_id)?;
    if job_id == "." || job_id == ".." {
        return Err(StorageError::InvalidAddress(format!(
            "job id cannot be {:?}",
            job_id
        )));
    }
    Ok(())
}

fn validate_component(what: &str, value: &str) -> Result<(), StorageError> {
    if value.is_empty() {
        return Err(StorageError::InvalidAddress(format!("{} is empty", what)));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidAddress(format!(
            "{} {:?} contains a path separator",
            what, value
        )));
    }
    Ok(())
}
