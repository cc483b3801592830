//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain errors to a message for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::JobNotFound(job_id)) => {
            format!("No traces for job '{}'", job_id)
        }
        ApiError::StorageError(StorageError::TraceNotFound {
            job_id,
            step,
            vertex_id,
        }) => format!(
            "No trace for vertex '{}' at step {} of job '{}'",
            vertex_id, step, job_id
        ),
        _ => e.to_string(),
    }
}
