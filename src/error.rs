//! Error types for trace capture, marshaling, storage and queries.

use crate::value::Slot;
use thiserror::Error;

/// Typed value codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed bytes for type {type_name}: {reason}")]
    Malformed { type_name: String, reason: String },

    #[error("Type {0} does not support self-serialization")]
    NotSerializable(String),

    #[error("Type {0} cannot be default-constructed")]
    NotConstructible(String),
}

/// Scenario marshaling errors
///
/// Every variant is fatal to the enclosing load or save; partially decoded
/// scenarios are never returned.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Unresolved {slot} type: {name}")]
    UnresolvedType { slot: Slot, name: String },

    #[error("Type {name} in {slot} slot must be {required}")]
    TypeConstraint {
        slot: Slot,
        name: String,
        required: &'static str,
    },

    #[error("Value type mismatch at {field}: declared {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Codec failure at {field}: {source}")]
    Codec {
        field: String,
        #[source]
        source: CodecError,
    },

    #[error("Malformed trace record: {0}")]
    Malformed(String),

    #[error("Unsupported trace format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl ScenarioError {
    pub(crate) fn codec(field: impl Into<String>, source: CodecError) -> Self {
        ScenarioError::Codec {
            field: field.into(),
            source,
        }
    }
}

/// Trace storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Trace not found: job {job_id}, step {step}, vertex {vertex_id}")]
    TraceNotFound {
        job_id: String,
        step: u64,
        vertex_id: String,
    },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Invalid trace address: {0}")]
    InvalidAddress(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by the query layer and the inspection CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Scenario error: {0}")]
    ScenarioError(#[from] ScenarioError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
