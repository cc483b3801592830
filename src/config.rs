//! Configuration System
//!
//! Layered configuration for capture and inspection: where traces live, what
//! the selection policy captures, and how logging is set up. See
//! [`ConfigLoader`] for source precedence.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::selection::CaptureConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::DEFAULT_TRACE_ROOT;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VertraceConfig {
    /// Directory holding one subdirectory of traces per job
    #[serde(default = "default_trace_root")]
    pub trace_root: PathBuf,

    /// Selection policy and anomaly settings
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_trace_root() -> PathBuf {
    PathBuf::from(DEFAULT_TRACE_ROOT)
}

impl Default for VertraceConfig {
    fn default() -> Self {
        Self {
            trace_root: default_trace_root(),
            capture: CaptureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TraceRoot(String),
    Capture(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TraceRoot(msg) => write!(f, "Trace root: {}", msg),
            ValidationError::Capture(msg) => write!(f, "Capture: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl VertraceConfig {
    /// Validate the entire configuration, collecting every error.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.trace_root.as_os_str().is_empty() {
            errors.push(ValidationError::TraceRoot(
                "Trace root cannot be empty".to_string(),
            ));
        }

        if let Err(capture_errors) = self.capture.validate() {
            errors.extend(capture_errors.into_iter().map(ValidationError::Capture));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all errors into one [`ApiError`].
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
