//! Merge rules: built-in defaults first, later sources override earlier ones.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_TRACE_ROOT: &str = "vertrace-traces";

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("trace_root", DEFAULT_TRACE_ROOT)?
        .set_default("capture.max_captures", 50)?
        .set_default("capture.max_anomalies", 10)?
        .set_default("capture.capture_anomalies", true)
}
