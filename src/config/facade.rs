//! Configuration loader facade.

use super::merge;
use super::sources::{env, global_file, workspace_file};
use super::VertraceConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`VertraceConfig`] from layered sources.
///
/// Precedence, lowest first: built-in defaults, the global file, the
/// workspace `config/config.toml`, `config/{VERTRACE_ENV}.toml`, then
/// `VERTRACE__` environment variables.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the workspace at `workspace_root`.
    pub fn load(workspace_root: &Path) -> Result<VertraceConfig, ConfigError> {
        let builder = merge::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = env::add_to_builder(builder);

        let config: VertraceConfig = builder.build()?.try_deserialize()?;
        debug!(trace_root = %config.trace_root.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<VertraceConfig, ConfigError> {
        merge::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Path of the global configuration file.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults only.
    pub fn default() -> VertraceConfig {
        VertraceConfig::default()
    }
}
