//! CLI route: single route table and run context. Dispatches to the query layer and presentation.

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_config_toml, format_scenario_json, format_scenario_text, format_steps_json,
    format_steps_text, format_vertices_json, format_vertices_text,
};
use crate::config::{ConfigLoader, VertraceConfig};
use crate::error::ApiError;
use crate::query::{project_for_display, TraceQuery};
use crate::scenario::ScenarioMarshaler;
use crate::store::FsTraceStore;
use crate::value::TypeRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Runtime context for CLI execution: resolved configuration and the query facade.
pub struct RunContext {
    query: TraceQuery<FsTraceStore>,
    config: VertraceConfig,
}

impl RunContext {
    /// Create a run context. `trace_root` overrides the configured root.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        trace_root: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let mut config = load_config(&workspace_root, config_path.as_deref())?;
        if let Some(trace_root) = trace_root {
            config.trace_root = trace_root;
        }
        config.ensure_valid()?;
        Ok(Self::from_config(&config))
    }

    /// Build directly from a loaded configuration.
    pub fn from_config(config: &VertraceConfig) -> Self {
        let mut registry = TypeRegistry::new();
        // Traces are only displayed here, never replayed.
        registry.accept_any_computation();
        let marshaler = ScenarioMarshaler::new(Arc::new(registry));
        let store = FsTraceStore::open(&config.trace_root);
        debug!(trace_root = %config.trace_root.display(), "Opened trace root");

        Self {
            query: TraceQuery::new(store, marshaler),
            config: config.clone(),
        }
    }

    pub fn trace_root(&self) -> &Path {
        &self.config.trace_root
    }

    pub fn config(&self) -> &VertraceConfig {
        &self.config
    }

    pub fn query(&self) -> &TraceQuery<FsTraceStore> {
        &self.query
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Vertices { job, step, format } => {
                let vertices = self.query.list_vertices(job, *step)?;
                match format {
                    OutputFormat::Text => Ok(format_vertices_text(job, *step, &vertices)),
                    OutputFormat::Json => format_vertices_json(job, *step, &vertices),
                }
            }
            Commands::Steps { job, format } => {
                let steps = self.query.list_steps(job)?;
                match format {
                    OutputFormat::Text => Ok(format_steps_text(job, &steps)),
                    OutputFormat::Json => format_steps_json(job, &steps),
                }
            }
            Commands::Show {
                job,
                step,
                vertex,
                format,
            } => {
                let scenario = self.query.load_scenario(job, *step, vertex)?;
                let view = project_for_display(&scenario);
                match format {
                    OutputFormat::Text => Ok(format_scenario_text(&view)),
                    OutputFormat::Json => format_scenario_json(&view),
                }
            }
            Commands::Config => format_config_toml(&self.config),
        }
    }
}

fn load_config(
    workspace_root: &Path,
    config_path: Option<&Path>,
) -> Result<VertraceConfig, ApiError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace_root)?,
    };
    Ok(config)
}
