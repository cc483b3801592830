//! CLI parse: clap types for vertrace. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// vertrace CLI - inspect captured vertex traces
#[derive(Parser, Debug)]
#[command(name = "vertrace")]
#[command(about = "Inspect traces captured from vertex-centric graph computations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/ lookup)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Trace root directory (overrides configuration)
    #[arg(long)]
    pub trace_root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List vertices captured at a step
    Vertices {
        /// Job id
        #[arg(long)]
        job: String,
        /// Computation step
        #[arg(long)]
        step: u64,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List steps with at least one trace
    Steps {
        /// Job id
        #[arg(long)]
        job: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show one captured scenario
    Show {
        /// Job id
        #[arg(long)]
        job: String,
        /// Computation step
        #[arg(long)]
        step: u64,
        /// Vertex id (string form)
        #[arg(long)]
        vertex: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
