//! CLI domain: parse, route, output and presentation only.
//! No domain orchestration; a single route table dispatches to the query layer.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_config_toml, format_scenario_json, format_scenario_text, format_steps_json,
    format_steps_text, format_vertices_json, format_vertices_text,
};
pub use route::RunContext;
