//! Integration tests for trace capture, storage and queries

mod cli_commands;
mod config_integration;
mod scenario_end_to_end;
mod selection_sampling;
mod test_utils;
mod type_constraints;
