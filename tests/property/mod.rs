//! Property-based tests for the trace format and addressing

mod address_bijection;
mod scenario_round_trip;
