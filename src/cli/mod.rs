//! CLI module for reqmap
//!
//! Provides command-line interface for:
//! - map: Validate and map one JSON payload into a mapped type
//! - check: Load a schema directory and verify references

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, map, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_payload, write_error, write_mapper_error, write_response};
