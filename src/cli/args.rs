//! CLI argument definitions using clap
//!
//! Commands:
//! - reqmap map --schemas <dir> --type <Name> [--payload <file>] [--config <file>]
//! - reqmap check --schemas <dir>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// reqmap - map JSON request payloads into validated, typed objects
#[derive(Parser, Debug)]
#[command(name = "reqmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and map one payload into a mapped type
    Map {
        /// Directory of mapped-type JSON files
        #[arg(long)]
        schemas: PathBuf,

        /// Name of the target mapped type
        #[arg(long = "type")]
        type_name: String,

        /// Payload file (reads one JSON line from stdin if omitted)
        #[arg(long)]
        payload: Option<PathBuf>,

        /// Mapper configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load a schema directory and verify type references
    Check {
        /// Directory of mapped-type JSON files
        #[arg(long)]
        schemas: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
