//! CLI command implementations
//!
//! `map`: load config, load schemas, read the payload, map, write the result.
//! `check`: load schemas and verify that every referenced type exists.
//!
//! Each command writes exactly one JSON response.

use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use crate::config::MapperConfig;
use crate::mapper::{PayloadProvider, RequestMapper};
use crate::rules::BasicRuleEngine;
use crate::schema::SchemaRegistry;

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_payload, write_error, write_mapper_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let mut stdout = io::stdout();
    let result = match cmd {
        Command::Map {
            schemas,
            type_name,
            payload,
            config,
        } => map(
            &schemas,
            &type_name,
            payload.as_deref(),
            config.as_deref(),
            &mut stdout,
        ),
        Command::Check { schemas } => check(&schemas, &mut stdout),
    };

    // Mapping failures already wrote a detailed response.
    if let Err(e) = &result {
        if e.code() != CliErrorCode::MappingFailed {
            write_error(&mut stdout, e.code_str(), e.message())?;
        }
    }
    result
}

fn load_config(path: Option<&Path>) -> CliResult<MapperConfig> {
    match path {
        Some(path) => Ok(MapperConfig::load(path)?),
        None => {
            let config = MapperConfig::default();
            config.apply_logging();
            Ok(config)
        }
    }
}

fn load_registry(schemas: &Path) -> CliResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.load_dir(schemas)?;
    registry.check_references()?;
    Ok(registry)
}

/// Map one payload into `type_name` and write the instance
pub fn map<W: Write>(
    schemas: &Path,
    type_name: &str,
    payload: Option<&Path>,
    config: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let config = load_config(config)?;
    let registry = load_registry(schemas)?;

    if !registry.contains(type_name) {
        return Err(CliError::schema_error(format!(
            "'{}' is not defined in {}",
            type_name,
            schemas.display()
        )));
    }

    let payload = read_payload(payload)?;
    map_payload(&registry, type_name, &payload, config, out)
}

fn map_payload<W: Write>(
    registry: &SchemaRegistry,
    type_name: &str,
    payload: &dyn PayloadProvider,
    config: MapperConfig,
    out: &mut W,
) -> CliResult<()> {
    let engine = BasicRuleEngine::new();
    let mapper = RequestMapper::with_config(registry, &engine, config);

    match mapper.map_from(type_name, payload) {
        Ok(object) => write_response(out, serde_json::to_value(&object)?),
        Err(err) => {
            write_mapper_error(out, &err)?;
            Err(CliError::mapping_failed(&err))
        }
    }
}

/// Load a schema directory, verify references and list the types
pub fn check<W: Write>(schemas: &Path, out: &mut W) -> CliResult<()> {
    let registry = load_registry(schemas)?;
    write_response(
        out,
        json!({
            "count": registry.len(),
            "types": registry.type_names()
        }),
    )
}
