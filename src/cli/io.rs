//! JSON I/O handling for the CLI
//!
//! - Input: one JSON payload, from a file or a single stdin line
//! - Output: one JSON object per invocation
//! - UTF-8 only

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::mapper::{JsonPayload, MapperError};

/// Read the raw payload text from `path`, or one line from stdin
pub fn read_payload(path: Option<&Path>) -> CliResult<JsonPayload> {
    let text = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read payload '{}': {}", path.display(), e))
        })?,
        None => read_line(&mut io::stdin().lock())?,
    };

    if text.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(JsonPayload::new(text))
}

fn read_line<R: BufRead>(reader: &mut R) -> CliResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    write_json(
        out,
        &json!({
            "status": "ok",
            "data": data
        }),
    )
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_json(
        out,
        &json!({
            "status": "error",
            "code": code,
            "message": message
        }),
    )
}

/// Write a mapper failure, including per-field messages for validation failures
pub fn write_mapper_error<W: Write>(out: &mut W, err: &MapperError) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": err.code(),
        "message": err.to_string()
    });

    if let (Some(failure), Some(obj)) = (err.as_validation(), response.as_object_mut()) {
        obj.insert("messages".to_string(), serde_json::to_value(failure.messages())?);
    }

    write_json(out, &response)
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
