//! JSON I/O handling for CLI
//!
//! - Input: single JSON object via stdin (may span lines)
//! - Output: single JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    read_request_from(io::stdin().lock())
}

pub(crate) fn read_request_from(mut reader: impl Read) -> CliResult<Value> {
    let mut body = String::new();
    reader.read_to_string(&mut body)?;

    if body.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(io::stdout().lock(), &json!({"status": "ok", "data": data}))
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    write_line(io::stdout().lock(), &error_body(error))
}

pub(crate) fn error_body(error: &CliError) -> Value {
    json!({
        "status": "error",
        "code": error.code(),
        "message": error.message()
    })
}

pub(crate) fn write_line(mut writer: impl Write, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
