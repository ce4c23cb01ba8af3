//! CLI command implementations
//!
//! Each command reads one JSON request, answers with one JSON response, and
//! never contacts a store.

use serde_json::{json, Value};

use crate::ast::{Expr, Query};
use crate::compiler::Compiler;
use crate::config::AdapterConfig;
use crate::observability::{self, store_call_message, StoreCall};
use crate::request::{build_options, build_selector};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main CLI entry point
///
/// Failures are reported as a JSON error response before being returned.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let result = load_config(&cli).and_then(|config| {
        let filter = cli.log.clone().unwrap_or_else(|| config.log_filter.clone());
        observability::init(&filter);
        run_command(&cli.command, &config)
    });

    if let Err(e) = &result {
        write_error(e)?;
    }
    result
}

fn load_config(cli: &Cli) -> CliResult<AdapterConfig> {
    match &cli.config {
        Some(path) => Ok(AdapterConfig::load(path)?),
        None => Ok(AdapterConfig::default()),
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: &Command, config: &AdapterConfig) -> CliResult<()> {
    let request = read_request()?;
    let data = match cmd {
        Command::Compile { table } => compile(request, table, config)?,
        Command::Plan => plan(request, config)?,
    };
    write_response(data)
}

/// Compile an expression request into `{"where": "..."}`
pub fn compile(request: Value, table: &str, config: &AdapterConfig) -> CliResult<Value> {
    let expr: Expr = serde_json::from_value(request)
        .map_err(|e| CliError::invalid_request(format!("not an expression: {}", e)))?;

    let compiler = Compiler::new(table).with_policy(config.cross_collection);
    let script = compiler.compile(&expr)?;

    tracing::debug!(table, script = %script, "compiled expression");
    Ok(json!({ "where": script }))
}

/// Build the native request documents for a query descriptor
pub fn plan(request: Value, config: &AdapterConfig) -> CliResult<Value> {
    let query: Query = serde_json::from_value(request)
        .map_err(|e| CliError::invalid_request(format!("not a query: {}", e)))?;

    let compiler = Compiler::new(&query.collection).with_policy(config.cross_collection);
    let selector = build_selector(&query, &compiler)?.to_document();
    let options = build_options(&query, &compiler)?.to_document();
    let command = store_call_message(&query.collection, StoreCall::Find, &[&selector, &options]);

    Ok(json!({
        "collection": query.collection,
        "selector": selector,
        "options": options,
        "command": command
    }))
}
