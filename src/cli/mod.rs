//! CLI module for docbridge
//!
//! Provides command-line interface for:
//! - compile: lower one expression into a `$where` script
//! - plan: build the selector and find options for one query descriptor

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compile, plan, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
