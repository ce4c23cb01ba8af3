//! CLI argument definitions using clap
//!
//! Commands:
//! - docbridge compile --table <name>
//! - docbridge plan

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docbridge - lower relational queries onto a document store
#[derive(Parser, Debug)]
#[command(name = "docbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an adapter configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Tracing filter, e.g. "docbridge=debug"
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Compile an expression read from stdin into a $where script
    Compile {
        /// Collection whose fields resolve to `this`
        #[arg(long)]
        table: String,
    },

    /// Build the selector and find options for a query read from stdin
    Plan,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
