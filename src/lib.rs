//! docbridge - relational queries over a script-evaluating document store
//!
//! Predicates are compiled into a `$where` script, clauses into native find
//! options, and the dataset operations into single store calls. Joins,
//! grouping and having are rejected rather than approximated.

pub mod ast;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod dataset;
pub mod observability;
pub mod request;
pub mod store;
