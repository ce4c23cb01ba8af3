//! Store call events
//!
//! One event per store round trip. The rendered text follows the shell
//! syntax of the store, `DB[users].find({...}, {...})`, so it can be pasted
//! into a console to reproduce the call.

use std::fmt;

use serde_json::Value;

/// Primitive invoked on the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    Count,
    Find,
    Insert,
    Remove,
    Update,
}

impl StoreCall {
    /// Returns the store-side method name
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreCall::Count => "count",
            StoreCall::Find => "find",
            StoreCall::Insert => "insert",
            StoreCall::Remove => "remove",
            StoreCall::Update => "update",
        }
    }
}

impl fmt::Display for StoreCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Renders `DB[collection].call(arg, arg, ...)` with compact JSON arguments
pub fn store_call_message(collection: &str, call: StoreCall, args: &[&Value]) -> String {
    let rendered: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    format!("DB[{}].{}({})", collection, call, rendered.join(", "))
}
