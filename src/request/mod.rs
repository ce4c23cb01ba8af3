//! Native request documents
//!
//! Selector, find options, and update documents in the shapes the store
//! accepts. Built fresh for every call and dropped after it.

mod options;
mod selector;
mod update;

pub use options::{build_options, FindOptions, SortDirection, SortSpec};
pub use selector::{build_selector, Selector};
pub use update::{UpdateDocument, UpdateOptions};
