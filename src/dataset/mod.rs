//! Dataset operations over a document store
//!
//! ```
//! use docbridge::ast::{Expr, Query};
//! use docbridge::dataset::Dataset;
//! use docbridge::store::MemoryStore;
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! let users = Dataset::new(&store, Query::new("users"));
//! users.insert([("name", json!("Al"))]).unwrap();
//! assert_eq!(users.count().unwrap(), 1);
//! ```

mod errors;
mod mapper;
mod rows;

pub use errors::{QueryError, QueryResult};
pub use mapper::Dataset;
pub use rows::{Row, Rows};
