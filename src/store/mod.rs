//! Document store collaborator
//!
//! The store owns connections, pooling, and the evaluation of `$where`
//! scripts. This crate only talks to it through `DocumentStore`: one call
//! per dataset operation, with fully built request documents.

mod errors;
mod memory;
mod ordering;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use ordering::{compare_values, sort_documents};

use serde_json::{Map, Value};

use crate::request::{FindOptions, Selector, UpdateDocument, UpdateOptions};

/// Stored record: field name to value, in field order
pub type Document = Map<String, Value>;

/// Forward-only cursor over find results
pub type Cursor<'a> = Box<dyn Iterator<Item = StoreResult<Document>> + Send + 'a>;

/// Trait for the store backend
pub trait DocumentStore: Send + Sync {
    /// Count documents matching the selector, honoring limit and skip
    fn count(&self, collection: &str, selector: &Selector, options: &FindOptions)
        -> StoreResult<u64>;

    /// Open a cursor over matching documents
    fn find(
        &self,
        collection: &str,
        selector: &Selector,
        options: &FindOptions,
    ) -> StoreResult<Cursor<'_>>;

    /// Insert a document, returning the identifier the store assigned
    fn insert(&self, collection: &str, document: Document) -> StoreResult<Value>;

    /// Remove every matching document
    fn remove(&self, collection: &str, selector: &Selector) -> StoreResult<()>;

    /// Apply an update document, returning the acknowledgement document
    fn update(
        &self,
        collection: &str,
        selector: &Selector,
        update: &UpdateDocument,
        options: &UpdateOptions,
    ) -> StoreResult<Document>;
}
