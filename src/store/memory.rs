//! In-memory store
//!
//! Keeps collections as insertion-ordered document lists behind an
//! `RwLock`. It cannot run scripts: each `$where` text it should understand
//! is registered up front with a Rust closure standing in for it. Every
//! trait call is counted, which lets tests prove a call never happened.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::ordering::sort_documents;
use super::{Cursor, Document, DocumentStore};
use crate::request::{FindOptions, Selector, UpdateDocument, UpdateOptions};

type Evaluator = Box<dyn Fn(&Document) -> bool + Send + Sync>;

/// In-memory storage backend for testing
pub struct MemoryStore {
    data: RwLock<HashMap<String, Vec<Document>>>,
    evaluators: HashMap<String, Evaluator>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            evaluators: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers the meaning of a `$where` script
    pub fn with_where(
        mut self,
        script: impl Into<String>,
        evaluator: impl Fn(&Document) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.evaluators.insert(script.into(), Box::new(evaluator));
        self
    }

    /// Number of store calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of a collection, not counted as a call
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.data
            .read()
            .map(|data| data.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn matches(&self, selector: &Selector, document: &Document) -> StoreResult<bool> {
        match selector.where_clause() {
            None => Ok(true),
            Some(script) => self
                .evaluators
                .get(script)
                .map(|evaluate| evaluate(document))
                .ok_or_else(|| {
                    StoreError::Operation(format!("no evaluator registered for $where {}", script))
                }),
        }
    }

    fn matching(&self, documents: &[Document], selector: &Selector) -> StoreResult<Vec<Document>> {
        let mut selected = Vec::new();
        for document in documents {
            if self.matches(selector, document)? {
                selected.push(document.clone());
            }
        }
        Ok(selected)
    }

    /// Evaluates the selector against every document before anything changes
    fn matching_flags(&self, documents: &[Document], selector: &Selector) -> StoreResult<Vec<bool>> {
        documents
            .iter()
            .map(|document| self.matches(selector, document))
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(collection: &str) -> StoreResult<()> {
    if collection.is_empty() || collection.contains('$') {
        return Err(StoreError::InvalidName(format!(
            "collection names cannot be empty or contain '$': {:?}",
            collection
        )));
    }
    Ok(())
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Window of `total` items left after skip and limit. A limit of 0 means none.
fn window(total: usize, options: &FindOptions) -> (usize, usize) {
    let skip = options.skip.unwrap_or(0) as usize;
    let remaining = total.saturating_sub(skip);
    let take = match options.limit {
        Some(limit) if limit > 0 => remaining.min(limit as usize),
        _ => remaining,
    };
    (skip, take)
}

fn project(document: Document, fields: &[String]) -> Document {
    document
        .into_iter()
        .filter(|(key, _)| key == "_id" || fields.contains(key))
        .collect()
}

impl DocumentStore for MemoryStore {
    fn count(
        &self,
        collection: &str,
        selector: &Selector,
        options: &FindOptions,
    ) -> StoreResult<u64> {
        self.record_call();
        check_name(collection)?;

        let data = self.data.read().map_err(lock_error)?;
        let documents = data.get(collection).map(Vec::as_slice).unwrap_or_default();
        let matched = self.matching(documents, selector)?;

        let (_, take) = window(matched.len(), options);
        Ok(take as u64)
    }

    fn find(
        &self,
        collection: &str,
        selector: &Selector,
        options: &FindOptions,
    ) -> StoreResult<Cursor<'_>> {
        self.record_call();
        check_name(collection)?;

        let data = self.data.read().map_err(lock_error)?;
        let documents = data.get(collection).map(Vec::as_slice).unwrap_or_default();
        let mut matched = self.matching(documents, selector)?;

        if let Some(keys) = &options.sort {
            sort_documents(&mut matched, keys);
        }

        let (skip, take) = window(matched.len(), options);
        let fields = options.fields.clone();
        let results = matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(move |document| match &fields {
                Some(fields) => Ok(project(document, fields)),
                None => Ok(document),
            });

        Ok(Box::new(results))
    }

    fn insert(&self, collection: &str, document: Document) -> StoreResult<Value> {
        self.record_call();
        check_name(collection)?;

        let id = document
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Value::String(uuid::Uuid::new_v4().to_string()));

        let mut stored = Document::new();
        stored.insert("_id".to_string(), id.clone());
        stored.extend(document.into_iter().filter(|(key, _)| key != "_id"));

        let mut data = self.data.write().map_err(lock_error)?;
        data.entry(collection.to_string()).or_default().push(stored);

        Ok(id)
    }

    fn remove(&self, collection: &str, selector: &Selector) -> StoreResult<()> {
        self.record_call();
        check_name(collection)?;

        let mut data = self.data.write().map_err(lock_error)?;
        if let Some(documents) = data.get_mut(collection) {
            let doomed = self.matching_flags(documents, selector)?;
            let mut flags = doomed.into_iter();
            documents.retain(|_| !flags.next().unwrap_or(false));
        }
        Ok(())
    }

    fn update(
        &self,
        collection: &str,
        selector: &Selector,
        update: &UpdateDocument,
        options: &UpdateOptions,
    ) -> StoreResult<Document> {
        self.record_call();
        check_name(collection)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut updated = 0u64;
        if let Some(documents) = data.get_mut(collection) {
            let flags = self.matching_flags(documents, selector)?;
            for (document, matched) in documents.iter_mut().zip(flags) {
                if !matched {
                    continue;
                }
                for (field, value) in &update.set {
                    document.insert(field.clone(), value.clone());
                }
                updated += 1;
                if !options.multi {
                    break;
                }
            }
        }

        if !options.safe {
            return Ok(Document::new());
        }

        let mut ack = Document::new();
        ack.insert("n".to_string(), Value::from(updated));
        ack.insert("updatedExisting".to_string(), Value::Bool(updated > 0));
        ack.insert("ok".to_string(), Value::from(1.0));
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SortSpec;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new().with_where("adults", |d| {
            d.get("age").and_then(Value::as_i64).unwrap_or(0) >= 18
        });
        for (name, age) in [("al", 30), ("bo", 12), ("cy", 45)] {
            store
                .insert("users", doc(json!({"_id": name, "name": name, "age": age})))
                .unwrap();
        }
        store
    }

    fn collect(cursor: Cursor<'_>) -> Vec<Document> {
        cursor.map(Result::unwrap).collect()
    }

    #[test]
    fn test_insert_assigns_id() {
        let store = MemoryStore::new();
        let id = store.insert("t", doc(json!({"x": 1}))).unwrap();
        assert!(id.is_string());

        let docs = store.documents("t");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].keys().next().map(String::as_str), Some("_id"));
    }

    #[test]
    fn test_find_all_and_where() {
        let store = seeded();
        let all = collect(store.find("users", &Selector::all(), &FindOptions::default()).unwrap());
        assert_eq!(all.len(), 3);

        let adults = collect(
            store
                .find("users", &Selector::where_script("adults"), &FindOptions::default())
                .unwrap(),
        );
        assert_eq!(adults.len(), 2);
    }

    #[test]
    fn test_unknown_script_fails() {
        let store = seeded();
        let err = store
            .count("users", &Selector::where_script("this.x"), &FindOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_STORE_OPERATION");
    }

    #[test]
    fn test_find_options() {
        let store = seeded();
        let options = FindOptions {
            limit: Some(1),
            skip: Some(1),
            fields: Some(vec!["age".to_string()]),
            sort: Some(vec![SortSpec::desc("age")]),
        };
        let docs = collect(store.find("users", &Selector::all(), &options).unwrap());

        assert_eq!(docs, vec![doc(json!({"_id": "al", "age": 30}))]);
    }

    #[test]
    fn test_count_honors_window() {
        let store = seeded();
        let options = FindOptions {
            skip: Some(2),
            ..FindOptions::default()
        };
        assert_eq!(store.count("users", &Selector::all(), &options).unwrap(), 1);
        assert_eq!(
            store
                .count("users", &Selector::all(), &FindOptions::default())
                .unwrap(),
            3
        );
    }

    #[test]
    fn test_update_single_and_multi() {
        let store = seeded();
        let set = UpdateDocument::set(doc(json!({"flag": true})));

        let single = UpdateOptions {
            safe: true,
            multi: false,
        };
        let ack = store.update("users", &Selector::all(), &set, &single).unwrap();
        assert_eq!(ack["n"], json!(1));

        let multi = UpdateOptions {
            safe: true,
            multi: true,
        };
        let ack = store.update("users", &Selector::all(), &set, &multi).unwrap();
        assert_eq!(ack["n"], json!(3));
        assert_eq!(
            Value::Object(ack),
            json!({"n": 3, "updatedExisting": true, "ok": 1.0})
        );
        assert!(store.documents("users").iter().all(|d| d["flag"] == json!(true)));
    }

    #[test]
    fn test_unacknowledged_update_has_no_count() {
        let store = seeded();
        let set = UpdateDocument::set(doc(json!({"flag": true})));
        let options = UpdateOptions {
            safe: false,
            multi: true,
        };
        let ack = store.update("users", &Selector::all(), &set, &options).unwrap();
        assert!(ack.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = seeded();
        store.remove("users", &Selector::where_script("adults")).unwrap();
        let left = store.documents("users");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0]["name"], json!("bo"));
    }

    #[test]
    fn test_invalid_collection_name() {
        let store = MemoryStore::new();
        let err = store.insert("bad$name", Document::new()).unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_STORE_INVALID_NAME");
    }

    #[test]
    fn test_calls_are_counted() {
        let store = seeded();
        assert_eq!(store.calls(), 3);
        store.documents("users");
        assert_eq!(store.calls(), 3);
        store.remove("users", &Selector::all()).unwrap();
        assert_eq!(store.calls(), 4);
    }
}
