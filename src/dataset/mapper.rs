//! Operation mapper
//!
//! Turns the logical dataset operations into exactly one store call each.
//! Every request document is built before the store is touched, so a
//! compile error never leaves a half-issued operation behind.

use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::rows::{Row, Rows};
use crate::ast::{Expr, JoinKind, Query};
use crate::compiler::{CompileResult, Compiler};
use crate::config::AdapterConfig;
use crate::observability::{store_call_message, StoreCall};
use crate::request::{
    build_options, build_selector, FindOptions, Selector, UpdateDocument, UpdateOptions,
};
use crate::store::{Document, DocumentStore, StoreError, StoreResult};

/// Request documents attached to one store call
#[derive(Debug, Default)]
struct CallDocuments {
    selector: Option<Value>,
    document: Option<Value>,
    update: Option<Value>,
    options: Option<Value>,
}

impl CallDocuments {
    fn find(selector: &Selector, options: &FindOptions) -> Self {
        Self {
            selector: Some(selector.to_document()),
            options: Some(options.to_document()),
            ..Self::default()
        }
    }

    /// Arguments in the order the store method takes them
    fn args(&self) -> Vec<&Value> {
        [&self.selector, &self.document, &self.update, &self.options]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// A query descriptor bound to a store
pub struct Dataset<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    query: Query,
    config: AdapterConfig,
}

impl<'s, S: DocumentStore + ?Sized> Dataset<'s, S> {
    pub fn new(store: &'s S, query: Query) -> Self {
        Self {
            store,
            query,
            config: AdapterConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn collection(&self) -> &str {
        &self.query.collection
    }

    fn compiler(&self) -> Compiler<'_> {
        Compiler::new(self.collection()).with_policy(self.config.cross_collection)
    }

    fn selector(&self) -> QueryResult<Selector> {
        Ok(build_selector(&self.query, &self.compiler())?)
    }

    fn find_request(&self) -> QueryResult<(Selector, FindOptions)> {
        let selector = self.selector()?;
        let options = build_options(&self.query, &self.compiler())?;
        Ok((selector, options))
    }

    /// Keys go through the field renderer, values are passed through
    fn field_map<K: Into<Expr>>(
        &self,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> CompileResult<Document> {
        let compiler = self.compiler();
        fields
            .into_iter()
            .map(|(key, value)| Ok((compiler.field_name(&key.into())?, value)))
            .collect()
    }

    fn describe(&self, call: StoreCall, documents: &CallDocuments) -> String {
        store_call_message(self.collection(), call, &documents.args())
    }

    /// Logs and issues one store call, wrapping any failure with its context
    fn invoke<T>(
        &self,
        call: StoreCall,
        documents: &CallDocuments,
        op: impl FnOnce(&'s S) -> StoreResult<T>,
    ) -> QueryResult<(T, String)> {
        let message = self.describe(call, documents);
        if self.config.log_queries {
            tracing::info!(
                target: "docbridge::store",
                collection = %self.collection(),
                call = call.as_str(),
                selector = documents.selector.as_ref().map(tracing::field::display),
                options = documents.options.as_ref().map(tracing::field::display),
                update = documents.update.as_ref().map(tracing::field::display),
                "{}",
                message
            );
        }

        match op(self.store) {
            Ok(value) => Ok((value, message)),
            Err(source) => Err(QueryError::StoreFailure {
                context: message,
                source,
            }),
        }
    }

    /// Number of matching records, honoring limit and offset
    pub fn count(&self) -> QueryResult<u64> {
        let (selector, options) = self.find_request()?;
        let documents = CallDocuments::find(&selector, &options);
        let collection = self.collection();

        let (count, _) = self.invoke(StoreCall::Count, &documents, |store| {
            store.count(collection, &selector, &options)
        })?;
        Ok(count)
    }

    /// Inserts one record and returns the identifier the store assigned
    pub fn insert<K: Into<Expr>>(
        &self,
        record: impl IntoIterator<Item = (K, Value)>,
    ) -> QueryResult<Value> {
        let document = self.field_map(record)?;
        let documents = CallDocuments {
            document: Some(Value::Object(document.clone())),
            ..CallDocuments::default()
        };
        let collection = self.collection();

        let (id, _) = self.invoke(StoreCall::Insert, &documents, move |store| {
            store.insert(collection, document)
        })?;
        Ok(id)
    }

    fn open(&self, selector: &Selector, options: &FindOptions) -> QueryResult<Rows<'s>> {
        let documents = CallDocuments::find(selector, options);
        let collection = self.collection();

        let (cursor, context) = self.invoke(StoreCall::Find, &documents, |store| {
            store.find(collection, selector, options)
        })?;
        Ok(Rows::new(cursor, context))
    }

    /// Lazily fetches matching records
    pub fn fetch(&self) -> QueryResult<Rows<'s>> {
        let (selector, options) = self.find_request()?;
        self.open(&selector, &options)
    }

    /// First matching record, if any
    pub fn first(&self) -> QueryResult<Option<Row>> {
        let (selector, options) = self.find_request()?;
        let mut rows = self.open(&selector, &options.with_limit(1))?;
        rows.next().transpose()
    }

    /// Removes matching records
    pub fn delete(&self) -> QueryResult<()> {
        let selector = self.selector()?;
        let documents = CallDocuments {
            selector: Some(selector.to_document()),
            ..CallDocuments::default()
        };
        let collection = self.collection();

        self.invoke(StoreCall::Remove, &documents, |store| {
            store.remove(collection, &selector)
        })?;
        Ok(())
    }

    /// Sets fields on matching records and returns how many changed.
    ///
    /// An empty selector updates every record; otherwise only the first match
    /// is changed. Unacknowledged writes report 0.
    pub fn update<K: Into<Expr>>(
        &self,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> QueryResult<u64> {
        let selector = self.selector()?;
        let update = UpdateDocument::set(self.field_map(values)?);
        let options = UpdateOptions::new(self.config.write_concern, selector.is_empty());

        let documents = CallDocuments {
            selector: Some(selector.to_document()),
            update: Some(update.to_document()),
            options: Some(options.to_document()),
            ..CallDocuments::default()
        };
        let collection = self.collection();

        let (ack, context) = self.invoke(StoreCall::Update, &documents, |store| {
            store.update(collection, &selector, &update, &options)
        })?;

        if !options.safe {
            return Ok(0);
        }

        affected_count(&ack).ok_or_else(|| QueryError::StoreFailure {
            context,
            source: StoreError::InvalidArgument(format!(
                "acknowledgement carries no document count: {}",
                Value::Object(ack.clone())
            )),
        })
    }

    /// Joins cannot be expressed against a document store
    pub fn join(&self, _kind: JoinKind, _table: &str, _on: Expr) -> QueryResult<Self> {
        Err(QueryError::unsupported("join"))
    }

    /// Grouping cannot be expressed against a document store
    pub fn group(&self, _keys: impl IntoIterator<Item = Expr>) -> QueryResult<Self> {
        Err(QueryError::unsupported("group"))
    }

    /// Having cannot be expressed against a document store
    pub fn having(&self, _predicate: Expr) -> QueryResult<Self> {
        Err(QueryError::unsupported("having"))
    }

    /// The find call a fetch would issue, without contacting the store
    pub fn explain(&self) -> QueryResult<String> {
        let (selector, options) = self.find_request()?;
        Ok(self.describe(StoreCall::Find, &CallDocuments::find(&selector, &options)))
    }
}

/// Reads `n` from an acknowledgement; some servers report it as a double
fn affected_count(ack: &Document) -> Option<u64> {
    let n = ack.get("n")?;
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}
