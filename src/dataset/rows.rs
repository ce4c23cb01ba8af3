//! Fetched rows

use serde::Serialize;
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use crate::store::{Cursor, Document};

/// A single fetched record, fields in store order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(Document);

impl Row {
    /// Returns the value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for Row {
    fn from(document: Document) -> Self {
        Row(document)
    }
}

/// Lazy, single-pass iterator over a find cursor.
///
/// The first row fixes the column list. A store error ends iteration after
/// it has been yielded.
pub struct Rows<'s> {
    cursor: Cursor<'s>,
    context: String,
    columns: Option<Vec<String>>,
    done: bool,
}

impl<'s> Rows<'s> {
    pub(crate) fn new(cursor: Cursor<'s>, context: String) -> Self {
        Self {
            cursor,
            context,
            columns: None,
            done: false,
        }
    }

    /// Column names of the first row, empty until one has been read
    pub fn columns(&self) -> &[String] {
        self.columns.as_deref().unwrap_or_default()
    }
}

impl Iterator for Rows<'_> {
    type Item = QueryResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.cursor.next() {
            None => {
                self.done = true;
                None
            }
            Some(Err(source)) => {
                self.done = true;
                Some(Err(QueryError::StoreFailure {
                    context: self.context.clone(),
                    source,
                }))
            }
            Some(Ok(document)) => {
                if self.columns.is_none() {
                    self.columns = Some(document.keys().cloned().collect());
                }
                Some(Ok(Row(document)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_columns_fixed_by_first_row() {
        let documents = vec![
            Ok(doc(json!({"_id": 1, "name": "al"}))),
            Ok(doc(json!({"_id": 2, "name": "bo", "age": 3}))),
        ];
        let mut rows = Rows::new(Box::new(documents.into_iter()), "ctx".into());
        assert!(rows.columns().is_empty());

        let first = rows.next().unwrap().unwrap();
        assert_eq!(first.get("name"), Some(&json!("al")));
        assert_eq!(rows.columns(), ["_id", "name"]);

        rows.next().unwrap().unwrap();
        assert_eq!(rows.columns(), ["_id", "name"]);
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_cursor_error_ends_iteration() {
        let documents = vec![
            Err(StoreError::Unavailable("gone".into())),
            Ok(doc(json!({"_id": 1}))),
        ];
        let mut rows = Rows::new(Box::new(documents.into_iter()), "DB[t].find({}, {})".into());

        match rows.next() {
            Some(Err(QueryError::StoreFailure { context, .. })) => {
                assert_eq!(context, "DB[t].find({}, {})")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::from(doc(json!({"a": 1, "b": 2})));
        assert_eq!(row.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(row.len(), 2);
        assert_eq!(serde_json::to_value(&row).unwrap(), json!({"a": 1, "b": 2}));
    }
}
