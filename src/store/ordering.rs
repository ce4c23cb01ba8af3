//! Document ordering for sorted finds

use std::cmp::Ordering;

use serde_json::Value;

use super::Document;
use crate::request::{SortDirection, SortSpec};

/// Sorts documents by each key in turn. Stable: ties keep insertion order.
pub fn sort_documents(documents: &mut [Document], keys: &[SortSpec]) {
    documents.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = compare_values(a.get(&key.field), b.get(&key.field));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// Compares two field values.
///
/// Missing < null < bool < number < string < array < object. Arrays and
/// objects compare equal among themselves.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let by_type = type_rank(a).cmp(&type_rank(b));
            if by_type != Ordering::Equal {
                return by_type;
            }
            match (a, b) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => {
                    let x = x.as_f64().unwrap_or(0.0);
                    let y = y.as_f64().unwrap_or(0.0);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d["_id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut docs = vec![
            doc(json!({"_id": "c", "age": 30})),
            doc(json!({"_id": "a", "age": 20})),
            doc(json!({"_id": "b", "age": 25})),
        ];

        sort_documents(&mut docs, &[SortSpec::asc("age")]);
        assert_eq!(ids(&docs), ["a", "b", "c"]);

        sort_documents(&mut docs, &[SortSpec::desc("age")]);
        assert_eq!(ids(&docs), ["c", "b", "a"]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let mut docs = vec![
            doc(json!({"_id": "1", "age": 25, "name": "carol"})),
            doc(json!({"_id": "2", "age": 20, "name": "bob"})),
            doc(json!({"_id": "3", "age": 25, "name": "alice"})),
        ];

        sort_documents(&mut docs, &[SortSpec::desc("age"), SortSpec::asc("name")]);
        assert_eq!(ids(&docs), ["3", "1", "2"]);
    }

    #[test]
    fn test_sort_stable() {
        let mut docs = vec![
            doc(json!({"_id": "a", "age": 25})),
            doc(json!({"_id": "b", "age": 25})),
            doc(json!({"_id": "c", "age": 25})),
        ];
        sort_documents(&mut docs, &[SortSpec::asc("age")]);
        assert_eq!(ids(&docs), ["a", "b", "c"]);
    }

    #[test]
    fn test_type_ordering() {
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Less);
        assert_eq!(
            compare_values(Some(&json!(true)), Some(&json!(1))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!("a")), Some(&json!(99))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&json!(1.5)), Some(&json!(2))),
            Ordering::Less
        );
    }
}
