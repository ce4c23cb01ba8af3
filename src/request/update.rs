//! Update document and per-call update options

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::WriteConcern;

/// `{"$set": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateDocument {
    #[serde(rename = "$set")]
    pub set: Map<String, Value>,
}

impl UpdateDocument {
    pub fn set(fields: Map<String, Value>) -> Self {
        Self { set: fields }
    }

    pub fn to_document(&self) -> Value {
        json!({ "$set": self.set })
    }
}

/// Flags sent with one update call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateOptions {
    /// Wait for an acknowledgement carrying the affected count
    pub safe: bool,
    /// Apply to every matching document instead of the first
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multi: bool,
}

impl UpdateOptions {
    pub fn new(concern: WriteConcern, multi: bool) -> Self {
        Self {
            safe: concern.safe,
            multi,
        }
    }

    pub fn to_document(&self) -> Value {
        let mut document = Map::new();
        document.insert("safe".to_string(), Value::Bool(self.safe));
        if self.multi {
            document.insert("multi".to_string(), Value::Bool(true));
        }
        Value::Object(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_document() {
        let mut fields = Map::new();
        fields.insert("name".into(), json!("Bo"));
        assert_eq!(
            UpdateDocument::set(fields).to_document(),
            json!({"$set": {"name": "Bo"}})
        );
    }

    #[test]
    fn test_multi_only_when_set() {
        let single = UpdateOptions::new(WriteConcern::default(), false);
        assert_eq!(single.to_document(), json!({"safe": true}));

        let multi = UpdateOptions::new(WriteConcern::default(), true);
        assert_eq!(multi.to_document(), json!({"safe": true, "multi": true}));
        assert_eq!(multi.to_document(), serde_json::to_value(multi).unwrap());
    }

    #[test]
    fn test_unacknowledged() {
        let options = UpdateOptions::new(WriteConcern { safe: false }, false);
        assert!(!options.safe);
    }
}
