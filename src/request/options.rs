//! Native find options
//!
//! Limit, offset, projection, and sort map straight onto options the store
//! understands; nothing here goes through the script compiler.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::ast::Query;
use crate::compiler::{CompileResult, Compiler};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification. Serialized as a `[field, direction]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "(String, SortDirection)")]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl From<SortSpec> for (String, SortDirection) {
    fn from(spec: SortSpec) -> Self {
        (spec.field, spec.direction)
    }
}

/// Find options. Absent keys mean "store default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortSpec>>,
}

impl FindOptions {
    /// Copy with the limit replaced
    pub fn with_limit(&self, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Document form as sent to the store
    pub fn to_document(&self) -> Value {
        let mut document = Map::new();
        if let Some(limit) = self.limit {
            document.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(skip) = self.skip {
            document.insert("skip".to_string(), Value::from(skip));
        }
        if let Some(fields) = &self.fields {
            document.insert("fields".to_string(), Value::from(fields.clone()));
        }
        if let Some(sort) = &self.sort {
            let pairs = sort
                .iter()
                .map(|key| json!([key.field, key.direction.as_str()]))
                .collect();
            document.insert("sort".to_string(), Value::Array(pairs));
        }
        Value::Object(document)
    }
}

/// Builds find options from a query descriptor
pub fn build_options(query: &Query, compiler: &Compiler<'_>) -> CompileResult<FindOptions> {
    let fields = if query.select.is_empty() {
        None
    } else {
        Some(
            query
                .select
                .iter()
                .map(|column| compiler.field_name(column))
                .collect::<CompileResult<Vec<_>>>()?,
        )
    };

    let sort = if query.order.is_empty() {
        None
    } else {
        Some(
            query
                .order
                .iter()
                .map(|key| {
                    let field = compiler.field_name(&key.expr)?;
                    Ok(if key.descending {
                        SortSpec::desc(field)
                    } else {
                        SortSpec::asc(field)
                    })
                })
                .collect::<CompileResult<Vec<_>>>()?,
        )
    };

    Ok(FindOptions {
        limit: query.limit,
        skip: query.offset,
        fields,
        sort,
    })
}
