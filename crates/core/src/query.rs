//! Record store query model
//!
//! A [`Query`] is a selector over JSON record fields plus a sort order and an
//! optional index hint. Paths are dotted (`sign.signer`). Evaluation lives in
//! the storage crate; this module only describes queries.
//!
//! ```
//! use covenant_core::query::{Query, Selector};
//!
//! let query = Query::new(Selector::and(vec![
//!     Selector::exists("@contract"),
//!     Selector::eq("sign.signer", "alice"),
//! ]))
//! .sort_desc("created_time")
//! .use_index("contract", "created-time");
//!
//! assert_eq!(query.sort.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

/// A condition on one field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Eq(JsonValue),
    /// Field present and not equal to the value
    Ne(JsonValue),
    /// Field greater than the value
    Gt(JsonValue),
    /// Field greater than or equal to the value
    Gte(JsonValue),
    /// Field less than the value
    Lt(JsonValue),
    /// Field less than or equal to the value
    Lte(JsonValue),
    /// Field present (`true`) or absent (`false`)
    Exists(bool),
}

/// Record selector
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Condition on a dotted field path
    Field {
        /// Dotted path into the record
        path: String,
        /// Condition the field must satisfy
        condition: Condition,
    },
    /// All sub-selectors must match
    And(Vec<Selector>),
}

impl Selector {
    /// Conjunction
    pub fn and(selectors: Vec<Selector>) -> Self {
        Selector::And(selectors)
    }

    /// Condition on `path`
    pub fn field(path: impl Into<String>, condition: Condition) -> Self {
        Selector::Field {
            path: path.into(),
            condition,
        }
    }

    /// `path == value`
    pub fn eq(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::field(path, Condition::Eq(value.into()))
    }

    /// `path > value`
    pub fn gt(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::field(path, Condition::Gt(value.into()))
    }

    /// `path <= value`
    pub fn lte(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::field(path, Condition::Lte(value.into()))
    }

    /// `path` is present
    pub fn exists(path: impl Into<String>) -> Self {
        Self::field(path, Condition::Exists(true))
    }

    /// `path` is absent
    pub fn missing(path: impl Into<String>) -> Self {
        Self::field(path, Condition::Exists(false))
    }

    /// Render in Mango-style JSON (for logs and debugging)
    pub fn to_json(&self) -> JsonValue {
        match self {
            Selector::Field { path, condition } => {
                let cond = match condition {
                    Condition::Eq(v) => v.clone(),
                    Condition::Ne(v) => json!({ "$ne": v }),
                    Condition::Gt(v) => json!({ "$gt": v }),
                    Condition::Gte(v) => json!({ "$gte": v }),
                    Condition::Lt(v) => json!({ "$lt": v }),
                    Condition::Lte(v) => json!({ "$lte": v }),
                    Condition::Exists(b) => json!({ "$exists": b }),
                };
                let mut obj = Map::new();
                obj.insert(path.clone(), cond);
                JsonValue::Object(obj)
            }
            Selector::And(parts) => {
                json!({ "$and": parts.iter().map(Selector::to_json).collect::<Vec<_>>() })
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Dotted field path
    pub path: String,
    /// Direction
    pub order: SortOrder,
}

/// Index hint: design document and index name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexHint {
    /// Design document (index group)
    pub design_doc: String,
    /// Index name within the group
    pub name: String,
}

impl std::fmt::Display for IndexHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.design_doc, self.name)
    }
}

/// Selector + sort + index hint
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Which records match
    pub selector: Selector,
    /// Result order; ties are broken by record key
    pub sort: Vec<SortField>,
    /// Preferred index
    pub use_index: Option<IndexHint>,
}

impl Query {
    /// Unsorted query without an index hint
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            sort: Vec::new(),
            use_index: None,
        }
    }

    /// Append an ascending sort key
    pub fn sort_asc(mut self, path: impl Into<String>) -> Self {
        self.sort.push(SortField {
            path: path.into(),
            order: SortOrder::Asc,
        });
        self
    }

    /// Append a descending sort key
    pub fn sort_desc(mut self, path: impl Into<String>) -> Self {
        self.sort.push(SortField {
            path: path.into(),
            order: SortOrder::Desc,
        });
        self
    }

    /// Set the index hint
    pub fn use_index(mut self, design_doc: impl Into<String>, name: impl Into<String>) -> Self {
        self.use_index = Some(IndexHint {
            design_doc: design_doc.into(),
            name: name.into(),
        });
        self
    }

    /// Render in Mango-style JSON (for logs and debugging)
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("selector".to_string(), self.selector.to_json());
        if !self.sort.is_empty() {
            let sort: Vec<JsonValue> = self
                .sort
                .iter()
                .map(|s| {
                    let mut key = Map::new();
                    key.insert(s.path.clone(), json!(s.order));
                    JsonValue::Object(key)
                })
                .collect();
            obj.insert("sort".to_string(), JsonValue::Array(sort));
        }
        if let Some(hint) = &self.use_index {
            obj.insert(
                "use_index".to_string(),
                json!([hint.design_doc, hint.name]),
            );
        }
        JsonValue::Object(obj)
    }
}

/// Pagination metadata returned with every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// Records returned in this page
    pub fetched_records_count: usize,
    /// Cursor to pass back for the next page
    pub bookmark: String,
}
