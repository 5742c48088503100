//! Secondary indices for efficient query patterns
//!
//! Indexes are declared by name (`design_doc/name`) with an ordered list of
//! fields, the way a document store declares them. Declaring an index also
//! maintains a `FieldIndex` on its leading field: string value → keys. A
//! query whose selector pins that field with an equality only visits the
//! keys in that set instead of the whole map.
//!
//! Queries naming an undeclared index are logged and fall back to a full
//! scan.

use std::collections::{BTreeSet, HashMap};

use covenant_core::{IndexHint, Selector};

use crate::selector::{equality_on, lookup};
use crate::stored_value::StoredValue;

/// A declared index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// `design_doc/name`
    pub hint: IndexHint,
    /// Indexed fields, leading field first
    pub fields: Vec<String>,
}

/// Secondary index: string value of one field → keys
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    field: String,
    index: HashMap<String, BTreeSet<String>>,
}

impl FieldIndex {
    /// Create an empty index on `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            index: HashMap::new(),
        }
    }

    /// Indexed field path
    pub fn field(&self) -> &str {
        &self.field
    }

    fn value_of<'a>(&self, value: &'a StoredValue) -> Option<&'a str> {
        value
            .document()
            .and_then(|doc| lookup(doc, &self.field))
            .and_then(|v| v.as_str())
    }

    /// Add `key` under its field value, if it has one
    pub fn insert(&mut self, key: &str, value: &StoredValue) {
        if let Some(v) = self.value_of(value) {
            self.index
                .entry(v.to_string())
                .or_default()
                .insert(key.to_string());
        }
    }

    /// Remove `key` from under its field value
    ///
    /// Drops the entry once its set is empty.
    pub fn remove(&mut self, key: &str, value: &StoredValue) {
        if let Some(v) = self.value_of(value) {
            if let Some(keys) = self.index.get_mut(v) {
                keys.remove(key);
                if keys.is_empty() {
                    self.index.remove(v);
                }
            }
        }
    }

    /// Keys whose field equals `value`
    pub fn get(&self, value: &str) -> Option<&BTreeSet<String>> {
        self.index.get(value)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// How a query will visit the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPlan {
    /// Visit every key
    Full,
    /// Visit only these keys
    Keys(BTreeSet<String>),
}

/// Declared indexes and their field indices
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    definitions: HashMap<IndexHint, IndexDefinition>,
    fields: HashMap<String, FieldIndex>,
}

impl IndexRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an index, backfilling its field index from `existing`
    ///
    /// Redeclaring a name replaces its field list.
    pub fn define<'a, I>(&mut self, definition: IndexDefinition, existing: I)
    where
        I: IntoIterator<Item = (&'a String, &'a StoredValue)>,
    {
        if let Some(leading) = definition.fields.first() {
            if !self.fields.contains_key(leading) {
                let mut field_index = FieldIndex::new(leading.clone());
                for (key, value) in existing {
                    field_index.insert(key, value);
                }
                self.fields.insert(leading.clone(), field_index);
            }
        }
        self.definitions.insert(definition.hint.clone(), definition);
    }

    /// Look up a declared index
    pub fn definition(&self, hint: &IndexHint) -> Option<&IndexDefinition> {
        self.definitions.get(hint)
    }

    /// Number of declared indexes
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if no index is declared
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Keep field indices in step with a write
    pub fn on_write(&mut self, key: &str, old: Option<&StoredValue>, new: &StoredValue) {
        for field_index in self.fields.values_mut() {
            if let Some(old) = old {
                field_index.remove(key, old);
            }
            field_index.insert(key, new);
        }
    }

    /// Choose how to evaluate `selector` under an optional hint
    ///
    /// A declared hint is used when its leading field is pinned by an
    /// equality. Without a hint any pinned indexed field is used. An
    /// undeclared hint means a full scan.
    pub fn plan(&self, selector: &Selector, hint: Option<&IndexHint>) -> ScanPlan {
        let candidates: Vec<&FieldIndex> = match hint {
            Some(hint) => match self.definitions.get(hint) {
                Some(def) => def
                    .fields
                    .first()
                    .and_then(|f| self.fields.get(f))
                    .into_iter()
                    .collect(),
                None => {
                    tracing::warn!(
                        target: "covenant::storage",
                        index = %hint,
                        "Unknown index hint, falling back to full scan"
                    );
                    return ScanPlan::Full;
                }
            },
            None => self.fields.values().collect(),
        };

        candidates
            .into_iter()
            .filter_map(|fi| {
                equality_on(selector, fi.field())
                    .map(|value| fi.get(value).cloned().unwrap_or_default())
            })
            .min_by_key(BTreeSet::len)
            .map_or(ScanPlan::Full, ScanPlan::Keys)
    }
}
