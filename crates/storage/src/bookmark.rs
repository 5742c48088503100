//! Pagination bookmarks
//!
//! A bookmark records the sort-key values and the record key of the last
//! record returned. Resuming skips every record that sorts at or before
//! that position, so pages stay stable while unrelated records change.
//! The wire form is URL-safe base64 of the JSON encoding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use covenant_core::{CovenantError, CovenantResult};

/// One sort-key value at the bookmark position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortValue {
    /// Field absent from the record
    Missing,
    /// Field value
    Present(JsonValue),
}

impl SortValue {
    /// As an optional JSON value
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            SortValue::Missing => None,
            SortValue::Present(v) => Some(v),
        }
    }
}

impl From<Option<&JsonValue>> for SortValue {
    fn from(value: Option<&JsonValue>) -> Self {
        value.map_or(SortValue::Missing, |v| SortValue::Present(v.clone()))
    }
}

/// Decoded bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Sort-key values of the last returned record
    pub values: Vec<SortValue>,
    /// Record key of the last returned record
    pub key: String,
}

impl Bookmark {
    /// Opaque string form
    pub fn encode(&self) -> CovenantResult<String> {
        let json = serde_json::to_vec(self).map_err(|e| CovenantError::Serialization {
            reason: format!("failed to encode the bookmark: {}", e),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Parse the opaque string form
    pub fn decode(encoded: &str) -> CovenantResult<Bookmark> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| CovenantError::invalid_input(format!("invalid bookmark: {}", encoded)))?;
        serde_json::from_slice(&bytes)
            .map_err(|_| CovenantError::invalid_input(format!("invalid bookmark: {}", encoded)))
    }
}
