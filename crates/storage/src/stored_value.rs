//! Storage-layer value wrapper
//!
//! The contract type `VersionedValue` carries raw bytes only. Queries need
//! the parsed document, so the store keeps `StoredValue`: the bytes, the
//! commit version and the JSON document parsed once at write time.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use covenant_core::VersionedValue;

/// A stored value with its parsed document
///
/// `document` is `None` when the bytes are not a JSON object; such values
/// are readable by key but invisible to queries.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    bytes: Vec<u8>,
    version: u64,
    document: Option<Arc<JsonValue>>,
}

impl StoredValue {
    /// Wrap `bytes` written at `version`, parsing the document
    pub fn new(bytes: Vec<u8>, version: u64) -> Self {
        let document = serde_json::from_slice::<JsonValue>(&bytes)
            .ok()
            .filter(JsonValue::is_object)
            .map(Arc::new);
        StoredValue {
            bytes,
            version,
            document,
        }
    }

    /// Raw bytes
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.bytes
    }

    /// Commit version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Parsed JSON object, if the value is one
    #[inline]
    pub fn document(&self) -> Option<&JsonValue> {
        self.document.as_deref()
    }

    /// Copy out as the contract-level type
    pub fn to_versioned(&self) -> VersionedValue {
        VersionedValue {
            value: self.bytes.clone(),
            version: self.version,
        }
    }
}
