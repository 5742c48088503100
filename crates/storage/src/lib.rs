//! Storage layer for covenant
//!
//! This crate implements the in-memory record store with:
//! - UnifiedStore: BTreeMap-based storage with RwLock
//! - ClonedSnapshotView: point-in-time snapshots for transactions
//! - Selector evaluation over JSON records with dotted paths
//! - JSON collation for range conditions and sorts
//! - Bookmark pagination
//! - Declared indexes with field indices for equality lookups
//! - Version management with AtomicU64

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bookmark;
pub mod collation;
pub mod index;
pub mod query;
pub mod selector;
pub mod snapshot;
pub mod stored_value;
pub mod unified;

pub use bookmark::Bookmark;
pub use index::{FieldIndex, IndexDefinition, IndexRegistry, ScanPlan};
pub use snapshot::ClonedSnapshotView;
pub use stored_value::StoredValue;
pub use unified::UnifiedStore;
