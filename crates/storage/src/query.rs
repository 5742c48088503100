//! Query execution over a key-ordered map
//!
//! Shared by `UnifiedStore` and `ClonedSnapshotView`. Matching records are
//! ordered by the query's sort keys (JSON collation, per-key direction) and
//! then by record key ascending, which makes the order total.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use covenant_core::{
    CovenantResult, Query, QueryMetadata, QueryPage, SortField, SortOrder, VersionedValue,
};

use crate::bookmark::{Bookmark, SortValue};
use crate::collation::compare;
use crate::index::{IndexRegistry, ScanPlan};
use crate::selector::{lookup, matches};
use crate::stored_value::StoredValue;

fn sort_values(sort: &[SortField], value: &StoredValue) -> Vec<SortValue> {
    let doc = value.document();
    sort.iter()
        .map(|field| SortValue::from(doc.and_then(|d| lookup(d, &field.path))))
        .collect()
}

fn compare_positions(
    sort: &[SortField],
    left: (&[SortValue], &str),
    right: (&[SortValue], &str),
) -> Ordering {
    for (i, field) in sort.iter().enumerate() {
        let l = left.0.get(i).and_then(SortValue::as_json);
        let r = right.0.get(i).and_then(SortValue::as_json);
        let ord = match field.order {
            SortOrder::Asc => compare(l, r),
            SortOrder::Desc => compare(r, l),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.1.cmp(right.1)
}

struct Hit<'a> {
    key: &'a String,
    value: &'a StoredValue,
    position: Vec<SortValue>,
}

/// Matching records in query order
fn evaluate<'a>(
    data: &'a BTreeMap<String, StoredValue>,
    indexes: &IndexRegistry,
    query: &Query,
) -> Vec<Hit<'a>> {
    let accept = |(key, value): (&'a String, &'a StoredValue)| {
        let doc = value.document()?;
        matches(&query.selector, doc).then(|| Hit {
            key,
            value,
            position: sort_values(&query.sort, value),
        })
    };

    let mut hits: Vec<Hit<'a>> = match indexes.plan(&query.selector, query.use_index.as_ref()) {
        ScanPlan::Full => data.iter().filter_map(accept).collect(),
        ScanPlan::Keys(keys) => keys
            .iter()
            .filter_map(|k| data.get_key_value(k))
            .filter_map(accept)
            .collect(),
    };

    if !query.sort.is_empty() {
        hits.sort_by(|a, b| {
            compare_positions(&query.sort, (&a.position, a.key), (&b.position, b.key))
        });
    }
    hits
}

/// Every matching record, in order
pub fn execute(
    data: &BTreeMap<String, StoredValue>,
    indexes: &IndexRegistry,
    query: &Query,
) -> Vec<(String, VersionedValue)> {
    evaluate(data, indexes, query)
        .into_iter()
        .map(|hit| (hit.key.clone(), hit.value.to_versioned()))
        .collect()
}

/// One page of matching records, resuming after `bookmark`
///
/// An empty or absent bookmark starts from the beginning. A `page_size` of
/// zero means no limit. When the page is empty the input bookmark is echoed
/// back.
pub fn execute_page(
    data: &BTreeMap<String, StoredValue>,
    indexes: &IndexRegistry,
    query: &Query,
    page_size: usize,
    bookmark: Option<&str>,
) -> CovenantResult<QueryPage> {
    let resume = match bookmark {
        Some(encoded) if !encoded.is_empty() => Some(Bookmark::decode(encoded)?),
        _ => None,
    };
    let limit = if page_size == 0 { usize::MAX } else { page_size };

    let page: Vec<Hit<'_>> = evaluate(data, indexes, query)
        .into_iter()
        .filter(|hit| match &resume {
            Some(bm) => {
                compare_positions(&query.sort, (&hit.position, hit.key), (&bm.values, &bm.key))
                    == Ordering::Greater
            }
            None => true,
        })
        .take(limit)
        .collect();

    let next = match page.last() {
        Some(last) => Bookmark {
            values: last.position.clone(),
            key: last.key.clone(),
        }
        .encode()?,
        None => bookmark.unwrap_or_default().to_string(),
    };

    Ok(QueryPage {
        metadata: QueryMetadata {
            fetched_records_count: page.len(),
            bookmark: next,
        },
        records: page
            .into_iter()
            .map(|hit| (hit.key.clone(), hit.value.to_versioned()))
            .collect(),
    })
}
