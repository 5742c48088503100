//! Selector evaluation against JSON documents

use std::cmp::Ordering;

use serde_json::Value as JsonValue;

use covenant_core::{Condition, Selector};

use crate::collation::compare;

/// Resolve a dotted path (`sign.signer`) inside a document
pub fn lookup<'a>(document: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

/// Whether `document` satisfies `selector`
pub fn matches(selector: &Selector, document: &JsonValue) -> bool {
    match selector {
        Selector::Field { path, condition } => satisfies(condition, lookup(document, path)),
        Selector::And(parts) => parts.iter().all(|part| matches(part, document)),
    }
}

fn satisfies(condition: &Condition, field: Option<&JsonValue>) -> bool {
    let cmp = |operand: &JsonValue| field.map(|value| compare(Some(value), Some(operand)));
    match condition {
        Condition::Exists(expected) => field.is_some() == *expected,
        Condition::Eq(v) => cmp(v) == Some(Ordering::Equal),
        Condition::Ne(v) => matches!(cmp(v), Some(o) if o != Ordering::Equal),
        Condition::Gt(v) => cmp(v) == Some(Ordering::Greater),
        Condition::Gte(v) => matches!(cmp(v), Some(Ordering::Greater | Ordering::Equal)),
        Condition::Lt(v) => cmp(v) == Some(Ordering::Less),
        Condition::Lte(v) => matches!(cmp(v), Some(Ordering::Less | Ordering::Equal)),
    }
}

/// String values the selector pins `path` to with a top-level equality
pub fn equality_on<'a>(selector: &'a Selector, path: &str) -> Option<&'a str> {
    match selector {
        Selector::Field {
            path: p,
            condition: Condition::Eq(JsonValue::String(value)),
        } if p == path => Some(value.as_str()),
        Selector::Field { .. } => None,
        Selector::And(parts) => parts.iter().find_map(|part| equality_on(part, path)),
    }
}
