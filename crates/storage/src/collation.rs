//! JSON collation
//!
//! Total order over optional JSON values used by range conditions and sorts:
//! missing < null < false < true < numbers < strings < arrays < objects.
//! Arrays compare element-wise, then by length. Objects compare by their
//! (key, value) pairs in key order.

use std::cmp::Ordering;

use serde_json::Value as JsonValue;

fn rank(value: Option<&JsonValue>) -> u8 {
    match value {
        None => 0,
        Some(JsonValue::Null) => 1,
        Some(JsonValue::Bool(false)) => 2,
        Some(JsonValue::Bool(true)) => 3,
        Some(JsonValue::Number(_)) => 4,
        Some(JsonValue::String(_)) => 5,
        Some(JsonValue::Array(_)) => 6,
        Some(JsonValue::Object(_)) => 7,
    }
}

/// Compare two optional JSON values
pub fn compare(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Array(x)), Some(JsonValue::Array(y))) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare(Some(l), Some(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Some(JsonValue::Object(x)), Some(JsonValue::Object(y))) => {
            let mut left: Vec<_> = x.iter().collect();
            let mut right: Vec<_> = y.iter().collect();
            left.sort_by(|a, b| a.0.cmp(b.0));
            right.sort_by(|a, b| a.0.cmp(b.0));
            for ((lk, lv), (rk, rv)) in left.iter().zip(right.iter()) {
                let ord = lk.cmp(rk).then_with(|| compare(Some(lv), Some(rv)));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            left.len().cmp(&right.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_ranks() {
        let ladder = [
            None,
            Some(json!(null)),
            Some(json!(false)),
            Some(json!(true)),
            Some(json!(-5)),
            Some(json!("a")),
            Some(json!([1])),
            Some(json!({"a": 1})),
        ];
        for pair in ladder.windows(2) {
            assert_eq!(
                compare(pair[0].as_ref(), pair[1].as_ref()),
                Ordering::Less,
                "{:?} should sort before {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare(Some(&json!(2.5)), Some(&json!(2))), Ordering::Greater);
        assert_eq!(compare(Some(&json!(3)), Some(&json!(3.0))), Ordering::Equal);
    }

    #[test]
    fn test_rfc3339_strings_sort_chronologically() {
        let earlier = json!("2026-01-01T00:00:00.000000Z");
        let later = json!("2026-01-01T00:00:00.000001Z");
        assert_eq!(compare(Some(&earlier), Some(&later)), Ordering::Less);
    }

    #[test]
    fn test_arrays_compare_elementwise_then_length() {
        assert_eq!(compare(Some(&json!([1, 2])), Some(&json!([1, 3]))), Ordering::Less);
        assert_eq!(compare(Some(&json!([1, 2])), Some(&json!([1]))), Ordering::Greater);
    }
}
