//! Container identity.
//!
//! spec.md §3: a 64-bit ID deterministically derived from an array or
//! object value, with arrays tagged even and objects tagged odd, and
//! non-containers mapping to zero. The ID is used purely as a bit-set
//! key for expansion state, so collisions only need to be vanishingly
//! unlikely, not cryptographically impossible.

use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub type ContainerId = u64;

/// Derive the stable container ID for `value`. Returns `0` for anything
/// that is not an array or object.
pub fn container_id(value: &Value) -> ContainerId {
    match value {
        Value::Array(_) => (fingerprint(value) << 1) & !1,
        Value::Object(_) => (fingerprint(value) << 1) | 1,
        _ => 0,
    }
}

pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn fingerprint(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}

fn hash_value(value: &Value, hasher: &mut DefaultHasher) {
    match value {
        Value::Null => 0u8.hash(hasher),
        Value::Bool(b) => {
            1u8.hash(hasher);
            b.hash(hasher);
        }
        Value::Number(n) => {
            2u8.hash(hasher);
            n.to_string().hash(hasher);
        }
        Value::String(s) => {
            3u8.hash(hasher);
            s.hash(hasher);
        }
        Value::Array(items) => {
            4u8.hash(hasher);
            items.len().hash(hasher);
            for item in items {
                hash_value(item, hasher);
            }
        }
        Value::Object(map) => {
            5u8.hash(hasher);
            map.len().hash(hasher);
            for (k, v) in map {
                k.hash(hasher);
                hash_value(v, hasher);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stable_across_calls() {
        let v = json!({"a": [1, 2, 3]});
        assert_eq!(container_id(&v), container_id(&v));
    }

    #[test]
    fn arrays_are_even() {
        let v = json!([1, 2, 3]);
        assert_eq!(container_id(&v) & 1, 0);
    }

    #[test]
    fn objects_are_odd() {
        let v = json!({"a": 1});
        assert_eq!(container_id(&v) & 1, 1);
    }

    #[test]
    fn non_containers_are_zero() {
        assert_eq!(container_id(&json!(42)), 0);
        assert_eq!(container_id(&json!("s")), 0);
        assert_eq!(container_id(&json!(null)), 0);
    }

    #[test]
    fn distinct_containers_differ() {
        let a = json!([1, 2, 3]);
        let b = json!([1, 2, 4]);
        assert_ne!(container_id(&a), container_id(&b));
    }
}
