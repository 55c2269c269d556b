//! Deep merge of JSON documents
//!
//! Semantics used by merge-save:
//! - objects merge key by key, recursively
//! - arrays merge index by index, extra overlay items are appended
//! - any other overlay value replaces the base value
//!
//! Keys present only in the base are never removed, so a merge cannot
//! express a deletion. Use a replace-save for that.

use serde_json::Value;

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            for (i, value) in overlay_items.into_iter().enumerate() {
                match base_items.get_mut(i) {
                    Some(existing) => deep_merge(existing, value),
                    None => base_items.push(value),
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_disjoint_keys_when_merging_then_keeps_both() {
        let mut base = json!({"resolve": {"a": "/a"}});
        deep_merge(&mut base, json!({"resolve": {"b": "/b"}}));
        assert_eq!(base, json!({"resolve": {"a": "/a", "b": "/b"}}));
    }

    #[test]
    fn given_same_scalar_key_when_merging_then_overlay_wins() {
        let mut base = json!({"settings": {"interpreter": "node"}});
        deep_merge(&mut base, json!({"settings": {"interpreter": "deno"}}));
        assert_eq!(base, json!({"settings": {"interpreter": "deno"}}));
    }

    #[test]
    fn given_nested_objects_when_merging_then_extends_not_replaces() {
        let mut base = json!({"settings": {"exec": {"bin": "node", "args": ["--a"]}}});
        deep_merge(
            &mut base,
            json!({"settings": {"exec": {"args": ["--b", "--c"]}}}),
        );
        assert_eq!(
            base,
            json!({"settings": {"exec": {"bin": "node", "args": ["--b", "--c"]}}})
        );
    }

    #[test]
    fn given_type_change_when_merging_then_overlay_replaces() {
        let mut base = json!({"settings": {"limit": {"soft": 1}}});
        deep_merge(&mut base, json!({"settings": {"limit": 4096}}));
        assert_eq!(base, json!({"settings": {"limit": 4096}}));
    }

    #[test]
    fn given_overlay_missing_key_when_merging_then_base_key_survives() {
        let mut base = json!({"resolve": {"a": "/a", "b": "/b"}});
        deep_merge(&mut base, json!({"resolve": {"a": "/a"}}));
        assert_eq!(base, json!({"resolve": {"a": "/a", "b": "/b"}}));
    }
}
