//! Walks over nested `serde_json::Value` trees
//!
//! Objects and arrays are branches; every other value is a leaf. Array
//! elements are addressed by their index, so `{"list": ["a", "b"]}` flattens
//! to `list.0` and `list.1`.

use std::collections::BTreeMap;

use serde_json::Value;

/// Rebuild `value` with `f` applied to every leaf, keeping the shape.
pub fn map_leaves<F>(value: &Value, f: &mut F) -> Value
where
    F: FnMut(&Value) -> Value,
{
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), map_leaves(v, f)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| map_leaves(v, f)).collect()),
        leaf => f(leaf),
    }
}

/// Flatten a tree into a one-level map keyed by joined paths.
///
/// `key_name` is the parent key of `value` (an empty string means none).
/// Later keys silently overwrite earlier ones in traversal order. Empty
/// branches contribute nothing. A leaf at the top is only kept when a
/// `key_name` is given.
pub fn flatten(value: &Value, key_name: &str, separator: &str) -> BTreeMap<String, Value> {
    let mut holder = BTreeMap::new();
    flatten_into(value, key_name, separator, &mut holder);
    holder
}

fn flatten_into(value: &Value, key_name: &str, separator: &str, holder: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_child(v, &join_key(key_name, k, separator), separator, holder);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_child(v, &join_key(key_name, &i.to_string(), separator), separator, holder);
            }
        }
        leaf => {
            if !key_name.is_empty() {
                holder.insert(key_name.to_string(), leaf.clone());
            }
        }
    }
}

fn flatten_child(value: &Value, key: &str, separator: &str, holder: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(_) | Value::Array(_) => flatten_into(value, key, separator, holder),
        leaf => {
            holder.insert(key.to_string(), leaf.clone());
        }
    }
}

fn join_key(parent: &str, child: &str, separator: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}{}{}", parent, separator, child)
    }
}
