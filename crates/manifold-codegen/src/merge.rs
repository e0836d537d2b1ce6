//! Document composition for schema sources.
//!
//! The canonical schema is split across several JSON documents (defaults,
//! types, endpoints, helpers) merged with a single composition operator:
//! objects merge recursively, everything else is last-write-wins. The same
//! operator layers endpoint definitions over shared endpoint defaults, so a
//! base config is written once and overridden per endpoint.

use serde_json::Value;

/// Merge `other` into `base`. Convention: `other` wins.
///
/// Objects merge key-by-key; arrays, scalars and nulls replace wholesale.
pub fn merge(base: Value, other: Value) -> Value {
    match (base, other) {
        (Value::Object(mut base_map), Value::Object(other_map)) => {
            for (key, other_val) in other_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge(base_val, other_val),
                    None => other_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, other) => other,
    }
}

/// Merge a sequence of documents in order into one composed document.
pub fn merge_documents(documents: Vec<Value>) -> Value {
    documents
        .into_iter()
        .fold(Value::Object(serde_json::Map::new()), merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_merge_recursively() {
        let base = json!({"api": {"name": "A", "version": "1"}, "types": {"X": 1}});
        let other = json!({"api": {"version": "2"}, "types": {"Y": 2}});
        let merged = merge(base, other);
        assert_eq!(
            merged,
            json!({"api": {"name": "A", "version": "2"}, "types": {"X": 1, "Y": 2}})
        );
    }

    #[test]
    fn arrays_replace_wholesale() {
        let base = json!({"record": [1, 2, 3]});
        let other = json!({"record": [4]});
        assert_eq!(merge(base, other), json!({"record": [4]}));
    }

    #[test]
    fn later_documents_win() {
        let merged = merge_documents(vec![
            json!({"a": 1, "b": 1}),
            json!({"b": 2}),
            json!({"c": 3}),
        ]);
        assert_eq!(merged, json!({"a": 1, "b": 2, "c": 3}));
    }
}
