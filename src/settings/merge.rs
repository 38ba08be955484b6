//! Default merging for option documents.
//!
//! The defaults document is the schema: its keys (and their order) are the
//! only keys a merged document can have.

use serde_json::Value;

use crate::store::Document;

/// Merge `input` over `defaults`.
///
/// A key keeps the input value when it is present and has the same JSON
/// kind as the default; otherwise the default wins. Keys unknown to
/// `defaults` are dropped.
///
/// ```ignore
/// merge({"a": "x", "b": 3, "zzz": 1}, {"a": "d", "b": "d"}) -> {"a": "x", "b": "d"}
/// ```
pub fn merge(input: &Document, defaults: &Document) -> Document {
    merge_with(input, defaults, |_, value, default| {
        same_kind(value, default).then(|| value.clone())
    })
}

/// Merge with a per-key rule `clean(key, input_value, default)` that yields
/// the value to keep, or `None` to fall back to the default.
pub fn merge_with<F>(input: &Document, defaults: &Document, clean: F) -> Document
where
    F: Fn(&str, &Value, &Value) -> Option<Value>,
{
    defaults
        .iter()
        .map(|(key, default)| {
            let value = input
                .get(key)
                .and_then(|value| clean(key, value, default))
                .unwrap_or_else(|| default.clone());
            (key.clone(), value)
        })
        .collect()
}

/// Whether two values are the same JSON kind.
pub fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_fills_missing_keys() {
        let defaults = doc(json!({"a": "x", "b": "y"}));
        let merged = merge(&doc(json!({"a": "custom"})), &defaults);
        assert_eq!(merged, doc(json!({"a": "custom", "b": "y"})));
    }

    #[test]
    fn test_merge_drops_unknown_keys() {
        let defaults = doc(json!({"a": "x"}));
        let merged = merge(&doc(json!({"a": "1", "extra": true})), &defaults);
        assert!(!merged.contains_key("extra"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_rejects_wrong_kind() {
        let defaults = doc(json!({"flag": 0, "name": ""}));
        let merged = merge(&doc(json!({"flag": "yes", "name": 5})), &defaults);
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_merge_keeps_default_order() {
        let defaults = doc(json!({"z": 1, "a": 2, "m": 3}));
        let merged = merge(&doc(json!({"m": 9, "a": 8})), &defaults);
        let keys: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_merge_empty_input_is_defaults() {
        let defaults = doc(json!({"a": "x", "b": 1}));
        assert_eq!(merge(&Document::new(), &defaults), defaults);
    }

    #[test]
    fn test_merge_with_custom_rule() {
        let defaults = doc(json!({"color": "#000000", "name": ""}));
        let only_hex = |_: &str, v: &Value, _: &Value| {
            v.as_str().filter(|s| s.starts_with('#')).map(|s| json!(s))
        };
        assert_eq!(
            merge_with(&doc(json!({"color": "red"})), &defaults, only_hex),
            defaults
        );
        assert_eq!(
            merge_with(&doc(json!({"color": "#fff"})), &defaults, only_hex),
            doc(json!({"color": "#fff", "name": ""}))
        );
    }

    #[test]
    fn test_merge_with_rewrites_values() {
        let defaults = doc(json!({"color": "#000000", "name": ""}));
        let input = doc(json!({"color": "fff", "name": "bad"}));
        let merged = merge_with(&input, &defaults, |key, value, _| match key {
            "color" => value.as_str().map(|s| Value::String(format!("#{s}"))),
            _ => None,
        });
        assert_eq!(merged, doc(json!({"color": "#fff", "name": ""})));
    }
}
