//! Dotted key paths into JSON documents
//!
//! `config.version.value` addresses `doc["config"]["version"]["value"]`.
//! Every segment but the last must already exist and hold an object; the last
//! one is inserted or replaced.

use serde_json::Value;

use crate::error::JsonError;

/// Set the value at `key_path`, returning the value it replaced
pub fn set_path(doc: &mut Value, key_path: &str, value: Value) -> Result<Option<Value>, JsonError> {
    let segments: Vec<&str> = key_path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(JsonError::EmptyKeyPath {
            path: key_path.to_string(),
        });
    }

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| JsonError::EmptyKeyPath {
            path: key_path.to_string(),
        })?;

    let mut current = doc;
    for (depth, key) in parents.iter().enumerate() {
        let map = current.as_object_mut().ok_or_else(|| JsonError::NotAnObject {
            key: describe(&segments[..depth]),
        })?;
        if !map.contains_key(*key) {
            return Err(JsonError::KeyNotFound {
                key: (*key).to_string(),
                available: map.keys().cloned().collect(),
            });
        }
        current = &mut map[*key];
    }

    let map = current.as_object_mut().ok_or_else(|| JsonError::NotAnObject {
        key: describe(parents),
    })?;
    Ok(map.insert((*last).to_string(), value))
}

/// Interpret a command-line value
///
/// The text is stored verbatim as a string. With `as_json` it is parsed as
/// JSON instead (`42`, `true`, `{"a": 1}`), falling back to a plain string.
pub fn parse_value(text: &str, as_json: bool) -> Value {
    if as_json {
        if let Ok(value) = serde_json::from_str(text) {
            return value;
        }
    }
    Value::String(text.to_string())
}

fn describe(segments: &[&str]) -> String {
    if segments.is_empty() {
        "(root)".to_string()
    } else {
        segments.join(".")
    }
}
