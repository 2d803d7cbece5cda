//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    /// Generate an application payload (possibly empty)
    pub fn payload() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(any::<u8>(), 0..2048)
    }

    /// Generate a bootloader and an application image
    pub fn bootloader_and_app() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
        (prop::collection::vec(any::<u8>(), 0..512), payload())
    }

    /// Generate a JSON object key
    pub fn json_key() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,7}"
    }

    /// Generate a JSON scalar or small array
    fn json_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 ._-]{0,12}".prop_map(Value::String),
            prop::collection::vec(any::<u8>().prop_map(Value::from), 0..4).prop_map(Value::Array),
        ]
    }

    /// Generate a JSON object nested up to three levels deep
    pub fn json_object() -> impl Strategy<Value = Value> {
        let value = json_leaf().prop_recursive(3, 32, 4, |inner| {
            prop::collection::btree_map(json_key(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()))
        });

        prop::collection::btree_map(json_key(), value, 0..6)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_payload_generator(data in payload()) {
            prop_assert!(data.len() < 2048);
        }

        #[test]
        fn test_json_key_generator(key in json_key()) {
            prop_assert!(!key.is_empty());
            prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }

        #[test]
        fn test_json_object_generator(value in json_object()) {
            prop_assert!(value.is_object());
        }
    }
}
