//! Property tests for the key casing transform.

use proptest::prelude::*;
use serde_json::{json, Value};
use shapedoc_core::casing::{camelize, camelize_value, decamelize, decamelize_value};

fn snake_key() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{2,6}[0-9]{0,2}", 1..5).prop_map(|words| words.join("_"))
}

proptest! {
    #[test]
    fn prop_key_round_trip(key in snake_key()) {
        prop_assert_eq!(decamelize(&camelize(&key)), key);
    }

    #[test]
    fn prop_camelized_keys_have_no_underscore(key in snake_key()) {
        prop_assert!(!camelize(&key).contains('_'));
    }

    #[test]
    fn prop_value_round_trip(keys in prop::collection::vec(snake_key(), 0..6)) {
        let object: serde_json::Map<String, Value> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), json!([{ "nested_key": i }])))
            .collect();
        let value = Value::Object(object);
        prop_assert_eq!(decamelize_value(camelize_value(value.clone())), value);
    }

    #[test]
    fn prop_non_identifier_keys_pass_through(key in "[A-Z$-][A-Za-z_-]{0,8}") {
        prop_assert_eq!(camelize(&key), key.clone());
        prop_assert_eq!(decamelize(&key), key);
    }
}
