//! snake_case ↔ camelCase key conversion.
//!
//! Only identifier-safe keys are touched: `count_le` becomes `countLe` and
//! back, while keys such as `$ref`, `x-name`, `_private` or `Details` pass
//! through unchanged. Values are never rewritten, only object keys.

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde_json::{Map, Value};

/// Key casing applied to JSON payloads on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Casing {
    /// Keys are sent and received as declared.
    #[default]
    Preserve,
    /// Keys are camelCase on the wire and snake_case in typed shapes.
    Camel,
}

impl Casing {
    pub fn from_flag(convert_casing: bool) -> Self {
        if convert_casing {
            Casing::Camel
        } else {
            Casing::Preserve
        }
    }

    pub fn is_camel(self) -> bool {
        self == Casing::Camel
    }

    /// Convert an incoming payload to the declared (snake_case) keys.
    pub fn incoming(self, value: Value) -> Value {
        match self {
            Casing::Preserve => value,
            Casing::Camel => decamelize_value(value),
        }
    }

    /// Convert an outgoing payload to wire keys.
    pub fn outgoing(self, value: Value) -> Value {
        match self {
            Casing::Preserve => value,
            Casing::Camel => camelize_value(value),
        }
    }

    /// Convert a single incoming key (query string or form field).
    pub fn incoming_key(self, key: &str) -> String {
        match self {
            Casing::Preserve => key.to_string(),
            Casing::Camel => decamelize(key),
        }
    }
}

fn is_snake_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && key.contains('_')
        && !key.ends_with('_')
        && !key.contains("__")
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_camel_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && key.chars().any(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `count_le` → `countLe`. Non-identifier keys are returned unchanged.
pub fn camelize(key: &str) -> String {
    if is_snake_identifier(key) {
        key.to_lower_camel_case()
    } else {
        key.to_string()
    }
}

/// `countLe` → `count_le`. Non-identifier keys are returned unchanged.
pub fn decamelize(key: &str) -> String {
    if is_camel_identifier(key) {
        key.to_snake_case()
    } else {
        key.to_string()
    }
}

fn map_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(obj) => Value::Object(
            obj.into_iter()
                .map(|(k, v)| (convert(&k), map_keys(v, convert)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| map_keys(v, convert)).collect())
        }
        scalar => scalar,
    }
}

/// Camelize every object key, recursing through objects and arrays.
pub fn camelize_value(value: Value) -> Value {
    map_keys(value, &camelize)
}

/// Decamelize every object key, recursing through objects and arrays.
pub fn decamelize_value(value: Value) -> Value {
    map_keys(value, &decamelize)
}

/// Camelize a JSON-Schema fragment.
///
/// Like [`camelize_value`], and additionally renames the entries of every
/// `required` array so they keep naming the converted properties.
pub fn camelize_schema(schema: Value) -> Value {
    match schema {
        Value::Object(obj) => {
            let mut out = Map::with_capacity(obj.len());
            for (key, value) in obj {
                let value = match (key.as_str(), value) {
                    ("required", Value::Array(names)) => Value::Array(
                        names
                            .into_iter()
                            .map(|name| match name {
                                Value::String(s) => Value::String(camelize(&s)),
                                other => other,
                            })
                            .collect(),
                    ),
                    (_, value) => camelize_schema(value),
                };
                out.insert(camelize(&key), value);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_schema).collect()),
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camelize_identifier_keys() {
        assert_eq!(camelize("count_le"), "countLe");
        assert_eq!(camelize("pet_owner_id"), "petOwnerId");
        assert_eq!(camelize("name"), "name");
    }

    #[test]
    fn camelize_leaves_non_identifiers() {
        for key in ["$ref", "x-name", "_private", "Details", "trailing_", "double__under", ""] {
            assert_eq!(camelize(key), key);
        }
    }

    #[test]
    fn decamelize_identifier_keys() {
        assert_eq!(decamelize("countLe"), "count_le");
        assert_eq!(decamelize("name"), "name");
        assert_eq!(decamelize("additionalProperties"), "additional_properties");
    }

    #[test]
    fn decamelize_leaves_non_identifiers() {
        for key in ["$ref", "x-name", "Details", "already_snake", "with space"] {
            assert_eq!(decamelize(key), key);
        }
    }

    #[test]
    fn camelize_value_recurses_into_arrays() {
        let value = json!({"pet_list": [{"pet_name": "rex"}], "count": 1});
        assert_eq!(
            camelize_value(value),
            json!({"petList": [{"petName": "rex"}], "count": 1})
        );
    }

    #[test]
    fn values_are_not_rewritten() {
        let value = json!({"first_name": "snake_value"});
        assert_eq!(camelize_value(value), json!({"firstName": "snake_value"}));
    }

    #[test]
    fn schema_required_follows_properties() {
        let schema = json!({
            "type": "object",
            "properties": { "count_le": { "type": "integer" } },
            "required": ["count_le"]
        });
        let converted = camelize_schema(schema);
        assert!(converted["properties"]["countLe"].is_object());
        assert_eq!(converted["required"], json!(["countLe"]));
    }

    #[test]
    fn casing_policy_preserve_is_identity() {
        let value = json!({"count_le": 1});
        assert_eq!(Casing::Preserve.incoming(value.clone()), value);
        assert_eq!(Casing::Preserve.outgoing(value.clone()), value);
    }
}
