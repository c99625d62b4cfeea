//! Turns declared shapes into OpenAPI parameter, request body and response
//! objects, hoisting their definitions into the components registry.

use serde_json::{json, Map, Value};
use shapedoc_core::routing::PathConverter;
use shapedoc_core::{camelize_schema, Casing, DataSource, ResponseSpec, Shape, ShapeDescription};

use crate::error::OpenApiError;
use crate::registry::ComponentsRegistry;

/// Keys moved from a property schema up to its parameter object.
const PROMOTED: [&str; 3] = ["description", "required", "deprecated"];

fn describe(shape: &dyn Shape) -> Result<ShapeDescription, OpenApiError> {
    Ok(shape.describe()?)
}

/// Merge a description's definitions into `registry` and return its schema.
///
/// With camelCase casing, both the schema and every definition body have
/// their property names camelized; definition names are kept as declared so
/// `$ref` targets stay valid.
pub fn split_definitions(
    description: ShapeDescription,
    casing: Casing,
    registry: &mut ComponentsRegistry,
) -> Value {
    let ShapeDescription {
        schema,
        definitions,
    } = description;
    if casing.is_camel() {
        for (name, definition) in definitions {
            registry.register(&name, camelize_schema(definition));
        }
        camelize_schema(schema)
    } else {
        registry.merge(definitions);
        schema
    }
}

fn content(media_type: &str, schema: Value) -> Value {
    let mut content = Map::new();
    content.insert(media_type.to_string(), json!({ "schema": schema }));
    Value::Object(content)
}

/// The `requestBody` object of a request shape.
pub(crate) fn request_body(
    shape: &dyn Shape,
    source: DataSource,
    casing: Casing,
    registry: &mut ComponentsRegistry,
) -> Result<Value, OpenApiError> {
    let schema = split_definitions(describe(shape)?, casing, registry);
    Ok(json!({
        "required": true,
        "content": content(source.content_type(), schema),
    }))
}

/// The response object of one declared status.
///
/// `description` is always present: the body shape's documentation, or an
/// empty string.
pub(crate) fn response_object(
    spec: &ResponseSpec,
    casing: Casing,
    registry: &mut ComponentsRegistry,
) -> Result<Value, OpenApiError> {
    let described = describe(spec.body.as_ref())?;
    let description = described.documentation().unwrap_or_default().to_string();
    let schema = split_definitions(described, casing, registry);

    let mut response = Map::new();
    response.insert("description".into(), Value::String(description));
    if let Some(headers) = &spec.headers {
        let headers = response_headers(headers.as_ref(), registry)?;
        response.insert("headers".into(), Value::Object(headers));
    }
    response.insert(
        "content".into(),
        content(DataSource::Json.content_type(), schema),
    );
    Ok(Value::Object(response))
}

/// One parameter per property of an object shape, in declaration order.
///
/// A property listed in the shape's `required` array is a required
/// parameter unless its own schema says otherwise.
fn parameters(
    shape_name: &str,
    schema: Value,
    location: &str,
    rename: impl Fn(&str) -> String,
) -> Result<Vec<Value>, OpenApiError> {
    let required: Vec<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let properties = match schema {
        Value::Object(mut root) => match root.remove("properties") {
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(OpenApiError::InvalidShape {
                    shape: shape_name.to_string(),
                    message: "`properties` is not a mapping".into(),
                })
            }
            None => Map::new(),
        },
        _ => Map::new(),
    };

    let mut params = Vec::with_capacity(properties.len());
    for (name, property) in properties {
        let mut param = Map::new();
        param.insert("name".into(), Value::String(rename(&name)));
        param.insert("in".into(), Value::String(location.to_string()));

        let mut property = property;
        if let Value::Object(fields) = &mut property {
            for key in PROMOTED {
                if let Some(value) = fields.remove(key) {
                    param.insert(key.into(), value);
                }
            }
        }
        if !param.contains_key("required") && required.contains(&name) {
            param.insert("required".into(), Value::Bool(true));
        }
        param.insert("schema".into(), property);
        params.push(Value::Object(param));
    }
    Ok(params)
}

/// `in: "query"` parameters. Names follow the casing policy.
pub(crate) fn query_parameters(
    shape: &dyn Shape,
    casing: Casing,
    registry: &mut ComponentsRegistry,
) -> Result<Vec<Value>, OpenApiError> {
    let schema = split_definitions(describe(shape)?, casing, registry);
    parameters(&shape.name(), schema, "query", str::to_string)
}

/// `in: "header"` parameters. Names never follow the casing policy; `_`
/// becomes `-`.
pub(crate) fn header_parameters(
    shape: &dyn Shape,
    registry: &mut ComponentsRegistry,
) -> Result<Vec<Value>, OpenApiError> {
    let schema = split_definitions(describe(shape)?, Casing::Preserve, registry);
    parameters(&shape.name(), schema, "header", |name| name.replace('_', "-"))
}

/// The `headers` map of a response object.
fn response_headers(
    shape: &dyn Shape,
    registry: &mut ComponentsRegistry,
) -> Result<Map<String, Value>, OpenApiError> {
    let mut headers = Map::new();
    for param in header_parameters(shape, registry)? {
        let Value::Object(mut param) = param else {
            continue;
        };
        let Some(Value::String(name)) = param.remove("name") else {
            continue;
        };
        param.remove("in");
        headers.insert(name, Value::Object(param));
    }
    Ok(headers)
}

/// Required path parameters, one per converter in declaration order.
pub fn path_parameters(converters: &[PathConverter]) -> Vec<Value> {
    converters
        .iter()
        .map(|converter| {
            let ty = if converter.kind.is_numeric() {
                "number"
            } else {
                "string"
            };
            json!({
                "name": converter.name,
                "in": "path",
                "required": true,
                "schema": { "type": ty },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapedoc_core::routing::ConverterKind;
    use shapedoc_core::{DescribeError, SchemaProvider, Provided};

    struct Filters;

    impl SchemaProvider for Filters {
        fn schema_name() -> &'static str {
            "Filters"
        }

        fn json_schema() -> Value {
            json!({
                "type": "object",
                "properties": {
                    "count_le": { "type": "integer", "description": "Upper bound" },
                    "owner": { "$ref": "#/definitions/Owner" },
                    "old_flag": { "type": "boolean", "deprecated": true }
                },
                "required": ["count_le"],
                "definitions": {
                    "Owner": {
                        "type": "object",
                        "properties": { "owner_id": { "type": "integer" } }
                    }
                }
            })
        }
    }

    struct Broken;

    impl Shape for Broken {
        fn name(&self) -> std::borrow::Cow<'static, str> {
            "Broken".into()
        }

        fn describe(&self) -> Result<ShapeDescription, DescribeError> {
            Err(DescribeError::new("Broken", "unsupported type"))
        }
    }

    #[test]
    fn query_parameters_promote_fields() {
        let mut registry = ComponentsRegistry::new();
        let params =
            query_parameters(&Provided::<Filters>::new(), Casing::Preserve, &mut registry).unwrap();
        assert_eq!(
            params[0],
            json!({
                "name": "count_le",
                "in": "query",
                "description": "Upper bound",
                "required": true,
                "schema": { "type": "integer" }
            })
        );
        assert_eq!(params[1]["schema"]["$ref"], "#/components/schemas/Owner");
        assert_eq!(params[2]["deprecated"], true);
        assert!(params[2].get("required").is_none());
        assert!(registry.contains("Owner"));
    }

    #[test]
    fn query_parameters_follow_casing() {
        let mut registry = ComponentsRegistry::new();
        let params =
            query_parameters(&Provided::<Filters>::new(), Casing::Camel, &mut registry).unwrap();
        assert_eq!(params[0]["name"], "countLe");
        assert_eq!(params[0]["required"], true);
        assert_eq!(params[2]["name"], "oldFlag");
        let owner = registry.get("Owner").unwrap();
        assert!(owner["properties"].get("ownerId").is_some());
    }

    #[test]
    fn header_parameters_use_dashes_and_ignore_casing() {
        let mut registry = ComponentsRegistry::new();
        let params = header_parameters(&Provided::<Filters>::new(), &mut registry).unwrap();
        assert_eq!(params[0]["name"], "count-le");
        assert_eq!(params[0]["in"], "header");
        assert_eq!(params[2]["name"], "old-flag");
    }

    #[test]
    fn path_parameters_by_converter_kind() {
        let converters = vec![
            PathConverter {
                name: "pet_id".into(),
                kind: ConverterKind::Int,
            },
            PathConverter {
                name: "slug".into(),
                kind: ConverterKind::Default,
            },
        ];
        let params = path_parameters(&converters);
        assert_eq!(params[0]["schema"]["type"], "number");
        assert_eq!(params[0]["required"], true);
        assert_eq!(params[1]["name"], "slug");
        assert_eq!(params[1]["schema"]["type"], "string");
    }

    #[test]
    fn describe_failure_propagates() {
        let mut registry = ComponentsRegistry::new();
        let err = query_parameters(&Broken, Casing::Preserve, &mut registry).unwrap_err();
        assert!(matches!(err, OpenApiError::Describe(_)));
        assert!(err.to_string().contains("Broken"));
    }
}
