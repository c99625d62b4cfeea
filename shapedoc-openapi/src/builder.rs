use serde_json::{json, Map, Value};
use shapedoc_core::{Casing, RouteTable};

use crate::assemble::{
    header_parameters, path_parameters, query_parameters, request_body, response_object,
};
use crate::config::OpenApiConfig;
use crate::error::OpenApiError;
use crate::extract::{extract, OperationMeta};
use crate::registry::ComponentsRegistry;

pub const OPENAPI_VERSION: &str = "3.0.3";

/// Build the operation object of one route.
fn build_operation(
    meta: OperationMeta,
    casing: Casing,
    registry: &mut ComponentsRegistry,
) -> Result<Map<String, Value>, OpenApiError> {
    let mut operation = Map::new();

    if !meta.tags.is_empty() {
        operation.insert("tags".into(), json!(meta.tags));
    }
    if let Some(summary) = meta.summary {
        operation.insert("summary".into(), Value::String(summary));
    }
    if let Some(description) = meta.description {
        operation.insert("description".into(), Value::String(description));
    }
    if meta.deprecated {
        operation.insert("deprecated".into(), Value::Bool(true));
    }
    if let Some(security) = meta.security {
        operation.insert("security".into(), serde_json::to_value(security)?);
    }

    // Query, then header, then path parameters.
    let mut parameters = Vec::new();
    if let Some(shape) = &meta.querystring {
        parameters.extend(query_parameters(shape.as_ref(), casing, registry)?);
    }
    if let Some(shape) = &meta.headers {
        parameters.extend(header_parameters(shape.as_ref(), registry)?);
    }
    parameters.extend(path_parameters(&meta.path_converters));
    operation.insert("parameters".into(), Value::Array(parameters));

    if let Some((shape, source)) = &meta.request {
        operation.insert(
            "requestBody".into(),
            request_body(shape.as_ref(), *source, casing, registry)?,
        );
    }

    let mut responses = Map::new();
    for (status, spec) in &meta.responses {
        responses.insert(status.to_string(), response_object(spec, casing, registry)?);
    }
    operation.insert("responses".into(), Value::Object(responses));

    Ok(operation)
}

/// Build an OpenAPI 3.0 document from a route table.
///
/// Routes are visited in registration order. Websocket and hidden routes are
/// skipped; every other route contributes one operation object to each
/// method it serves, except `HEAD` and automatic `OPTIONS`. `app_name` is the
/// title used when the config sets none.
///
/// # Errors
///
/// Fails as a whole when any declared shape cannot be described.
pub fn build_openapi_schema(
    table: &RouteTable,
    config: &OpenApiConfig,
    app_name: &str,
) -> Result<Value, OpenApiError> {
    let casing = Casing::from_flag(config.convert_casing);
    let mut registry = ComponentsRegistry::new();
    let mut paths: Map<String, Value> = Map::new();

    for rule in table.rules() {
        if rule.is_websocket() {
            continue;
        }
        let meta = extract(rule, table.meta(rule.endpoint()));
        if meta.hidden {
            continue;
        }

        tracing::debug!(rule = %rule.rule(), endpoint = %rule.endpoint(), "synthesizing operation");
        let operation = build_operation(meta, casing, &mut registry)?;

        let path_item = paths
            .entry(rule.openapi_path())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(path_item) = path_item {
            for method in rule.documented_methods() {
                path_item.insert(
                    method.as_str().to_lowercase(),
                    Value::Object(operation.clone()),
                );
            }
        }
    }

    let mut components = Map::new();
    components.insert("schemas".into(), Value::Object(registry.into_schemas()));
    if let Some(schemes) = &config.security_schemes {
        let mut security_schemes = Map::new();
        for (name, scheme) in schemes {
            security_schemes.insert(name.clone(), serde_json::to_value(scheme)?);
        }
        components.insert("securitySchemes".into(), Value::Object(security_schemes));
    }

    let title = config.title.as_deref().unwrap_or(app_name);
    let mut document = Map::new();
    document.insert("openapi".into(), json!(OPENAPI_VERSION));
    document.insert(
        "info".into(),
        json!({ "title": title, "version": config.version }),
    );
    document.insert("components".into(), Value::Object(components));
    document.insert("paths".into(), Value::Object(paths));
    if let Some(tags) = &config.tags {
        document.insert("tags".into(), serde_json::to_value(tags)?);
    }
    if let Some(security) = &config.security {
        document.insert("security".into(), serde_json::to_value(security)?);
    }
    if let Some(servers) = &config.servers {
        document.insert("servers".into(), serde_json::to_value(servers)?);
    }

    Ok(Value::Object(document))
}
