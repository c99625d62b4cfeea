//! Response side of the payload pipeline.
//!
//! Handlers return typed values; they are turned into plain JSON mappings
//! before the response is written. Key casing is applied afterwards by
//! [`camelize_json_responses`], which the OpenAPI extension installs only when
//! camelCase conversion is enabled.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::casing::camelize_value;
use crate::error::ApiError;

/// A typed value encoded as a JSON body with status `200`.
#[derive(Debug, Clone)]
pub struct Typed<T>(pub T);

impl<T: Serialize> IntoResponse for Typed<T> {
    fn into_response(self) -> Response {
        match to_plain(&self.0) {
            Ok(value) => Json(value).into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// A typed body with an explicit status and an optional typed headers shape.
///
/// Header field names are written with `_` replaced by `-`; `None` fields are
/// skipped.
#[derive(Debug, Clone)]
pub struct TypedResponse<T, H = ()> {
    pub body: T,
    pub status: StatusCode,
    pub headers: Option<H>,
}

impl<T> TypedResponse<T, ()> {
    pub fn new(body: T, status: StatusCode) -> Self {
        Self {
            body,
            status,
            headers: None,
        }
    }
}

impl<T, H> TypedResponse<T, H> {
    pub fn with_headers<H2>(self, headers: H2) -> TypedResponse<T, H2> {
        TypedResponse {
            body: self.body,
            status: self.status,
            headers: Some(headers),
        }
    }
}

impl<T: Serialize, H: Serialize> IntoResponse for TypedResponse<T, H> {
    fn into_response(self) -> Response {
        let encoded = to_plain(&self.body).and_then(|body| {
            let headers = match &self.headers {
                Some(headers) => encode_headers(headers)?,
                None => HeaderMap::new(),
            };
            Ok((body, headers))
        });
        match encoded {
            Ok((body, headers)) => (self.status, headers, Json(body)).into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// Convert a typed value into a plain JSON value.
pub fn to_plain<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::ResponseValidation(e.to_string()))
}

/// Encode a typed headers shape into a header map.
pub fn encode_headers<H: Serialize + ?Sized>(headers: &H) -> Result<HeaderMap, ApiError> {
    let Value::Object(fields) = to_plain(headers)? else {
        return Err(ApiError::ResponseValidation(
            "headers shape must serialize to a mapping".into(),
        ));
    };

    let mut map = HeaderMap::with_capacity(fields.len());
    for (field, value) in fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(_) | Value::Number(_) => value.to_string(),
            other => {
                return Err(ApiError::ResponseValidation(format!(
                    "header `{field}` must be a scalar, got {other}"
                )))
            }
        };
        let name = HeaderName::try_from(field.replace('_', "-"))
            .map_err(|e| ApiError::ResponseValidation(e.to_string()))?;
        let value = HeaderValue::try_from(text)
            .map_err(|e| ApiError::ResponseValidation(e.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Middleware camelizing the keys of every JSON response body.
///
/// Bodies that fail to parse as JSON are passed through untouched.
pub async fn camelize_json_responses(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer JSON response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => match serde_json::to_vec(&camelize_value(value)) {
            Ok(encoded) => Body::from(encoded),
            Err(_) => Body::from(bytes),
        },
        Err(_) => Body::from(bytes),
    };
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, body)
}
