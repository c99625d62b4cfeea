//! Request side of the payload pipeline.
//!
//! Each extractor decodes one part of the request into a typed shape before
//! the handler runs. When the application uses camelCase on the wire (see
//! [`Casing`]), JSON keys, query keys and form keys are converted back to the
//! declared snake_case names first. Header names never follow the casing
//! policy: `x-request-id` binds to a field named `x_request_id`.
//!
//! ```ignore
//! async fn create(
//!     ValidatedQuery(query): ValidatedQuery<QueryItem>,
//!     ValidatedHeaders(headers): ValidatedHeaders<Headers>,
//!     ValidatedJson(details): ValidatedJson<Details>,
//! ) -> Typed<Result> { ... }
//! ```

use std::ops::Deref;

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::casing::Casing;
use crate::error::ApiError;

fn casing_of(extensions: &Extensions) -> Casing {
    extensions.get::<Casing>().copied().unwrap_or_default()
}

fn has_content_type(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case(expected)
                || (expected == "application/json" && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Parse a query string into key-value pairs.
pub fn parse_query_string(query: Option<&str>) -> Vec<(String, String)> {
    match query {
        Some(q) => form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => Vec::new(),
    }
}

/// Bind flat key-value pairs to a typed shape.
///
/// Values are strings on the wire; `serde_urlencoded` parses numbers and
/// booleans out of them as the shape requires.
fn decode_pairs<T: DeserializeOwned>(
    pairs: impl IntoIterator<Item = (String, String)>,
) -> Result<T, ApiError> {
    let mut encoded = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        encoded.append_pair(&key, &value);
    }
    serde_urlencoded::from_str(&encoded.finish())
        .map_err(|e| ApiError::RequestValidation(e.to_string()))
}

macro_rules! impl_wrapper {
    ($name:ident) => {
        impl<T> $name<T> {
            pub fn into_inner(self) -> T {
                self.0
            }
        }

        impl<T> Deref for $name<T> {
            type Target = T;

            fn deref(&self) -> &T {
                &self.0
            }
        }
    };
}

/// JSON request body decoded into `T`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl_wrapper!(ValidatedJson);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_content_type(req.headers(), "application/json") {
            return Err(ApiError::RequestValidation(
                "expected a body with content type `application/json`".into(),
            ));
        }
        let casing = casing_of(req.extensions());
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::RequestValidation(e.to_string()))?;
        serde_json::from_value(casing.incoming(value))
            .map(ValidatedJson)
            .map_err(|e| ApiError::RequestValidation(e.to_string()))
    }
}

/// Form-encoded request body decoded into `T`.
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

impl_wrapper!(ValidatedForm);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_content_type(req.headers(), "application/x-www-form-urlencoded") {
            return Err(ApiError::RequestValidation(
                "expected a body with content type `application/x-www-form-urlencoded`".into(),
            ));
        }
        let casing = casing_of(req.extensions());
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let pairs = form_urlencoded::parse(&body)
            .map(|(k, v)| (casing.incoming_key(&k), v.into_owned()));
        decode_pairs(pairs).map(ValidatedForm)
    }
}

/// Query string decoded into `T`.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl_wrapper!(ValidatedQuery);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let casing = casing_of(&parts.extensions);
        let pairs = parse_query_string(parts.uri.query())
            .into_iter()
            .map(|(k, v)| (casing.incoming_key(&k), v));
        decode_pairs(pairs).map(ValidatedQuery)
    }
}

/// Request headers decoded into `T`.
///
/// Header names are matched with `-` replaced by `_`; only the first value of
/// a repeated header is used. Values that are not visible ASCII are ignored.
#[derive(Debug, Clone)]
pub struct ValidatedHeaders<T>(pub T);

impl_wrapper!(ValidatedHeaders);

impl<T, S> FromRequestParts<S> for ValidatedHeaders<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut pairs = Vec::with_capacity(parts.headers.keys_len());
        for name in parts.headers.keys() {
            let Some(value) = parts.headers.get(name) else {
                continue;
            };
            // Opaque values cannot bind to a string field; a declared one surfaces as missing.
            let Ok(value) = value.to_str() else {
                tracing::debug!(header = %name, "skipping header with non-ASCII value");
                continue;
            };
            pairs.push((name.as_str().replace('-', "_"), value.to_string()));
        }
        decode_pairs(pairs).map(ValidatedHeaders)
    }
}
