//! Route annotations.
//!
//! Each route carries one immutable [`RouteMeta`] record, built with
//! [`RouteMetaBuilder`] at registration time and stored in the
//! [`RouteTable`](crate::routing::RouteTable) side-table under the route's
//! endpoint name.
//!
//! ```ignore
//! let meta = RouteMeta::builder()
//!     .doc("Create a pet.\nThe pet is stored in memory.")
//!     .tags(["pets"])
//!     .request::<NewPet>(DataSource::Json)
//!     .response::<Pet>(201)
//!     .response_with_headers::<Pet, RateLimit>(200)
//!     .build();
//! ```

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::shape::{shape_of, ShapeRef};

/// Where a request body is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Json,
    Form,
}

impl DataSource {
    /// Media type advertised for this source.
    pub fn content_type(self) -> &'static str {
        match self {
            DataSource::Json => "application/json",
            DataSource::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// A single security requirement: a scheme name and the scopes it needs.
///
/// Serializes as `{"<name>": [scopes]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityRequirement {
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl SecurityRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

impl Serialize for SecurityRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.scopes)?;
        map.end()
    }
}

/// Declared response for one status code.
#[derive(Clone)]
pub struct ResponseSpec {
    pub body: ShapeRef,
    pub headers: Option<ShapeRef>,
}

impl fmt::Debug for ResponseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseSpec")
            .field("body", &self.body.name())
            .field("headers", &self.headers.as_ref().map(|h| h.name()))
            .finish()
    }
}

/// Immutable annotations attached to one route.
#[derive(Clone, Default)]
pub struct RouteMeta {
    hidden: bool,
    tags: Vec<String>,
    deprecated: bool,
    security: Option<Vec<SecurityRequirement>>,
    doc: Option<String>,
    request: Option<(ShapeRef, DataSource)>,
    querystring: Option<ShapeRef>,
    headers: Option<ShapeRef>,
    responses: BTreeMap<u16, ResponseSpec>,
}

impl RouteMeta {
    pub fn builder() -> RouteMetaBuilder {
        RouteMetaBuilder::default()
    }

    /// Metadata for a route excluded from the generated document.
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn security(&self) -> Option<&[SecurityRequirement]> {
        self.security.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn request(&self) -> Option<(&ShapeRef, DataSource)> {
        self.request.as_ref().map(|(shape, source)| (shape, *source))
    }

    pub fn querystring(&self) -> Option<&ShapeRef> {
        self.querystring.as_ref()
    }

    pub fn headers(&self) -> Option<&ShapeRef> {
        self.headers.as_ref()
    }

    /// Declared responses, ordered by status code.
    pub fn responses(&self) -> &BTreeMap<u16, ResponseSpec> {
        &self.responses
    }
}

impl fmt::Debug for RouteMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMeta")
            .field("hidden", &self.hidden)
            .field("tags", &self.tags)
            .field("deprecated", &self.deprecated)
            .field("security", &self.security)
            .field("doc", &self.doc)
            .field("request", &self.request.as_ref().map(|(s, src)| (s.name(), *src)))
            .field("querystring", &self.querystring.as_ref().map(|s| s.name()))
            .field("headers", &self.headers.as_ref().map(|s| s.name()))
            .field("responses", &self.responses)
            .finish()
    }
}

/// Builder for [`RouteMeta`].
///
/// Response declarations accumulate into a map keyed by status code; a second
/// declaration for the same status replaces the first.
#[derive(Default)]
pub struct RouteMetaBuilder {
    meta: RouteMeta,
}

impl RouteMetaBuilder {
    /// Exclude the route from the generated document.
    pub fn hidden(mut self) -> Self {
        self.meta.hidden = true;
        self
    }

    /// Handler documentation: first line is the summary, the rest the description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.meta.doc = Some(doc.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.meta.tags.contains(&tag) {
                self.meta.tags.push(tag);
            }
        }
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.meta.deprecated = true;
        self
    }

    /// Override the document-level security requirements for this route.
    pub fn security(mut self, requirements: impl IntoIterator<Item = SecurityRequirement>) -> Self {
        self.meta.security = Some(requirements.into_iter().collect());
        self
    }

    pub fn request<T: JsonSchema + 'static>(self, source: DataSource) -> Self {
        self.request_shape(shape_of::<T>(), source)
    }

    pub fn request_shape(mut self, shape: ShapeRef, source: DataSource) -> Self {
        self.meta.request = Some((shape, source));
        self
    }

    pub fn querystring<T: JsonSchema + 'static>(self) -> Self {
        self.querystring_shape(shape_of::<T>())
    }

    pub fn querystring_shape(mut self, shape: ShapeRef) -> Self {
        self.meta.querystring = Some(shape);
        self
    }

    pub fn headers<T: JsonSchema + 'static>(self) -> Self {
        self.headers_shape(shape_of::<T>())
    }

    pub fn headers_shape(mut self, shape: ShapeRef) -> Self {
        self.meta.headers = Some(shape);
        self
    }

    pub fn response<T: JsonSchema + 'static>(self, status: u16) -> Self {
        self.response_shape(status, shape_of::<T>(), None)
    }

    pub fn response_with_headers<T, H>(self, status: u16) -> Self
    where
        T: JsonSchema + 'static,
        H: JsonSchema + 'static,
    {
        self.response_shape(status, shape_of::<T>(), Some(shape_of::<H>()))
    }

    pub fn response_shape(mut self, status: u16, body: ShapeRef, headers: Option<ShapeRef>) -> Self {
        self.meta.responses.insert(status, ResponseSpec { body, headers });
        self
    }

    pub fn build(self) -> RouteMeta {
        self.meta
    }
}
