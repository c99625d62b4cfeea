use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, IntoHeaderName, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower::util::ServiceExt;

/// In-process HTTP test client wrapping an Axum `Router`.
///
/// Uses `tower::ServiceExt::oneshot` to dispatch requests without binding
/// to a TCP port.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn get(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::GET, path)
    }

    pub fn head(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::HEAD, path)
    }

    pub fn options(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::OPTIONS, path)
    }

    pub fn post(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::POST, path)
    }

    pub fn put(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, Method::DELETE, path)
    }

    /// Start building a request with an arbitrary HTTP method.
    pub fn request(&self, method: Method, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, method, path)
    }
}

/// Builder for constructing and sending a test HTTP request.
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: Method, path: &str) -> Self {
        Self {
            app,
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Append one query-string pair; values are percent-encoded on send.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl IntoHeaderName, value: impl AsRef<str>) -> Self {
        self.headers.insert(name, value.as_ref().parse().unwrap());
        self
    }

    /// Set the request body as JSON. Also sets Content-Type to `application/json`.
    pub fn json(mut self, body: &impl Serialize) -> Self {
        self.body = Some(serde_json::to_vec(body).unwrap());
        self.headers
            .insert(CONTENT_TYPE, "application/json".parse().unwrap());
        self
    }

    /// Set a form-encoded body from key-value pairs.
    pub fn form<K: AsRef<str>, V: AsRef<str>>(mut self, pairs: &[(K, V)]) -> Self {
        let mut encoded = form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            encoded.append_pair(key.as_ref(), value.as_ref());
        }
        self.body = Some(encoded.finish().into_bytes());
        self.headers.insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self
    }

    /// Set a raw request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.path)
    }

    pub async fn send(self) -> TestResponse {
        let uri = self.uri();
        let body = match self.body {
            Some(b) => Body::from(b),
            None => Body::empty(),
        };

        let mut builder = Request::builder().method(self.method).uri(uri);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        let request = builder.body(body).unwrap();

        let response = self
            .app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

// ─── JSON path resolution ───

#[derive(Debug)]
pub enum PathToken {
    Field(String),
    Index(usize),
    Len,
}

/// Split `paths./pets.get.tags[0]` style paths into tokens.
///
/// Segments starting with `/` are taken verbatim as field names, so document
/// path templates can be addressed directly.
pub fn tokenize_path(path: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    for segment in path.split('.') {
        if segment.is_empty() {
            continue;
        }
        if segment == "len()" {
            tokens.push(PathToken::Len);
            continue;
        }
        match segment.find('[') {
            Some(bracket_pos) if !segment.starts_with('/') => {
                let field = &segment[..bracket_pos];
                if !field.is_empty() {
                    tokens.push(PathToken::Field(field.to_string()));
                }
                let mut rest = &segment[bracket_pos..];
                while let Some(start) = rest.find('[') {
                    let end = rest.find(']').expect("unclosed bracket in JSON path");
                    let index: usize = rest[start + 1..end]
                        .parse()
                        .expect("non-numeric array index in JSON path");
                    tokens.push(PathToken::Index(index));
                    rest = &rest[end + 1..];
                }
            }
            _ => tokens.push(PathToken::Field(segment.to_string())),
        }
    }
    tokens
}

pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root.clone();
    for token in tokenize_path(path) {
        current = match token {
            PathToken::Field(name) => current.get(&name).cloned().unwrap_or(Value::Null),
            PathToken::Index(idx) => current.get(idx).cloned().unwrap_or(Value::Null),
            PathToken::Len => {
                let len = match &current {
                    Value::Array(a) => a.len(),
                    Value::Object(o) => o.len(),
                    Value::String(s) => s.len(),
                    other => panic!("len() applied to non-collection value {other}"),
                };
                Value::from(len)
            }
        };
    }
    current
}

// ─── TestResponse ───

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_created(self) -> Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected {expected}, got {}\nBody: {}",
            self.status,
            self.text()
        );
        self
    }

    /// Assert that a JSON path resolves to the expected value.
    ///
    /// ```ignore
    /// resp.assert_json_path("pets[0].name", "Rex")
    ///     .assert_json_path("pets.len()", 2);
    /// ```
    pub fn assert_json_path(self, path: &str, expected: impl Into<Value>) -> Self {
        let root: Value = self.json();
        let actual = resolve_path(&root, path);
        let expected = expected.into();
        assert_eq!(
            actual, expected,
            "JSON path \"{path}\" assertion failed\n  Expected: {expected}\n  Actual:   {actual}\n  Body: {root}",
        );
        self
    }

    /// Assert that the whole body equals `expected`.
    pub fn assert_json(self, expected: Value) -> Self {
        let actual: Value = self.json();
        assert_eq!(actual, expected, "JSON body mismatch");
        self
    }

    /// Assert a response header value.
    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        let actual = self.header(name).map(str::to_string);
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "header `{name}` mismatch"
        );
        self
    }

    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name: HeaderName = name.as_ref().parse().ok()?;
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Deserialize the entire response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Failed to parse JSON: {e}\nBody: {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tokenizes_fields_and_indices() {
        let doc = json!({"tags": [{"name": "pets"}], "info": {"title": "t"}});
        assert_eq!(resolve_path(&doc, "tags[0].name"), json!("pets"));
        assert_eq!(resolve_path(&doc, "info.title"), json!("t"));
        assert_eq!(resolve_path(&doc, "tags.len()"), json!(1));
        assert_eq!(resolve_path(&doc, "missing.field"), Value::Null);
    }

    #[test]
    fn slash_segments_are_single_fields() {
        let doc = json!({"paths": {"/pets": {"get": {"summary": "list"}}}});
        assert_eq!(resolve_path(&doc, "paths./pets.get.summary"), json!("list"));
    }

    #[tokio::test]
    async fn query_pairs_are_encoded() {
        async fn echo(uri: http::Uri) -> String {
            uri.query().unwrap_or_default().to_string()
        }
        let app = TestApp::new(Router::new().route("/q", axum::routing::get(echo)));
        let resp = app.get("/q").query("a", "x y").query("b", 2).send().await;
        assert_eq!(resp.text(), "a=x+y&b=2");
    }
}
