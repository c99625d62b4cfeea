//! The route table: registered rules plus their metadata side-table.
//!
//! Rule templates use `<converter:name>` or `<name>` placeholders, e.g.
//! `/pets/<int:pet_id>/photos/<path:file>`. The same template is rewritten
//! to Axum's `{name}` / `{*name}` syntax for dispatch and to OpenAPI's
//! `{name}` syntax for documentation.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use axum::http::Method;
use regex::Regex;

use crate::meta::RouteMeta;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:([^:<>]*):)?([^<>]+)>").expect("placeholder pattern is valid")
});

/// Kind of a path converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterKind {
    /// No converter given: a single path segment.
    Default,
    String,
    Int,
    Float,
    /// Matches the rest of the path, slashes included.
    Path,
    Uuid,
    Any,
    Custom(String),
}

impl ConverterKind {
    /// Parse a converter name, ignoring any `(arguments)` suffix.
    pub fn parse(raw: &str) -> Self {
        let name = raw.split('(').next().unwrap_or(raw).trim();
        match name {
            "" | "default" => ConverterKind::Default,
            "string" => ConverterKind::String,
            "int" => ConverterKind::Int,
            "float" => ConverterKind::Float,
            "path" => ConverterKind::Path,
            "uuid" => ConverterKind::Uuid,
            "any" => ConverterKind::Any,
            other => ConverterKind::Custom(other.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ConverterKind::Int | ConverterKind::Float)
    }
}

/// One placeholder in a rule template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConverter {
    pub name: String,
    pub kind: ConverterKind,
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct Rule {
    rule: String,
    endpoint: String,
    methods: Vec<Method>,
    websocket: bool,
    provide_automatic_options: bool,
    converters: Vec<PathConverter>,
}

impl Rule {
    /// Create an HTTP rule.
    ///
    /// `HEAD` is added when `GET` is served; `OPTIONS` is added and flagged as
    /// automatic unless it was declared explicitly.
    pub fn new(
        rule: impl Into<String>,
        endpoint: impl Into<String>,
        methods: impl IntoIterator<Item = Method>,
    ) -> Self {
        let mut declared: Vec<Method> = Vec::new();
        for method in methods {
            if !declared.contains(&method) {
                declared.push(method);
            }
        }
        if declared.contains(&Method::GET) && !declared.contains(&Method::HEAD) {
            declared.push(Method::HEAD);
        }
        let provide_automatic_options = !declared.contains(&Method::OPTIONS);
        if provide_automatic_options {
            declared.push(Method::OPTIONS);
        }

        let rule = rule.into();
        let converters = parse_converters(&rule);
        Self {
            rule,
            endpoint: endpoint.into(),
            methods: declared,
            websocket: false,
            provide_automatic_options,
            converters,
        }
    }

    /// Create a websocket rule; websocket rules never appear in documents.
    pub fn websocket(rule: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let rule = rule.into();
        let converters = parse_converters(&rule);
        Self {
            rule,
            endpoint: endpoint.into(),
            methods: vec![Method::GET],
            websocket: true,
            provide_automatic_options: false,
            converters,
        }
    }

    /// The template as registered.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Every method the rule answers, automatic ones included.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_websocket(&self) -> bool {
        self.websocket
    }

    pub fn provides_automatic_options(&self) -> bool {
        self.provide_automatic_options
    }

    pub fn converters(&self) -> &[PathConverter] {
        &self.converters
    }

    /// Methods worth documenting: no `HEAD`, no automatic `OPTIONS`.
    pub fn documented_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(move |m| {
            **m != Method::HEAD && !(**m == Method::OPTIONS && self.provide_automatic_options)
        })
    }

    /// Value of the `Allow` header for automatic `OPTIONS` responses.
    pub fn allow_header(&self) -> String {
        self.methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Template in OpenAPI form: `/pets/<int:id>` → `/pets/{id}`.
    pub fn openapi_path(&self) -> String {
        openapi_path(&self.rule)
    }

    /// Template in Axum form; `path` converters become wildcards.
    pub fn axum_path(&self) -> String {
        PLACEHOLDER
            .replace_all(&self.rule, |caps: &regex::Captures<'_>| {
                let kind = ConverterKind::parse(caps.get(1).map_or("", |m| m.as_str()));
                let name = &caps[2];
                if kind == ConverterKind::Path {
                    format!("{{*{name}}}")
                } else {
                    format!("{{{name}}}")
                }
            })
            .into_owned()
    }
}

/// Rewrite `<converter:name>` and `<name>` placeholders to `{name}`.
pub fn openapi_path(rule: &str) -> String {
    PLACEHOLDER.replace_all(rule, "{$2}").into_owned()
}

fn parse_converters(rule: &str) -> Vec<PathConverter> {
    PLACEHOLDER
        .captures_iter(rule)
        .map(|caps| PathConverter {
            name: caps[2].to_string(),
            kind: ConverterKind::parse(caps.get(1).map_or("", |m| m.as_str())),
        })
        .collect()
}

/// Registered rules, in registration order, plus the endpoint → metadata side-table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<Rule>,
    meta: HashMap<String, Arc<RouteMeta>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule and the metadata of its endpoint.
    ///
    /// Metadata is stored per endpoint: registering a second rule for the same
    /// endpoint replaces the endpoint's metadata.
    pub fn insert(&mut self, rule: Rule, meta: RouteMeta) {
        self.meta.insert(rule.endpoint.clone(), Arc::new(meta));
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Metadata attached to an endpoint, if any was registered.
    pub fn meta(&self, endpoint: &str) -> Option<&RouteMeta> {
        self.meta.get(endpoint).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
