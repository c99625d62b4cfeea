//! Route registration.
//!
//! Axum cannot enumerate its routes, so [`ApiRouter`] registers every handler
//! twice: once with the wrapped `axum::Router` for dispatch and once in the
//! [`RouteTable`] the document is built from.

use axum::handler::Handler;
use axum::http::header::ALLOW;
use axum::http::{Method, StatusCode};
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;

use crate::meta::RouteMeta;
use crate::routing::{Rule, RouteTable};

/// Everything served under one Axum path. Rules sharing a template share it.
struct PathRoutes<S> {
    axum_path: String,
    method_router: MethodRouter<S>,
    served: Vec<Method>,
    allow: Vec<Method>,
    automatic_options: bool,
}

impl<S> PathRoutes<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn new(axum_path: String) -> Self {
        Self {
            axum_path,
            method_router: MethodRouter::new(),
            served: Vec::new(),
            allow: Vec::new(),
            automatic_options: false,
        }
    }

    fn serve(&mut self, method: &Method, service: MethodRouter<S>) {
        let current = std::mem::replace(&mut self.method_router, MethodRouter::new());
        self.method_router = current.merge(service);
        self.served.push(method.clone());
    }

    /// `Allow` header value: every method of every rule, `OPTIONS` last.
    fn allow_header(&self) -> String {
        self.allow
            .iter()
            .filter(|m| **m != Method::OPTIONS)
            .chain(std::iter::once(&Method::OPTIONS))
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn into_method_router(self) -> MethodRouter<S> {
        if !self.automatic_options || self.served.contains(&Method::OPTIONS) {
            return self.method_router;
        }
        let allow = self.allow_header();
        self.method_router.on(MethodFilter::OPTIONS, move || async move {
            (StatusCode::OK, [(ALLOW, allow)])
        })
    }
}

/// An `axum::Router` paired with the route table describing it.
pub struct ApiRouter<S = ()> {
    name: String,
    paths: Vec<PathRoutes<S>>,
    table: RouteTable,
}

impl<S> ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create an empty router for the application called `name`.
    ///
    /// The name is the default document title.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
            table: RouteTable::new(),
        }
    }

    fn path_routes(&mut self, axum_path: String) -> &mut PathRoutes<S> {
        let index = match self.paths.iter().position(|p| p.axum_path == axum_path) {
            Some(index) => index,
            None => {
                self.paths.push(PathRoutes::new(axum_path));
                self.paths.len() - 1
            }
        };
        &mut self.paths[index]
    }

    /// Register `handler` for `methods` on the rule template `rule`.
    ///
    /// `GET` routes also answer `HEAD`. Unless `OPTIONS` is listed, an
    /// automatic handler answers it with an `Allow` header covering every rule
    /// on the same path. A method already served on the path by an earlier
    /// rule keeps its first handler.
    pub fn route<H, T>(
        mut self,
        rule: &str,
        endpoint: &str,
        methods: &[Method],
        handler: H,
        meta: RouteMeta,
    ) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let rule = Rule::new(rule, endpoint, methods.iter().cloned());
        let routes = self.path_routes(rule.axum_path());
        for method in rule.methods() {
            if !routes.allow.contains(method) {
                routes.allow.push(method.clone());
            }
            if *method == Method::HEAD {
                continue;
            }
            if *method == Method::OPTIONS && rule.provides_automatic_options() {
                routes.automatic_options = true;
                continue;
            }
            if routes.served.contains(method) {
                tracing::warn!(rule = %rule.rule(), method = %method, "method already served on this path, skipped");
                continue;
            }
            match MethodFilter::try_from(method.clone()) {
                Ok(filter) => routes.serve(method, MethodRouter::new().on(filter, handler.clone())),
                Err(_) => {
                    tracing::warn!(rule = %rule.rule(), method = %method, "unsupported method skipped")
                }
            }
        }

        tracing::debug!(
            rule = %rule.rule(),
            endpoint = %rule.endpoint(),
            methods = %rule.allow_header(),
            "route registered"
        );
        self.table.insert(rule, meta);
        self
    }

    /// Register a websocket upgrade route. It is served but never documented.
    pub fn websocket(mut self, rule: &str, endpoint: &str, method_router: MethodRouter<S>) -> Self {
        let rule = Rule::websocket(rule, endpoint);
        let routes = self.path_routes(rule.axum_path());
        if routes.served.contains(&Method::GET) {
            tracing::warn!(rule = %rule.rule(), "GET already served on this path, websocket skipped");
        } else {
            routes.serve(&Method::GET, method_router);
            if !routes.allow.contains(&Method::GET) {
                routes.allow.push(Method::GET);
            }
        }
        tracing::debug!(rule = %rule.rule(), endpoint = %rule.endpoint(), "websocket registered");
        self.table.insert(rule, RouteMeta::default());
        self
    }

    /// Record a rule in the table without serving it.
    ///
    /// Used for routes served by a separately merged router.
    pub fn record(&mut self, rule: Rule, meta: RouteMeta) {
        self.table.insert(rule, meta);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Finish the served routes into an `axum::Router`.
    pub fn into_parts(self) -> (String, Router<S>, RouteTable) {
        let router = self
            .paths
            .into_iter()
            .fold(Router::new(), |router, routes| {
                let path = routes.axum_path.clone();
                router.route(&path, routes.into_method_router())
            });
        (self.name, router, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_recorded_in_order() {
        let router: ApiRouter = ApiRouter::new("demo")
            .route("/b", "b", &[Method::GET], || async { "b" }, RouteMeta::default())
            .route(
                "/a/<int:id>",
                "a",
                &[Method::POST, Method::PUT],
                || async { "a" },
                RouteMeta::hidden(),
            );
        assert_eq!(router.name(), "demo");
        let rules: Vec<&str> = router.table().rules().iter().map(Rule::rule).collect();
        assert_eq!(rules, vec!["/b", "/a/<int:id>"]);
        assert!(router.table().meta("a").unwrap().is_hidden());
    }

    #[test]
    fn record_does_not_serve() {
        let mut router: ApiRouter = ApiRouter::new("demo");
        router.record(Rule::new("/docs", "docs", [Method::GET]), RouteMeta::hidden());
        assert_eq!(router.table().len(), 1);
    }

    #[test]
    fn rules_on_one_path_share_an_entry() {
        let router: ApiRouter = ApiRouter::new("demo")
            .route("/pets", "list", &[Method::GET], || async {}, RouteMeta::default())
            .route("/pets", "create", &[Method::POST], || async {}, RouteMeta::default())
            .route("/pets", "again", &[Method::GET], || async {}, RouteMeta::default());
        assert_eq!(router.paths.len(), 1);
        assert_eq!(router.paths[0].served, vec![Method::GET, Method::POST]);
        assert_eq!(router.paths[0].allow_header(), "GET, HEAD, POST, OPTIONS");
        assert_eq!(router.table().len(), 3);
    }
}
