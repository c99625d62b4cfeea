use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use shapedoc_core::error_response;
use shapedoc_core::RouteTable;

use crate::builder::build_openapi_schema;
use crate::config::OpenApiConfig;

/// Everything the documentation endpoints need, shared between requests.
pub(crate) struct DocState {
    pub table: RouteTable,
    pub config: OpenApiConfig,
    pub title: String,
}

/// Build an `axum::Router` serving the document and the enabled UI pages.
///
/// The document is rebuilt on every request.
pub(crate) fn doc_routes<S: Clone + Send + Sync + 'static>(state: Arc<DocState>) -> Router<S> {
    let Some(openapi_path) = state.config.openapi_path.clone() else {
        return Router::new();
    };

    let document_state = state.clone();
    let mut router = Router::<S>::new().route(
        &openapi_path,
        get(move || {
            let state = document_state.clone();
            async move { openapi_document(&state) }
        }),
    );

    if let Some(redoc_path) = &state.config.redoc_path {
        let page = render_redoc(&state.title, &openapi_path, &state.config.redoc_js_url);
        router = router.route(redoc_path, get(move || async move { Html(page) }));
    }

    if let Some(swagger_path) = &state.config.swagger_path {
        let page = render_swagger(
            &state.title,
            &openapi_path,
            &state.config.swagger_js_url,
            &state.config.swagger_css_url,
        );
        router = router.route(swagger_path, get(move || async move { Html(page) }));
    }

    router
}

fn openapi_document(state: &DocState) -> Response {
    match build_openapi_schema(&state.table, &state.config, &state.title) {
        Ok(document) => (
            [(CONTENT_TYPE, "application/json")],
            document.to_string(),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to build OpenAPI document");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const REDOC_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <style>
    body {
      margin: 0;
      padding: 0;
    }
  </style>
</head>
<body>
  <redoc spec-url="{openapi_path}"></redoc>
  <script src="{redoc_js_url}"></script>
  <noscript>This page requires Javascript to function.</noscript>
</body>
</html>"#;

const SWAGGER_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <link type="text/css" rel="stylesheet" href="{swagger_css_url}">
  <title>{title}</title>
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{swagger_js_url}"></script>
  <script>
    const ui = SwaggerUIBundle({
      deepLinking: true,
      dom_id: "#swagger-ui",
      layout: "BaseLayout",
      presets: [
        SwaggerUIBundle.presets.apis,
        SwaggerUIBundle.SwaggerUIStandalonePreset
      ],
      showExtensions: true,
      showCommonExtensions: true,
      url: "{openapi_path}"
    });
  </script>
</body>
</html>"##;

/// The redoc documentation page.
pub fn render_redoc(title: &str, openapi_path: &str, redoc_js_url: &str) -> String {
    REDOC_TEMPLATE
        .replace("{title}", &escape(title))
        .replace("{openapi_path}", &escape(openapi_path))
        .replace("{redoc_js_url}", &escape(redoc_js_url))
}

/// The Swagger UI documentation page.
pub fn render_swagger(
    title: &str,
    openapi_path: &str,
    swagger_js_url: &str,
    swagger_css_url: &str,
) -> String {
    SWAGGER_TEMPLATE
        .replace("{title}", &escape(title))
        .replace("{openapi_path}", &escape(openapi_path))
        .replace("{swagger_js_url}", &escape(swagger_js_url))
        .replace("{swagger_css_url}", &escape(swagger_css_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redoc_page_points_at_document() {
        let page = render_redoc("Pets", "/openapi.json", "https://cdn.example/redoc.js");
        assert!(page.contains(r#"<redoc spec-url="/openapi.json"></redoc>"#));
        assert!(page.contains(r#"<script src="https://cdn.example/redoc.js"></script>"#));
        assert!(page.contains("<title>Pets</title>"));
    }

    #[test]
    fn swagger_page_escapes_title() {
        let page = render_swagger("A <b> & C", "/spec.json", "ui.js", "ui.css");
        assert!(page.contains("<title>A &lt;b&gt; &amp; C</title>"));
        assert!(page.contains(r#"url: "/spec.json""#));
        assert!(page.contains(r#"href="ui.css""#));
        assert!(page.contains(r##"dom_id: "#swagger-ui""##));
    }
}
