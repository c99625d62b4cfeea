use std::sync::Arc;

use axum::http::Method;
use axum::{middleware, Extension, Router};
use serde_json::Value;
use shapedoc_core::config::{AppConfig, ConfigError};
use shapedoc_core::{camelize_json_responses, ApiRouter, Casing, RouteMeta, Rule};

use crate::builder::build_openapi_schema;
use crate::config::OpenApiConfig;
use crate::error::OpenApiError;
use crate::handlers::{doc_routes, DocState};

/// Installs OpenAPI document generation, the documentation pages and the
/// payload casing policy on an application.
///
/// # Example
///
/// ```ignore
/// use shapedoc_openapi::{OpenApiConfig, OpenApiExtension};
///
/// let app = ApiRouter::new("petstore")
///     .route("/pets", "list_pets", &[Method::GET], list_pets, list_pets_meta());
///
/// let router = OpenApiExtension::new(
///     OpenApiConfig::new().with_title("Petstore").with_casing(true),
/// )
/// .init_app(app);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenApiExtension {
    config: OpenApiConfig,
}

impl OpenApiExtension {
    pub fn new(config: OpenApiConfig) -> Self {
        Self { config }
    }

    /// Build the extension from the `openapi.*` section of an application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(OpenApiConfig::from_config(config)?))
    }

    pub fn config(&self) -> &OpenApiConfig {
        &self.config
    }

    /// Build the document for `app` without serving it.
    pub fn build_document<S>(&self, app: &ApiRouter<S>) -> Result<Value, OpenApiError>
    where
        S: Clone + Send + Sync + 'static,
    {
        build_openapi_schema(app.table(), &self.config, app.name())
    }

    /// Finish `app` into a servable router.
    ///
    /// The document and UI endpoints are recorded as hidden routes, so they
    /// never appear in the document. Application routes get the [`Casing`]
    /// request extension and, when casing is on, camelized JSON responses;
    /// the documentation endpoints are left untouched.
    pub fn init_app<S>(self, app: ApiRouter<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let config = self.config;
        let casing = Casing::from_flag(config.convert_casing);

        let mut app = app;
        if let Some(openapi_path) = &config.openapi_path {
            app.record(
                Rule::new(openapi_path.as_str(), "openapi", [Method::GET]),
                RouteMeta::hidden(),
            );
            if let Some(redoc_path) = &config.redoc_path {
                app.record(
                    Rule::new(redoc_path.as_str(), "redoc_ui", [Method::GET]),
                    RouteMeta::hidden(),
                );
            }
            if let Some(swagger_path) = &config.swagger_path {
                app.record(
                    Rule::new(swagger_path.as_str(), "swagger_ui", [Method::GET]),
                    RouteMeta::hidden(),
                );
            }
        }

        let (name, mut router, table) = app.into_parts();
        if casing.is_camel() {
            router = router.layer(middleware::from_fn(camelize_json_responses));
        }

        let title = config.title.clone().unwrap_or(name);
        tracing::info!(
            title = %title,
            routes = table.len(),
            casing = ?casing,
            openapi_path = ?config.openapi_path,
            "OpenAPI extension installed"
        );

        let state = Arc::new(DocState {
            table,
            config,
            title,
        });
        router.merge(doc_routes::<S>(state)).layer(Extension(casing))
    }
}
