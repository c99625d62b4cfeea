use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shapedoc_core::config::{AppConfig, ConfigError};
use shapedoc_core::SecurityRequirement;

use crate::types::{SecurityScheme, ServerObject, TagObject};

pub const DEFAULT_OPENAPI_PATH: &str = "/openapi.json";
pub const DEFAULT_REDOC_PATH: &str = "/redocs";
pub const DEFAULT_SWAGGER_PATH: &str = "/docs";
pub const DEFAULT_VERSION: &str = "0.1.0";
pub const DEFAULT_SWAGGER_JS_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/swagger-ui/4.12.0/swagger-ui-bundle.js";
pub const DEFAULT_SWAGGER_CSS_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/swagger-ui/4.12.0/swagger-ui.min.css";
pub const DEFAULT_REDOC_JS_URL: &str =
    "https://cdn.jsdelivr.net/npm/redoc@next/bundles/redoc.standalone.js";

/// Configuration for the generated OpenAPI document and its endpoints.
///
/// A path set to `None` disables that endpoint; the documentation UIs are
/// only served when `openapi_path` is set.
#[derive(Debug, Clone)]
pub struct OpenApiConfig {
    pub openapi_path: Option<String>,
    pub redoc_path: Option<String>,
    pub swagger_path: Option<String>,
    /// Defaults to the application name.
    pub title: Option<String>,
    pub version: String,
    pub tags: Option<Vec<TagObject>>,
    pub convert_casing: bool,
    pub servers: Option<Vec<ServerObject>>,
    pub security_schemes: Option<Vec<(String, SecurityScheme)>>,
    pub security: Option<Vec<SecurityRequirement>>,
    pub swagger_js_url: String,
    pub swagger_css_url: String,
    pub redoc_js_url: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            openapi_path: Some(DEFAULT_OPENAPI_PATH.to_string()),
            redoc_path: Some(DEFAULT_REDOC_PATH.to_string()),
            swagger_path: Some(DEFAULT_SWAGGER_PATH.to_string()),
            title: None,
            version: DEFAULT_VERSION.to_string(),
            tags: None,
            convert_casing: false,
            servers: None,
            security_schemes: None,
            security: None,
            swagger_js_url: DEFAULT_SWAGGER_JS_URL.to_string(),
            swagger_css_url: DEFAULT_SWAGGER_CSS_URL.to_string(),
            redoc_js_url: DEFAULT_REDOC_JS_URL.to_string(),
        }
    }
}

impl OpenApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openapi_path(mut self, path: Option<&str>) -> Self {
        self.openapi_path = path.map(str::to_string);
        self
    }

    pub fn with_redoc_path(mut self, path: Option<&str>) -> Self {
        self.redoc_path = path.map(str::to_string);
        self
    }

    pub fn with_swagger_path(mut self, path: Option<&str>) -> Self {
        self.swagger_path = path.map(str::to_string);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_tag(mut self, tag: TagObject) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag);
        self
    }

    /// Convert keys between snake_case and camelCase on the wire.
    pub fn with_casing(mut self, convert_casing: bool) -> Self {
        self.convert_casing = convert_casing;
        self
    }

    pub fn with_server(mut self, server: ServerObject) -> Self {
        self.servers.get_or_insert_with(Vec::new).push(server);
        self
    }

    /// Declare a named security scheme. Declaring a name twice replaces it.
    pub fn with_security_scheme(mut self, name: &str, scheme: SecurityScheme) -> Self {
        let schemes = self.security_schemes.get_or_insert_with(Vec::new);
        match schemes.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = scheme,
            None => schemes.push((name.to_string(), scheme)),
        }
        self
    }

    /// Security requirements applied to every operation without its own.
    pub fn with_security(mut self, requirements: Vec<SecurityRequirement>) -> Self {
        self.security = Some(requirements);
        self
    }

    pub fn with_swagger_assets(mut self, js_url: &str, css_url: &str) -> Self {
        self.swagger_js_url = js_url.to_string();
        self.swagger_css_url = css_url.to_string();
        self
    }

    pub fn with_redoc_js_url(mut self, js_url: &str) -> Self {
        self.redoc_js_url = js_url.to_string();
        self
    }

    /// Read the `openapi.*` section of an application config.
    ///
    /// ```yaml
    /// openapi:
    ///   path: /openapi.json
    ///   redoc: ~            # disables the redoc page
    ///   title: Petstore
    ///   casing: true
    ///   security-schemes:
    ///     bearer: { type: http, scheme: bearer }
    ///   security:
    ///     - name: bearer
    /// ```
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let path = |key: &str, default: Option<String>| -> Result<Option<String>, ConfigError> {
            if config.contains_key(key) {
                config.get::<Option<String>>(key)
            } else {
                Ok(default)
            }
        };

        let security_schemes = section::<Map<String, Value>>(config, "openapi.security-schemes")?
            .map(|schemes| {
                schemes
                    .into_iter()
                    .map(|(name, scheme)| {
                        serde_json::from_value::<SecurityScheme>(scheme)
                            .map(|scheme| (name.clone(), scheme))
                            .map_err(|e| ConfigError::Invalid {
                                key: format!("openapi.security-schemes.{name}"),
                                message: e.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            openapi_path: path("openapi.path", defaults.openapi_path)?,
            redoc_path: path("openapi.redoc", defaults.redoc_path)?,
            swagger_path: path("openapi.swagger", defaults.swagger_path)?,
            title: config.get_or("openapi.title", defaults.title),
            version: config.get_or("openapi.version", defaults.version),
            tags: section(config, "openapi.tags")?,
            convert_casing: config.get_or("openapi.casing", defaults.convert_casing),
            servers: section(config, "openapi.servers")?,
            security_schemes,
            security: section(config, "openapi.security")?,
            swagger_js_url: config.get_or("openapi.swagger-js-url", defaults.swagger_js_url),
            swagger_css_url: config.get_or("openapi.swagger-css-url", defaults.swagger_css_url),
            redoc_js_url: config.get_or("openapi.redoc-js-url", defaults.redoc_js_url),
        })
    }
}

/// A structured section, or `None` when the key is missing or null.
fn section<T: DeserializeOwned>(config: &AppConfig, key: &str) -> Result<Option<T>, ConfigError> {
    if !config.contains_key(key) || config.is_null(key) {
        return Ok(None);
    }
    config.get_section(key).map(Some)
}
