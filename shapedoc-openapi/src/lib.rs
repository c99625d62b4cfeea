mod assemble;
mod builder;
mod config;
mod error;
mod ext;
pub mod extract;
mod handlers;
mod registry;
pub mod types;

pub use assemble::{path_parameters, split_definitions};
pub use builder::{build_openapi_schema, OPENAPI_VERSION};
pub use config::{
    OpenApiConfig, DEFAULT_OPENAPI_PATH, DEFAULT_REDOC_JS_URL, DEFAULT_REDOC_PATH,
    DEFAULT_SWAGGER_CSS_URL, DEFAULT_SWAGGER_JS_URL, DEFAULT_SWAGGER_PATH, DEFAULT_VERSION,
};
pub use error::OpenApiError;
pub use ext::OpenApiExtension;
pub use extract::OperationMeta;
pub use handlers::{render_redoc, render_swagger};
pub use registry::ComponentsRegistry;
pub use types::{
    ApiKeyLocation, ExternalDocs, OAuthFlow, OAuthFlows, SecurityScheme, ServerObject,
    ServerVariable, TagObject,
};
