pub mod casing;
pub mod config;
pub mod error;
pub mod extract;
pub mod layers;
pub mod meta;
pub mod response;
pub mod router;
pub mod routing;
pub mod shape;

pub use casing::{camelize, camelize_schema, camelize_value, decamelize, decamelize_value, Casing};
pub use config::{AppConfig, ConfigError, ConfigValue, FromConfigValue};
pub use error::{error_response, ApiError};
pub use extract::{ValidatedForm, ValidatedHeaders, ValidatedJson, ValidatedQuery};
pub use layers::init_tracing;
pub use meta::{DataSource, ResponseSpec, RouteMeta, RouteMetaBuilder, SecurityRequirement};
pub use response::{camelize_json_responses, Typed, TypedResponse};
pub use router::ApiRouter;
pub use routing::{ConverterKind, PathConverter, RouteTable, Rule};
pub use shape::{
    provided_shape, shape_of, DescribeError, Provided, SchemaProvider, Schemars, Shape,
    ShapeDescription, ShapeRef, REF_PREFIX,
};

pub use schemars;
