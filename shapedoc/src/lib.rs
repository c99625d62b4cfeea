//! shapedoc: OpenAPI 3.0 documents synthesized from the shapes declared on
//! axum routes.
//!
//! This facade crate re-exports the sub-crates through a single dependency
//! with feature flags:
//!
//! ```ignore
//! use shapedoc::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate              |
//! |-----------|---------|--------------------|
//! | `openapi` | **yes** | `shapedoc-openapi` |
//! | `cli`     | no      | `shapedoc-cli`     |
//! | `full`    | no      | All of the above   |

pub extern crate shapedoc_core;

// Everything from shapedoc-core at the top level.
pub use shapedoc_core::*;

#[cfg(feature = "openapi")]
pub use shapedoc_openapi;

#[cfg(feature = "cli")]
pub use shapedoc_cli;

/// Import the common types with `use shapedoc::prelude::*`.
pub mod prelude {
    pub use shapedoc_core::{
        init_tracing, ApiError, ApiRouter, AppConfig, Casing, DataSource, RouteMeta,
        SecurityRequirement, Shape, Typed, TypedResponse, ValidatedForm, ValidatedHeaders,
        ValidatedJson, ValidatedQuery,
    };

    #[cfg(feature = "openapi")]
    pub use shapedoc_openapi::{
        OpenApiConfig, OpenApiExtension, SecurityScheme, ServerObject, TagObject,
    };

    #[cfg(feature = "cli")]
    pub use shapedoc_cli::{RoutesCommand, SchemaCommand};
}
