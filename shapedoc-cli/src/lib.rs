//! # shapedoc-cli
//!
//! Subcommands an application binary can mount next to its own `serve`
//! command.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `schema [-o <path>]` | Build the OpenAPI document and print it or write it to a file |
//! | `routes [--all]` | List the routes registered on the application |
//!
//! Both take the application's [`ApiRouter`](shapedoc_core::ApiRouter)
//! before it is finished into an `axum::Router`, so nothing is served.

pub mod commands;
mod error;

pub use commands::routes::RoutesCommand;
pub use commands::schema::SchemaCommand;
pub use error::CliError;
