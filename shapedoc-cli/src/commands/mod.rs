//! Command implementations.

/// Document export: `schema`.
///
/// Builds the document exactly as the document endpoint would serve it and
/// pretty-prints it.
pub mod schema;

/// Route listing: `routes`.
pub mod routes;
