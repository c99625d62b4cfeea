use std::fmt;

use shapedoc_openapi::OpenApiError;

/// Errors returned by the CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// The document could not be built.
    Build(OpenApiError),
    /// The output file could not be written.
    Io(std::io::Error),
    /// The document could not be rendered as JSON.
    Serialize(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Build(err) => write!(f, "cannot build OpenAPI document: {err}"),
            CliError::Io(err) => write!(f, "cannot write output: {err}"),
            CliError::Serialize(err) => write!(f, "cannot render document: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Build(err) => Some(err),
            CliError::Io(err) => Some(err),
            CliError::Serialize(err) => Some(err),
        }
    }
}

impl From<OpenApiError> for CliError {
    fn from(err: OpenApiError) -> Self {
        CliError::Build(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialize(err)
    }
}
