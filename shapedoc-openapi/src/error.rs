use shapedoc_core::DescribeError;

/// Error raised while building an OpenAPI document.
///
/// A build either produces a complete document or fails; there is no
/// partial result.
#[derive(Debug)]
pub enum OpenApiError {
    /// A declared shape could not be described as a schema.
    Describe(DescribeError),
    /// A shape described itself in a form the document cannot use.
    InvalidShape { shape: String, message: String },
    /// A configured document-level object failed to serialize.
    Serialize(String),
}

impl std::fmt::Display for OpenApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenApiError::Describe(err) => write!(f, "{err}"),
            OpenApiError::InvalidShape { shape, message } => {
                write!(f, "invalid shape `{shape}`: {message}")
            }
            OpenApiError::Serialize(msg) => write!(f, "failed to serialize document: {msg}"),
        }
    }
}

impl std::error::Error for OpenApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenApiError::Describe(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DescribeError> for OpenApiError {
    fn from(err: DescribeError) -> Self {
        OpenApiError::Describe(err)
    }
}

impl From<serde_json::Error> for OpenApiError {
    fn from(err: serde_json::Error) -> Self {
        OpenApiError::Serialize(err.to_string())
    }
}
