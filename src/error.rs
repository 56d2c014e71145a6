// Error types module

use thiserror::Error;

/// Errors raised while building an asset URL
///
/// Building a URL never touches I/O, so the only failures are caller
/// mistakes in the input handed to the builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// A parameter value that has no scalar textual form (array, object, null)
    #[error("Invalid parameter type for '{key}': {kind} cannot be used as a query value")]
    InvalidParameterType { key: String, kind: String },

    /// The source host is empty
    #[error("Host cannot be empty")]
    EmptyHost,
}

impl UrlError {
    pub fn invalid_type(key: impl Into<String>, kind: impl Into<String>) -> Self {
        UrlError::InvalidParameterType {
            key: key.into(),
            kind: kind.into(),
        }
    }
}

/// Errors raised while loading source configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
