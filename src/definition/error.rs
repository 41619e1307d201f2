//! Error types for loading and validating test procedure definitions.

use thiserror::Error;

use crate::expression::ExpressionError;

/// Errors raised while building or validating a test procedure definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// A parameter value held a malformed or unparseable variable expression.
    #[error("parameter '{key}': {source}")]
    Parameter {
        key: String,
        #[source]
        source: ExpressionError,
    },

    /// YAML parsing or structural deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error while reading a definition file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document value that has no parameter representation.
    #[error("Unsupported value at '{key}': {message}")]
    UnsupportedValue { key: String, message: String },

    /// Schema/type validation failure.
    #[error("{location} {message}")]
    Invalid { location: String, message: String },
}

impl DefinitionError {
    /// Create a validation error.
    pub fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported value error.
    pub fn unsupported(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// The variable expression failure behind this error, if that is what it is.
    pub fn expression_error(&self) -> Option<&ExpressionError> {
        match self {
            Self::Parameter { source, .. } => Some(source),
            _ => None,
        }
    }
}
