//! Error types for validation and constraint loading.

use constraints_core::ValidatorError;
use thiserror::Error;

/// Errors that can occur while validating a value.
///
/// Unknown types, fields and validator names are not errors: they are logged and
/// treated as passing. Only a validator that cannot evaluate its constraint aborts
/// validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A validator rejected its constraint parameters
    #[error("Validator '{validator}' failed for field '{type_name}.{field}': {source}")]
    Validator {
        type_name: String,
        field: String,
        validator: String,
        #[source]
        source: ValidatorError,
    },
}

impl ValidationError {
    /// Wraps a validator error with the location it occurred at.
    pub fn validator(
        type_name: impl Into<String>,
        field: impl Into<String>,
        validator: impl Into<String>,
        source: ValidatorError,
    ) -> Self {
        Self::Validator {
            type_name: type_name.into(),
            field: field.into(),
            validator: validator.into(),
            source,
        }
    }
}

/// Errors that can occur while loading constraints from a remote source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request could not be sent or the response not read
    #[error("Failed to fetch constraints from {url}: {message}")]
    Http { url: String, message: String },

    /// The server answered with a non-success status
    #[error("Constraint source {url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The response body is not a valid constraint map
    #[error("Invalid constraint map from {url}: {message}")]
    Body { url: String, message: String },
}

impl LoadError {
    /// Creates a new transport error.
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new malformed body error.
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Body {
            url: url.into(),
            message: message.into(),
        }
    }
}
