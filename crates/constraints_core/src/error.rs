//! Error types for constraint evaluation.
//!
//! Configuration gaps (unknown types, fields or validator names) are not errors;
//! they are reported as warnings by the engine. The errors here describe malformed
//! constraint payloads that a validator cannot evaluate.

use thiserror::Error;

/// Result type for validator operations.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Error raised by a validator that cannot evaluate its constraint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// Regular expression could not be compiled
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as written in the constraint
        pattern: String,
        /// Compiler error message
        message: String,
    },

    /// Constraint parameter has the wrong shape
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Description of the problem
        message: String,
    },

    /// Generic validator error
    #[error("{0}")]
    Other(String),
}

impl ValidatorError {
    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid parameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidatorError::invalid_pattern("[a-", "unclosed character class");
        assert_eq!(
            err.to_string(),
            "Invalid pattern '[a-': unclosed character class"
        );

        let err = ValidatorError::invalid_parameter("min", "expected a number");
        assert_eq!(err.to_string(), "Invalid parameter 'min': expected a number");
    }
}
