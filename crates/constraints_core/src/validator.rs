//! Validator trait.
//!
//! A validator is a named predicate over a field value and the parameters of one
//! constraint. Validators are looked up by name from the constraint map, so every
//! implementation declares the name it answers to.

use crate::{ConstraintParams, FieldValue, ValidatorError};
use std::fmt;

/// A named predicate evaluated against a field value.
///
/// Implementations must be free of observable side effects: the engine may call a
/// validator any number of times, from any thread.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintParams, FieldValue, Validator, ValidatorError};
///
/// struct AssertTrue;
///
/// impl Validator for AssertTrue {
///     fn name(&self) -> &str {
///         "AssertTrue"
///     }
///
///     fn validate(
///         &self,
///         value: &FieldValue,
///         _params: &ConstraintParams,
///     ) -> Result<bool, ValidatorError> {
///         Ok(value.is_empty() || *value == FieldValue::Bool(true))
///     }
/// }
///
/// let params = ConstraintParams::new();
/// assert!(AssertTrue.validate(&FieldValue::from(true), &params).unwrap());
/// assert!(!AssertTrue.validate(&FieldValue::from(false), &params).unwrap());
/// ```
pub trait Validator: Send + Sync {
    /// Name under which the validator is registered (e.g. "Required").
    fn name(&self) -> &str;

    /// Checks `value` against the constraint parameters.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the value satisfies the constraint, `Ok(false)` if it does not,
    /// or an error if the parameters themselves are malformed.
    fn validate(&self, value: &FieldValue, params: &ConstraintParams)
    -> Result<bool, ValidatorError>;
}

/// A validator backed by a closure.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintParams, FieldValue, FnValidator, Validator};
///
/// let even = FnValidator::new("Even", |value, _params| {
///     Ok(value.is_empty() || value.to_number() % 2.0 == 0.0)
/// });
///
/// assert!(even.validate(&FieldValue::from(4), &ConstraintParams::new()).unwrap());
/// ```
pub struct FnValidator<F> {
    name: String,
    predicate: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&FieldValue, &ConstraintParams) -> Result<bool, ValidatorError> + Send + Sync,
{
    /// Creates a validator named `name` that runs `predicate`.
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&FieldValue, &ConstraintParams) -> Result<bool, ValidatorError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(
        &self,
        value: &FieldValue,
        params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        (self.predicate)(value, params)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
