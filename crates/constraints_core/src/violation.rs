//! Validation outcomes.

use crate::{ConstraintParams, FieldValue, interpolate};
use serde::Serialize;

/// A single failed constraint.
///
/// Carries everything a message renderer needs: the offending value, where it came
/// from, which validator rejected it and the full constraint parameters so that
/// templates can refer to `min`, `max` and friends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The value that failed validation
    pub value: FieldValue,

    /// Field name
    pub field: String,

    /// Type name the field belongs to
    #[serde(rename = "type")]
    pub type_name: String,

    /// Name of the validator that failed
    pub validator: String,

    /// Parameters of the failed constraint
    pub params: ConstraintParams,
}

impl Violation {
    /// Returns the message configured on the constraint, if any.
    pub fn message(&self) -> Option<&str> {
        self.params.message()
    }

    /// Returns the `<type>.<field>` key used to look up a display name for the field.
    pub fn field_name_key(&self) -> String {
        format!("{}.{}", self.type_name, self.field)
    }

    /// Renders the violation message.
    ///
    /// The constraint's `message` is used as a template (see [`interpolate`]); without
    /// one a generic description is produced.
    pub fn render(&self) -> String {
        match self.message() {
            Some(template) => interpolate(template, self),
            None => format!(
                "{}: {} constraint violated",
                self.field_name_key(),
                self.validator
            ),
        }
    }
}

/// Result of validating one value.
///
/// `violations` is `None` when nothing failed, whether or not any constraint ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Whether every evaluated constraint passed
    pub valid: bool,

    /// Failed constraints in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl ValidationResult {
    /// Creates a passing result with no violations.
    pub fn valid() -> Self {
        Self {
            valid: true,
            violations: None,
        }
    }

    /// Creates a result from the collected violations.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::valid()
        } else {
            Self {
                valid: false,
                violations: Some(violations),
            }
        }
    }

    /// Returns true if validation passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the violations, or an empty slice when there are none.
    pub fn violations(&self) -> &[Violation] {
        self.violations.as_deref().unwrap_or_default()
    }

    /// Returns the first violation, the one usually shown to the user.
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations().first()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}
