//! Builder pattern for creating constraint maps.
//!
//! This module provides ergonomic builders for constructing constraint maps
//! and field constraint sets with a fluent API.

use crate::{ConstraintMap, ConstraintParams, FieldConstraints};
use serde_json::Value;

/// Builder for creating a `ConstraintMap`.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintMapBuilder, FieldBuilder};
///
/// let constraints = ConstraintMapBuilder::new()
///     .field("Person", "email", FieldBuilder::new().required().email().build())
///     .field("Person", "age", FieldBuilder::new().min(18.0).build())
///     .build();
///
/// assert_eq!(constraints.constraint_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ConstraintMapBuilder {
    map: ConstraintMap,
}

impl ConstraintMapBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constraints of a field.
    pub fn field(
        mut self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        constraints: FieldConstraints,
    ) -> Self {
        self.map.insert_field(type_name, field, constraints);
        self
    }

    /// Registers a type that has no field constraints yet.
    pub fn empty_type(mut self, type_name: impl Into<String>) -> Self {
        self.map.insert_type(type_name);
        self
    }

    /// Builds the constraint map.
    pub fn build(self) -> ConstraintMap {
        self.map
    }
}

/// Builder for the ordered constraints of one field.
///
/// Shortcut methods use the names of the built-in validators.
#[derive(Debug, Default)]
pub struct FieldBuilder {
    constraints: FieldConstraints,
    last: Option<String>,
}

impl FieldBuilder {
    /// Creates a new, empty field builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint for any validator name.
    pub fn constraint(mut self, validator: impl Into<String>, params: ConstraintParams) -> Self {
        let validator = validator.into();
        self.constraints.insert(validator.clone(), params);
        self.last = Some(validator);
        self
    }

    /// Sets a parameter on the most recently added constraint.
    ///
    /// Does nothing if no constraint was added yet.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(last) = &self.last {
            let mut params = self.constraints.get(last).cloned().unwrap_or_default();
            params.insert(key, value);
            self.constraints.insert(last.clone(), params);
        }
        self
    }

    /// Sets the message of the most recently added constraint.
    pub fn message(self, message: impl Into<String>) -> Self {
        self.param("message", message.into())
    }

    /// Adds a `Required` constraint.
    pub fn required(self) -> Self {
        self.constraint("Required", ConstraintParams::new())
    }

    /// Adds a `Size` constraint with optional bounds.
    pub fn size(self, min: Option<u64>, max: Option<u64>) -> Self {
        let mut params = ConstraintParams::new();
        if let Some(min) = min {
            params.insert("min", min);
        }
        if let Some(max) = max {
            params.insert("max", max);
        }
        self.constraint("Size", params)
    }

    /// Adds a `Min` constraint.
    pub fn min(self, value: f64) -> Self {
        self.constraint("Min", ConstraintParams::new().with("value", value))
    }

    /// Adds a `Max` constraint.
    pub fn max(self, value: f64) -> Self {
        self.constraint("Max", ConstraintParams::new().with("value", value))
    }

    /// Adds an `Email` constraint.
    pub fn email(self) -> Self {
        self.constraint("Email", ConstraintParams::new())
    }

    /// Adds a `Url` constraint.
    pub fn url(self) -> Self {
        self.constraint("Url", ConstraintParams::new())
    }

    /// Adds a `Digits` constraint.
    pub fn digits(self, integer: u32, fraction: u32) -> Self {
        self.constraint(
            "Digits",
            ConstraintParams::new()
                .with("integer", integer)
                .with("fraction", fraction),
        )
    }

    /// Adds a `Pattern` constraint (`/pattern/flags` or a bare pattern).
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.constraint("Pattern", ConstraintParams::new().with("value", pattern.into()))
    }

    /// Adds a `Past` constraint.
    pub fn past(self) -> Self {
        self.constraint("Past", ConstraintParams::new())
    }

    /// Adds a `Future` constraint.
    pub fn future(self) -> Self {
        self.constraint("Future", ConstraintParams::new())
    }

    /// Builds the field constraints.
    pub fn build(self) -> FieldConstraints {
        self.constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_builder_order_and_messages() {
        let constraints = FieldBuilder::new()
            .required()
            .message("message.required")
            .size(Some(2), None)
            .message("message.size")
            .pattern("/^[a-z]+$/i")
            .build();

        assert_eq!(
            constraints.names().collect::<Vec<_>>(),
            vec!["Required", "Size", "Pattern"]
        );
        assert_eq!(
            constraints.get("Required").unwrap().message(),
            Some("message.required")
        );
        let size = constraints.get("Size").unwrap();
        assert_eq!(size.get_f64("min"), Some(2.0));
        assert!(!size.contains("max"));
        assert_eq!(size.message(), Some("message.size"));
    }

    #[test]
    fn test_param_without_constraint_is_ignored() {
        let constraints = FieldBuilder::new().message("orphan").build();
        assert!(constraints.is_empty());
    }

    #[test]
    fn test_map_builder() {
        let map = ConstraintMapBuilder::new()
            .field("Person", "name", FieldBuilder::new().required().build())
            .field("Address", "zip", FieldBuilder::new().digits(5, 0).build())
            .empty_type("Empty")
            .build();

        assert_eq!(
            map.type_names().collect::<Vec<_>>(),
            vec!["Address", "Empty", "Person"]
        );
        assert!(map.type_constraints("Empty").unwrap().is_empty());
    }
}
