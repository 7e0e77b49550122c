//! Constraint map types.
//!
//! A constraint map groups validation rules by type name and field name:
//!
//! ```json
//! {
//!   "Person": {
//!     "lastName": {
//!       "Required": { "message": "message.required" },
//!       "Size": { "min": 2, "max": 10, "message": "message.size" }
//!     }
//!   }
//! }
//! ```
//!
//! The validators of a field keep the order in which they were declared so that
//! violations always come out in a deterministic order.

use crate::ValidatorError;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Parameters attached to a single constraint.
///
/// Parameters are free-form: `message` is shared by all validators, other keys
/// (`min`, `max`, `value`, `integer`, `fraction`, ...) are validator specific.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConstraintParams(Map<String, Value>);

impl ConstraintParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, returning the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the raw value of a parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a parameter as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns a parameter as a number.
    ///
    /// Numeric strings such as `"10"` are accepted, since rules are often
    /// generated from annotations where every value is a string.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns a numeric parameter, failing if it is present but not a number.
    ///
    /// A missing or `null` parameter yields `Ok(None)`.
    pub fn number(&self, key: &str) -> Result<Option<f64>, ValidatorError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_f64(key).map(Some).ok_or_else(|| {
                ValidatorError::invalid_parameter(key, "expected a numeric value")
            }),
        }
    }

    /// Returns the message key or text of the constraint, if any.
    pub fn message(&self) -> Option<&str> {
        self.get_str("message")
    }

    /// Returns true if the parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over all parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ConstraintParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<'de> Deserialize<'de> for ConstraintParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `"Required": null` and `"Required": {}` mean the same thing
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(de::Error::custom(format!(
                "constraint parameters must be an object, found {}",
                other
            ))),
        }
    }
}

/// A named validator reference plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name of the validator to run (e.g. "Required", "Size")
    pub validator: String,

    /// Parameters handed to the validator
    pub params: ConstraintParams,
}

impl Constraint {
    /// Creates a new constraint.
    pub fn new(validator: impl Into<String>, params: ConstraintParams) -> Self {
        Self {
            validator: validator.into(),
            params,
        }
    }
}

/// Ordered validator name → parameters mapping for one field.
///
/// Validator names are unique. Inserting a name that is already present replaces
/// its parameters but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConstraints {
    constraints: Vec<Constraint>,
}

impl FieldConstraints {
    /// Creates an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the constraint for a validator.
    pub fn insert(&mut self, validator: impl Into<String>, params: ConstraintParams) {
        let validator = validator.into();
        match self.constraints.iter_mut().find(|c| c.validator == validator) {
            Some(existing) => existing.params = params,
            None => self.constraints.push(Constraint::new(validator, params)),
        }
    }

    /// Returns the parameters configured for a validator.
    pub fn get(&self, validator: &str) -> Option<&ConstraintParams> {
        self.constraints
            .iter()
            .find(|c| c.validator == validator)
            .map(|c| &c.params)
    }

    /// Returns true if the validator is configured for this field.
    pub fn contains(&self, validator: &str) -> bool {
        self.get(validator).is_some()
    }

    /// Removes the constraint for a validator, returning its parameters.
    pub fn remove(&mut self, validator: &str) -> Option<ConstraintParams> {
        let idx = self
            .constraints
            .iter()
            .position(|c| c.validator == validator)?;
        Some(self.constraints.remove(idx).params)
    }

    /// Iterates over the constraints in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    /// Iterates over the validator names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|c| c.validator.as_str())
    }

    /// Returns the number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if no constraints are configured.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldConstraints {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, ConstraintParams)> for FieldConstraints {
    fn from_iter<I: IntoIterator<Item = (S, ConstraintParams)>>(iter: I) -> Self {
        let mut constraints = Self::new();
        for (name, params) in iter {
            constraints.insert(name, params);
        }
        constraints
    }
}

impl Serialize for FieldConstraints {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.constraints.len()))?;
        for constraint in &self.constraints {
            map.serialize_entry(&constraint.validator, &constraint.params)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldConstraints {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldConstraintsVisitor;

        impl<'de> Visitor<'de> for FieldConstraintsVisitor {
            type Value = FieldConstraints;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of validator names to parameters")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut constraints = FieldConstraints::new();
                while let Some((name, params)) =
                    access.next_entry::<String, ConstraintParams>()?
                {
                    constraints.insert(name, params);
                }
                Ok(constraints)
            }
        }

        deserializer.deserialize_map(FieldConstraintsVisitor)
    }
}

/// Field name → constraints for one type.
pub type TypeConstraints = BTreeMap<String, FieldConstraints>;

/// Type name → field name → ordered validator constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintMap {
    types: BTreeMap<String, TypeConstraints>,
}

impl ConstraintMap {
    /// Creates an empty constraint map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the constraints of a type, or `None` if the type is unknown.
    pub fn type_constraints(&self, type_name: &str) -> Option<&TypeConstraints> {
        self.types.get(type_name)
    }

    /// Returns the constraints of a field, or `None` if the type or field is unknown.
    pub fn field_constraints(&self, type_name: &str, field: &str) -> Option<&FieldConstraints> {
        self.types.get(type_name)?.get(field)
    }

    /// Returns true if the type has been configured (even with no fields).
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Sets the constraints of a field, replacing any previous set.
    pub fn insert_field(
        &mut self,
        type_name: impl Into<String>,
        field: impl Into<String>,
        constraints: FieldConstraints,
    ) {
        self.types
            .entry(type_name.into())
            .or_default()
            .insert(field.into(), constraints);
    }

    /// Registers a type without any field constraints.
    pub fn insert_type(&mut self, type_name: impl Into<String>) {
        self.types.entry(type_name.into()).or_default();
    }

    /// Merges another map into this one.
    ///
    /// Types are merged field by field. A field present in `partial` has its whole
    /// validator set replaced; fields absent from `partial` are left untouched.
    pub fn merge(&mut self, partial: ConstraintMap) {
        for (type_name, fields) in partial.types {
            let target = self.types.entry(type_name).or_default();
            for (field, constraints) in fields {
                target.insert(field, constraints);
            }
        }
    }

    /// Iterates over type names in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Iterates over `(type name, field constraints)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeConstraints)> {
        self.types.iter()
    }

    /// Returns the number of configured types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is configured.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns the total number of constraints across all types and fields.
    pub fn constraint_count(&self) -> usize {
        self.types
            .values()
            .flat_map(|fields| fields.values())
            .map(FieldConstraints::len)
            .sum()
    }

    /// Removes every type.
    pub fn clear(&mut self) {
        self.types.clear();
    }
}
