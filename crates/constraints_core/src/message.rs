//! Violation message interpolation.
//!
//! Message templates use `{{ name }}` placeholders. Names resolve against the
//! violation itself (`field`, `type`, `validator`, `value`) and then against the
//! constraint parameters (`min`, `max`, `value` of a Min constraint, ...).
//! Unknown names render as an empty string.

use crate::Violation;
use crate::value::format_number;
use serde_json::Value;

/// Fills the placeholders of `template` from a violation.
///
/// # Example
///
/// ```rust
/// use constraints_core::{interpolate, ConstraintParams, FieldValue, Violation};
///
/// let violation = Violation {
///     value: FieldValue::from("x"),
///     field: "name".to_string(),
///     type_name: "Person".to_string(),
///     validator: "Size".to_string(),
///     params: ConstraintParams::new().with("min", 2),
/// };
///
/// assert_eq!(
///     interpolate("{{ field }} needs at least {{ min }} characters", &violation),
///     "name needs at least 2 characters"
/// );
/// ```
pub fn interpolate(template: &str, violation: &Violation) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let name = after_open[..end].trim();
                output.push_str(&resolve(name, violation));
                rest = &after_open[end + 2..];
            }
            None => {
                // Unterminated placeholder, keep the text verbatim
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

fn resolve(name: &str, violation: &Violation) -> String {
    match name {
        "field" => violation.field.clone(),
        "type" => violation.type_name.clone(),
        "validator" => violation.validator.clone(),
        "fieldNameKey" => violation.field_name_key(),
        // A constraint parameter called `value` (Min/Max threshold) shadows the field value
        "value" if !violation.params.contains("value") => violation.value.to_string(),
        _ => violation
            .params
            .get(name)
            .map(param_text)
            .unwrap_or_default(),
    }
}

fn param_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstraintParams, FieldValue};

    fn violation(params: ConstraintParams) -> Violation {
        Violation {
            value: FieldValue::from(9),
            field: "age".to_string(),
            type_name: "Person".to_string(),
            validator: "Min".to_string(),
            params,
        }
    }

    #[test]
    fn test_interpolates_params_and_context() {
        let v = violation(ConstraintParams::new().with("value", 10));
        assert_eq!(
            interpolate("{{type}}.{{field}} must be >= {{value}}", &v),
            "Person.age must be >= 10"
        );
    }

    #[test]
    fn test_value_falls_back_to_field_value() {
        let v = violation(ConstraintParams::new());
        assert_eq!(interpolate("got {{ value }}", &v), "got 9");
    }

    #[test]
    fn test_unknown_and_unterminated() {
        let v = violation(ConstraintParams::new());
        assert_eq!(interpolate("a{{nope}}b", &v), "ab");
        assert_eq!(interpolate("a {{field", &v), "a {{field");
        assert_eq!(interpolate("plain", &v), "plain");
    }
}
