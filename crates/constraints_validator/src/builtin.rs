//! Built-in validators.
//!
//! This module holds the simple predicate validators:
//! - Required: value must be present
//! - Size: length must be within min/max bounds
//! - Min / Max: numeric value must not cross a threshold
//! - Email / Url: value must be a well-formed address
//! - Digits: integer and fraction digit counts are limited
//!
//! Pattern and date validators live in their own modules.

use constraints_core::{ConstraintParams, FieldValue, Validator, ValidatorError};
use validator::{ValidateEmail, ValidateUrl};

/// Fails for undefined, null, the empty string and NaN.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    fn name(&self) -> &str {
        "Required"
    }

    fn validate(
        &self,
        value: &FieldValue,
        _params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        Ok(!value.is_empty())
    }
}

/// Checks the length of a value against optional `min` (default 0) and `max` bounds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeValidator;

impl Validator for SizeValidator {
    fn name(&self) -> &str {
        "Size"
    }

    fn validate(
        &self,
        value: &FieldValue,
        params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        let min = params.number("min")?.unwrap_or(0.0);
        let max = params.number("max")?;

        let Some(len) = value.sequence_len() else {
            return Ok(false);
        };
        let len = len as f64;

        Ok(len >= min && max.is_none_or(|max| len <= max))
    }
}

/// Direction of a numeric threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

/// Shared implementation of `Min` and `Max`.
///
/// The threshold is read from the `value` parameter. NaN is rejected before the
/// emptiness check, so a literal NaN fails even though it counts as empty for
/// every other validator.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdValidator {
    bound: Bound,
}

impl ThresholdValidator {
    /// Creates the `Min` validator.
    pub fn min() -> Self {
        Self {
            bound: Bound::Lower,
        }
    }

    /// Creates the `Max` validator.
    pub fn max() -> Self {
        Self {
            bound: Bound::Upper,
        }
    }
}

impl Validator for ThresholdValidator {
    fn name(&self) -> &str {
        match self.bound {
            Bound::Lower => "Min",
            Bound::Upper => "Max",
        }
    }

    fn validate(
        &self,
        value: &FieldValue,
        params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        let threshold = params.number("value")?.ok_or_else(|| {
            ValidatorError::invalid_parameter(
                "value",
                format!("{} requires a numeric 'value' parameter", self.name()),
            )
        })?;

        if value.is_nan() {
            return Ok(false);
        }
        if value.is_empty() {
            return Ok(true);
        }

        let number = value.to_number();
        if number.is_nan() {
            return Ok(false);
        }

        Ok(match self.bound {
            Bound::Lower => number >= threshold,
            Bound::Upper => number <= threshold,
        })
    }
}

/// Accepts empty values and syntactically valid email addresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn name(&self) -> &str {
        "Email"
    }

    fn validate(
        &self,
        value: &FieldValue,
        _params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        if value.is_empty() {
            return Ok(true);
        }
        Ok(value.to_string().as_str().validate_email())
    }
}

/// Accepts empty values and absolute URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlValidator;

impl Validator for UrlValidator {
    fn name(&self) -> &str {
        "Url"
    }

    fn validate(
        &self,
        value: &FieldValue,
        _params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        if value.is_empty() {
            return Ok(true);
        }
        Ok(value.to_string().as_str().validate_url())
    }
}

/// Limits the number of integer and fraction digits of a numeric value.
///
/// Parameters `integer` and `fraction` give the maximum digit counts; a missing
/// parameter leaves that part unbounded. Trailing zeros of the fraction are not
/// counted. Values that are not numbers fail.
#[derive(Debug, Clone, Copy)]
pub struct DigitsValidator {
    decimal_separator: char,
}

impl DigitsValidator {
    /// Creates a validator using `decimal_separator` to split integer and fraction.
    pub fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    /// Brings the value into `<sign><digits>[.<digits>]` form, or `None` if it is not numeric.
    fn normalize(&self, value: &FieldValue) -> Option<String> {
        let text = match value {
            FieldValue::Number(n) if n.is_finite() => value.to_string(),
            FieldValue::String(s) => s.trim().replace(self.decimal_separator, "."),
            _ => return None,
        };

        let unsigned = text.strip_prefix(['-', '+']).unwrap_or(&text);
        let mut parts = unsigned.splitn(2, '.');
        let integer = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
        {
            return None;
        }

        Some(unsigned.to_string())
    }
}

impl Default for DigitsValidator {
    fn default() -> Self {
        Self::new('.')
    }
}

impl Validator for DigitsValidator {
    fn name(&self) -> &str {
        "Digits"
    }

    fn validate(
        &self,
        value: &FieldValue,
        params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        let max_integer = params.number("integer")?;
        let max_fraction = params.number("fraction")?;

        if value.is_empty() {
            return Ok(true);
        }

        let Some(normalized) = self.normalize(value) else {
            return Ok(false);
        };

        let (integer, fraction) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));
        let fraction = fraction.trim_end_matches('0');

        let integer_ok = max_integer.is_none_or(|max| integer.len() as f64 <= max);
        let fraction_ok = max_fraction.is_none_or(|max| fraction.len() as f64 <= max);

        Ok(integer_ok && fraction_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ConstraintParams {
        serde_json::from_value(value).unwrap()
    }

    fn check(validator: &dyn Validator, value: impl Into<FieldValue>, p: &ConstraintParams) -> bool {
        validator.validate(&value.into(), p).unwrap()
    }

    #[test]
    fn test_required() {
        let p = ConstraintParams::new();
        assert!(!check(&RequiredValidator, "", &p));
        assert!(!check(&RequiredValidator, FieldValue::Null, &p));
        assert!(!check(&RequiredValidator, FieldValue::Undefined, &p));
        assert!(!check(&RequiredValidator, f64::NAN, &p));

        assert!(check(&RequiredValidator, 0, &p));
        assert!(check(&RequiredValidator, false, &p));
        assert!(check(&RequiredValidator, "x", &p));
    }

    #[test]
    fn test_size_bounds() {
        let p = params(json!({ "min": 2, "max": 4 }));
        assert!(!check(&SizeValidator, "a", &p));
        assert!(check(&SizeValidator, "ab", &p));
        assert!(check(&SizeValidator, "abcd", &p));
        assert!(!check(&SizeValidator, "abcde", &p));
    }

    #[test]
    fn test_size_defaults() {
        let p = ConstraintParams::new();
        assert!(check(&SizeValidator, "", &p));
        assert!(check(&SizeValidator, FieldValue::Undefined, &p));
        assert!(check(&SizeValidator, "a very long value indeed", &p));

        let p = params(json!({ "min": 1 }));
        assert!(!check(&SizeValidator, FieldValue::Null, &p));
    }

    #[test]
    fn test_size_lists_and_objects() {
        let p = params(json!({ "max": 1 }));
        assert!(check(&SizeValidator, FieldValue::from(json!(["a"])), &p));
        assert!(!check(&SizeValidator, FieldValue::from(json!(["a", "b"])), &p));
        assert!(!check(&SizeValidator, FieldValue::from(json!({ "a": 1 })), &p));
    }

    #[test]
    fn test_size_rejects_non_numeric_bound() {
        let p = params(json!({ "min": "two" }));
        let result = SizeValidator.validate(&FieldValue::from("abc"), &p);
        assert!(matches!(result, Err(ValidatorError::InvalidParameter { .. })));
    }

    #[test]
    fn test_min() {
        let min = ThresholdValidator::min();
        let p = params(json!({ "value": 10 }));
        assert!(check(&min, "", &p));
        assert!(check(&min, FieldValue::Undefined, &p));
        assert!(check(&min, "10", &p));
        assert!(check(&min, 11, &p));
        assert!(!check(&min, "9", &p));
        assert!(!check(&min, f64::NAN, &p));
        assert!(!check(&min, "abc", &p));
    }

    #[test]
    fn test_max() {
        let max = ThresholdValidator::max();
        let p = params(json!({ "value": "10" }));
        assert!(check(&max, "10", &p));
        assert!(check(&max, -3.5, &p));
        assert!(!check(&max, 10.01, &p));
        assert!(!check(&max, f64::NAN, &p));
        assert!(check(&max, FieldValue::Null, &p));
    }

    #[test]
    fn test_threshold_requires_value_param() {
        let result = ThresholdValidator::min().validate(&FieldValue::from(1), &ConstraintParams::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_email() {
        let p = ConstraintParams::new();
        assert!(check(&EmailValidator, "", &p));
        assert!(check(&EmailValidator, "a@b.com", &p));
        assert!(check(&EmailValidator, "First.Last@Example.ORG", &p));
        assert!(!check(&EmailValidator, "not-an-email", &p));
        assert!(!check(&EmailValidator, "a@", &p));
    }

    #[test]
    fn test_url() {
        let p = ConstraintParams::new();
        assert!(check(&UrlValidator, FieldValue::Undefined, &p));
        assert!(check(&UrlValidator, "https://example.com/path?q=1", &p));
        assert!(!check(&UrlValidator, "example", &p));
    }

    #[test]
    fn test_digits() {
        let digits = DigitsValidator::default();
        let p = params(json!({ "integer": 3, "fraction": 2 }));
        assert!(check(&digits, "123.45", &p));
        assert!(!check(&digits, "1234.45", &p));
        assert!(!check(&digits, "123.456", &p));
        assert!(check(&digits, "-123.4", &p));
        assert!(check(&digits, "123.4500", &p));
        assert!(check(&digits, 99.5, &p));
        assert!(check(&digits, "", &p));
        assert!(!check(&digits, "12a", &p));
        assert!(!check(&digits, "1.2.3", &p));
        assert!(!check(&digits, true, &p));
    }

    #[test]
    fn test_digits_locale_separator() {
        let digits = DigitsValidator::new(',');
        let p = params(json!({ "integer": 3, "fraction": 2 }));
        assert!(check(&digits, "123,45", &p));
        assert!(!check(&digits, "123,456", &p));
        assert!(check(&digits, 12.5, &p));
    }
}
