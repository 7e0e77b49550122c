//! Date validators: `Past` and `Future`.
//!
//! Values are parsed as RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` or
//! `YYYY-MM-DD HH:MM:SS` (taken as UTC), plain `YYYY-MM-DD` dates (midnight UTC),
//! or numbers of milliseconds since the Unix epoch. Anything else is invalid.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use constraints_core::{ConstraintParams, FieldValue, Validator, ValidatorError};

/// Which side of "now" a value must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Past,
    Future,
}

/// Checks that a date lies strictly before or after the current instant.
#[derive(Debug, Clone, Copy)]
pub struct TemporalValidator {
    direction: Direction,
    clock: fn() -> DateTime<Utc>,
}

impl TemporalValidator {
    /// Creates the `Past` validator.
    pub fn past() -> Self {
        Self {
            direction: Direction::Past,
            clock: Utc::now,
        }
    }

    /// Creates the `Future` validator.
    pub fn future() -> Self {
        Self {
            direction: Direction::Future,
            clock: Utc::now,
        }
    }

    /// Replaces the source of the current instant.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

/// Parses a field value into a UTC instant.
pub fn parse_instant(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Number(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
        FieldValue::String(s) => parse_instant_str(s.trim()),
        _ => None,
    }
}

fn parse_instant_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl Validator for TemporalValidator {
    fn name(&self) -> &str {
        match self.direction {
            Direction::Past => "Past",
            Direction::Future => "Future",
        }
    }

    fn validate(
        &self,
        value: &FieldValue,
        _params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        if value.is_empty() {
            return Ok(true);
        }

        let Some(instant) = parse_instant(value) else {
            return Ok(false);
        };

        let now = (self.clock)();
        Ok(match self.direction {
            Direction::Past => instant < now,
            Direction::Future => instant > now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn check(validator: TemporalValidator, value: impl Into<FieldValue>) -> bool {
        validator
            .with_clock(fixed_now)
            .validate(&value.into(), &ConstraintParams::new())
            .unwrap()
    }

    #[test]
    fn test_past() {
        assert!(check(TemporalValidator::past(), "2024-05-31"));
        assert!(check(TemporalValidator::past(), "2024-06-01T11:59:59Z"));
        assert!(!check(TemporalValidator::past(), "2024-06-01T12:00:00Z"));
        assert!(!check(TemporalValidator::past(), "2030-01-01"));
    }

    #[test]
    fn test_future() {
        assert!(check(TemporalValidator::future(), "2024-06-01T14:00:00+01:00"));
        assert!(check(TemporalValidator::future(), "2024-06-02 00:00:00"));
        assert!(!check(TemporalValidator::future(), "1999-12-31"));
    }

    #[test]
    fn test_epoch_millis() {
        let now_ms = fixed_now().timestamp_millis() as f64;
        assert!(check(TemporalValidator::past(), now_ms - 1000.0));
        assert!(check(TemporalValidator::future(), now_ms + 1000.0));
    }

    #[test]
    fn test_empty_and_unparsable() {
        assert!(check(TemporalValidator::past(), ""));
        assert!(check(TemporalValidator::future(), FieldValue::Null));
        assert!(!check(TemporalValidator::past(), "yesterday"));
        assert!(!check(TemporalValidator::future(), true));
    }

    #[test]
    fn test_uses_real_clock_by_default() {
        let result = TemporalValidator::past()
            .validate(&FieldValue::from("2000-01-01"), &ConstraintParams::new())
            .unwrap();
        assert!(result);
    }
}
