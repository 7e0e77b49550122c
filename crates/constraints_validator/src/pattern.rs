//! Regular expression validator.
//!
//! The pattern is read from the `value` parameter, in one of two forms:
//! - `/pattern/flags`: a delimited expression, matched anywhere in the value.
//!   Flags `i`, `m` and `s` are honoured; `g`, `u` and `y` are accepted and ignored.
//! - a bare pattern, which must match the whole value.

use constraints_core::{ConstraintParams, FieldValue, Validator, ValidatorError};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Validates values against a regular expression.
///
/// Compiled expressions are cached by their source text, so a pattern is only
/// compiled the first time it is seen. Precompiled expressions can be seeded with
/// [`PatternValidator::insert_compiled`].
#[derive(Debug, Default)]
pub struct PatternValidator {
    /// Cache of compiled regex patterns
    regex_cache: RwLock<HashMap<String, Regex>>,
}

impl PatternValidator {
    /// Creates a new pattern validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a precompiled expression for the given source text.
    ///
    /// Constraints whose `value` equals `source` use `regex` as is.
    pub fn insert_compiled(&self, source: impl Into<String>, regex: Regex) {
        self.regex_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(source.into(), regex);
    }

    /// Gets a compiled regex from cache or compiles and caches it.
    fn get_or_compile(&self, source: &str) -> Result<Regex, ValidatorError> {
        if let Some(regex) = self
            .regex_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            return Ok(regex.clone());
        }

        let regex = compile(source)?;
        self.regex_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(source.to_string(), regex.clone());
        Ok(regex)
    }
}

/// Compiles either form of pattern.
fn compile(source: &str) -> Result<Regex, ValidatorError> {
    let invalid = |e: regex::Error| ValidatorError::invalid_pattern(source, e.to_string());

    match split_delimited(source) {
        Some((body, flags)) => {
            let mut builder = RegexBuilder::new(body);
            for flag in flags.chars() {
                match flag {
                    'i' => {
                        builder.case_insensitive(true);
                    }
                    'm' => {
                        builder.multi_line(true);
                    }
                    's' => {
                        builder.dot_matches_new_line(true);
                    }
                    _ => {}
                }
            }
            builder.build().map_err(invalid)
        }
        None => Regex::new(&format!("^(?:{})$", source)).map_err(invalid),
    }
}

/// Splits `/body/flags` into its parts, or returns `None` for a bare pattern.
fn split_delimited(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    flags
        .chars()
        .all(|c| matches!(c, 'g' | 'i' | 'm' | 's' | 'u' | 'y'))
        .then_some((body, flags))
}

impl Validator for PatternValidator {
    fn name(&self) -> &str {
        "Pattern"
    }

    fn validate(
        &self,
        value: &FieldValue,
        params: &ConstraintParams,
    ) -> Result<bool, ValidatorError> {
        let source = params.get_str("value").ok_or_else(|| {
            ValidatorError::invalid_parameter("value", "Pattern requires a string 'value' parameter")
        })?;

        let regex = self.get_or_compile(source)?;

        if value.is_empty() {
            return Ok(true);
        }

        Ok(regex.is_match(&value.to_string()))
    }
}
