//! Engine configuration.
//!
//! Configuration can be written by hand or loaded from a JSON, YAML or TOML file
//! (see `constraints_parser::parse_config_file`).

use crate::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CSS-class-like tokens a UI layer applies to validated fields.
///
/// The engine only stores them and announces changes; applying them is up to
/// the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classes {
    /// Applied to fields that passed validation
    pub valid: String,

    /// Applied to fields that failed validation
    pub invalid: String,

    /// Applied once a field was changed and has lost focus
    #[serde(alias = "dirtyBlurred")]
    pub dirty_blurred: String,

    /// Marks the element wrapping a form field and its messages
    #[serde(alias = "formGroup")]
    pub form_group: String,
}

impl Classes {
    /// Returns the class to apply for a validation result.
    pub fn for_result(&self, result: &ValidationResult) -> &str {
        if result.valid {
            &self.valid
        } else {
            &self.invalid
        }
    }
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            valid: "has-success".to_string(),
            invalid: "has-error".to_string(),
            dirty_blurred: "dirty-blurred".to_string(),
            form_group: "form-group".to_string(),
        }
    }
}

/// Configuration of a validation engine instance.
///
/// # Example
///
/// ```rust
/// use constraints_core::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .rules_url("https://example.com/constraints.json")
///     .decimal_separator(',')
///     .alias("Size", "Length")
///     .build();
///
/// assert_eq!(config.decimal_separator, ',');
/// assert_eq!(config.aliases.get("Size").map(String::as_str), Some("Length"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// URL to load constraints from once at startup
    pub rules_url: Option<String>,

    /// Presentation classes handed to the UI layer
    pub classes: Classes,

    /// Decimal separator used by the `Digits` validator
    pub decimal_separator: char,

    /// Validator name aliases (built-in name → name used in constraint maps)
    pub aliases: BTreeMap<String, String>,
}

impl EngineConfig {
    /// Creates a new builder for `EngineConfig`.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_url: None,
            classes: Classes::default(),
            decimal_separator: '.',
            aliases: BTreeMap::new(),
        }
    }
}

/// Builder for `EngineConfig`.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets the URL constraints are loaded from.
    pub fn rules_url(mut self, url: impl Into<String>) -> Self {
        self.config.rules_url = Some(url.into());
        self
    }

    /// Sets the presentation classes.
    pub fn classes(mut self, classes: Classes) -> Self {
        self.config.classes = classes;
        self
    }

    /// Sets the decimal separator used by `Digits`.
    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.config.decimal_separator = separator;
        self
    }

    /// Registers a validator alias.
    pub fn alias(mut self, internal: impl Into<String>, external: impl Into<String>) -> Self {
        self.config.aliases.insert(internal.into(), external.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
