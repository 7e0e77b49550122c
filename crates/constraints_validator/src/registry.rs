//! Validator registry.
//!
//! The registry maps validator names, as used in constraint maps, to validator
//! implementations. It is assembled once by a [`RegistryBuilder`] from the built-in
//! validators, any caller-provided validators and name aliases, and is immutable
//! afterwards.

use crate::{
    DigitsValidator, EmailValidator, PatternValidator, RequiredValidator, SizeValidator,
    TemporalValidator, ThresholdValidator, UrlValidator,
};
use constraints_core::{ConstraintParams, EngineConfig, FieldValue, FnValidator, Validator, ValidatorError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Names of the built-in validators, in registration order.
pub const BUILTIN_VALIDATORS: [&str; 10] = [
    "Required", "Size", "Min", "Max", "Email", "Url", "Digits", "Pattern", "Past", "Future",
];

/// Assembles a [`ValidatorRegistry`].
///
/// # Example
///
/// ```rust
/// use constraints_validator::RegistryBuilder;
///
/// let registry = RegistryBuilder::new()
///     .add_validator_fn("Even", |value, _params| {
///         Ok(value.is_empty() || value.to_number() % 2.0 == 0.0)
///     })
///     .add_alias("Size", "Length")
///     .build();
///
/// assert!(registry.contains("Even"));
/// assert!(registry.contains("Length"));
/// assert!(!registry.contains("Size"));
/// ```
pub struct RegistryBuilder {
    include_builtins: bool,
    decimal_separator: char,
    validators: Vec<Arc<dyn Validator>>,
    aliases: HashMap<String, String>,
}

impl RegistryBuilder {
    /// Creates a builder that starts from the built-in validators.
    pub fn new() -> Self {
        Self {
            include_builtins: true,
            decimal_separator: '.',
            validators: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Creates a builder without any built-in validators.
    pub fn empty() -> Self {
        Self {
            include_builtins: false,
            ..Self::new()
        }
    }

    /// Creates a builder configured from an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut builder = Self::new().decimal_separator(config.decimal_separator);
        for (internal, external) in &config.aliases {
            builder = builder.add_alias(internal.clone(), external.clone());
        }
        builder
    }

    /// Sets the decimal separator used by the built-in `Digits` validator.
    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Appends a validator.
    ///
    /// A validator registered under a name that is already taken replaces the
    /// earlier one, which is how built-ins are overridden.
    pub fn add_validator(self, validator: impl Validator + 'static) -> Self {
        self.add_shared_validator(Arc::new(validator))
    }

    /// Appends an already shared validator.
    pub fn add_shared_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Appends a validator backed by a closure.
    pub fn add_validator_fn<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldValue, &ConstraintParams) -> Result<bool, ValidatorError>
            + Send
            + Sync
            + 'static,
    {
        self.add_validator(FnValidator::new(name, predicate))
    }

    /// Registers the validator named `internal` under `external` instead.
    ///
    /// Adding a second alias for the same internal name replaces the first.
    pub fn add_alias(mut self, internal: impl Into<String>, external: impl Into<String>) -> Self {
        self.aliases.insert(internal.into(), external.into());
        self
    }

    fn builtins(&self) -> Vec<Arc<dyn Validator>> {
        vec![
            Arc::new(RequiredValidator),
            Arc::new(SizeValidator),
            Arc::new(ThresholdValidator::min()),
            Arc::new(ThresholdValidator::max()),
            Arc::new(EmailValidator),
            Arc::new(UrlValidator),
            Arc::new(DigitsValidator::new(self.decimal_separator)),
            Arc::new(PatternValidator::new()),
            Arc::new(TemporalValidator::past()),
            Arc::new(TemporalValidator::future()),
        ]
    }

    /// Builds the registry.
    pub fn build(self) -> ValidatorRegistry {
        let mut ordered = if self.include_builtins {
            self.builtins()
        } else {
            Vec::new()
        };
        ordered.extend(self.validators);

        let mut validators = HashMap::with_capacity(ordered.len());
        for validator in ordered {
            let declared = validator.name().to_string();
            let key = self
                .aliases
                .get(&declared)
                .cloned()
                .unwrap_or_else(|| declared.clone());

            if key != declared {
                debug!("Registering validator '{}' as '{}'", declared, key);
            }
            if validators.insert(key.clone(), validator).is_some() {
                debug!("Validator '{}' replaced by a later registration", key);
            }
        }

        ValidatorRegistry {
            validators: Arc::new(validators),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable mapping from validator name to implementation.
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: Arc<HashMap<String, Arc<dyn Validator>>>,
}

impl ValidatorRegistry {
    /// Creates a registry holding only the built-in validators.
    pub fn builtin() -> Self {
        RegistryBuilder::new().build()
    }

    /// Creates a new builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up a validator by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Validator>> {
        self.validators.get(name)
    }

    /// Returns true if a validator is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}
