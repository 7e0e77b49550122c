//! Main validation engine.
//!
//! This module provides [`FieldValidator`], the context object that owns the
//! constraint store, the validator registry, the presentation classes and the
//! revalidate signal. It is constructed once and shared by reference (or cheap
//! clone) with every consumer.

use crate::store::FieldLookup;
use crate::{
    ChangeReason, ConstraintSource, ConstraintStore, HttpSource, LoadError, RevalidateEvent,
    RevalidateSignal, Subscription, ValidationError, ValidatorRegistry,
};
use constraints_core::{
    Classes, ConstraintMap, EngineConfig, FieldConstraints, FieldValue, ValidationResult,
    Violation,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

struct Inner {
    registry: ValidatorRegistry,
    store: RwLock<ConstraintStore>,
    classes: RwLock<Classes>,
    signal: RevalidateSignal,
    warned_types: Mutex<HashSet<String>>,
}

/// Validation context.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintMapBuilder, FieldBuilder};
/// use constraints_validator::FieldValidator;
///
/// let validator = FieldValidator::new();
/// validator.add_constraints(
///     ConstraintMapBuilder::new()
///         .field(
///             "Person",
///             "lastName",
///             FieldBuilder::new().required().size(Some(2), Some(10)).build(),
///         )
///         .build(),
/// );
///
/// let result = validator.validate("Person", "lastName", "X").unwrap();
/// assert!(!result.valid);
/// assert_eq!(result.violations().len(), 1);
/// assert_eq!(result.violations()[0].validator, "Size");
/// ```
#[derive(Clone)]
pub struct FieldValidator {
    inner: Arc<Inner>,
}

impl FieldValidator {
    /// Creates a context with the built-in validators and no constraints.
    pub fn new() -> Self {
        Self::with_registry(ValidatorRegistry::builtin())
    }

    /// Creates a context using the given registry.
    pub fn with_registry(registry: ValidatorRegistry) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                store: RwLock::new(ConstraintStore::new()),
                classes: RwLock::new(Classes::default()),
                signal: RevalidateSignal::new(),
                warned_types: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Creates a context from an engine configuration.
    ///
    /// Aliases and the decimal separator shape the registry; the classes are taken
    /// over as is. The `rules_url` is not fetched here, see [`Self::load_from_url`].
    pub fn from_config(config: &EngineConfig) -> Self {
        let validator =
            Self::with_registry(crate::RegistryBuilder::from_config(config).build());
        *validator.write_classes() = config.classes.clone();
        validator
    }

    /// Returns the validator registry.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.inner.registry
    }

    /// Returns the revalidate signal.
    pub fn signal(&self) -> &RevalidateSignal {
        &self.inner.signal
    }

    /// Subscribes to constraint and class changes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RevalidateEvent) + Send + Sync + 'static,
    {
        self.inner.signal.subscribe(listener)
    }

    /// Merges constraints into the store and broadcasts the change.
    ///
    /// Each field present in `partial` has its validator set replaced; other
    /// fields are kept.
    pub fn add_constraints(&self, partial: ConstraintMap) {
        debug!(
            "Adding {} constraints for {} types",
            partial.constraint_count(),
            partial.len()
        );
        self.write_store().add_constraints(partial);
        self.broadcast(ChangeReason::ConstraintsChanged);
    }

    /// Returns a snapshot of the current constraints.
    pub fn constraints(&self) -> ConstraintMap {
        self.read_store().constraints().clone()
    }

    /// Runs `f` with read access to the live constraints.
    pub fn with_constraints<R>(&self, f: impl FnOnce(&ConstraintMap) -> R) -> R {
        f(self.read_store().constraints())
    }

    /// Removes all constraints and broadcasts the change.
    pub fn clear_constraints(&self) {
        self.write_store().clear();
        self.warned_types().clear();
        self.broadcast(ChangeReason::ConstraintsChanged);
    }

    /// Returns true while a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.read_store().is_loading()
    }

    /// Fetches constraints from `source` and merges them.
    ///
    /// While the fetch is outstanding, reads see the previous constraints and
    /// warnings about unknown types are suppressed. On success the result is merged
    /// and a change is broadcast. On failure the store is left untouched, nothing is
    /// broadcast, and the error is logged and returned.
    pub async fn load_from_source<S>(&self, source: &S) -> Result<(), LoadError>
    where
        S: ConstraintSource,
    {
        let origin = source.describe();
        info!("Loading constraints from {}", origin);

        let result = {
            let _loading = LoadingGuard::begin(self);
            source.fetch().await
        };

        match result {
            Ok(constraints) => {
                info!(
                    "Loaded {} constraints for {} types from {}",
                    constraints.constraint_count(),
                    constraints.len(),
                    origin
                );
                self.add_constraints(constraints);
                Ok(())
            }
            Err(err) => {
                warn!("Keeping previous constraints: {}", err);
                Err(err)
            }
        }
    }

    /// Fetches constraints from `url` with a single HTTP GET.
    pub async fn load_from_url(&self, url: &str) -> Result<(), LoadError> {
        self.load_from_source(&HttpSource::new(url)).await
    }

    /// Returns a copy of the presentation classes.
    pub fn classes(&self) -> Classes {
        self.inner
            .classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the presentation classes and broadcasts the change.
    pub fn set_classes(&self, classes: Classes) {
        *self.write_classes() = classes;
        self.broadcast(ChangeReason::ClassesChanged);
    }

    /// Validates one value against the constraints of `type_name.field`.
    ///
    /// # Returns
    ///
    /// A [`ValidationResult`] that is valid when the type or field has no
    /// constraints or every constraint passed. All constraints run, so every
    /// violation is reported. An error is returned only when a validator cannot
    /// evaluate its parameters.
    pub fn validate(
        &self,
        type_name: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<ValidationResult, ValidationError> {
        let Some(constraints) = self.field_constraints(type_name, field) else {
            return Ok(ValidationResult::valid());
        };
        let value = value.into();

        let mut violations = Vec::new();
        for constraint in &constraints {
            let Some(validator) = self.inner.registry.get(&constraint.validator) else {
                warn!(
                    "No validator defined for '{}'. Can not validate field '{}'",
                    constraint.validator, field
                );
                continue;
            };

            let passed = validator
                .validate(&value, &constraint.params)
                .map_err(|source| {
                    ValidationError::validator(type_name, field, &constraint.validator, source)
                })?;

            if !passed {
                violations.push(Violation {
                    value: value.clone(),
                    field: field.to_string(),
                    type_name: type_name.to_string(),
                    validator: constraint.validator.clone(),
                    params: constraint.params.clone(),
                });
            }
        }

        debug!(
            "{}.{}: {} constraints, {} violations",
            type_name,
            field,
            constraints.len(),
            violations.len()
        );

        Ok(ValidationResult::from_violations(violations))
    }

    /// Validates every constrained field of `type_name` against a record.
    ///
    /// Fields missing from the record are validated as undefined; record entries
    /// without constraints are ignored.
    pub fn validate_record(
        &self,
        type_name: &str,
        record: &Map<String, Value>,
    ) -> Result<RecordReport, ValidationError> {
        let field_names: Vec<String> = self.with_constraints(|map| {
            map.type_constraints(type_name)
                .map(|fields| fields.keys().cloned().collect())
                .unwrap_or_default()
        });

        if field_names.is_empty() {
            // Lets the unknown-type warning fire through the regular path
            self.field_constraints(type_name, "");
        }

        let mut fields = BTreeMap::new();
        for field in field_names {
            let value = record
                .get(&field)
                .map(FieldValue::from)
                .unwrap_or(FieldValue::Undefined);
            let result = self.validate(type_name, &field, value)?;
            fields.insert(field, result);
        }

        Ok(RecordReport {
            type_name: type_name.to_string(),
            valid: fields.values().all(|r| r.valid),
            fields,
        })
    }

    /// Clones the constraints of a field, or returns `None` when there are none.
    fn field_constraints(&self, type_name: &str, field: &str) -> Option<FieldConstraints> {
        let store = self.read_store();
        match store.lookup(type_name, field) {
            FieldLookup::Constraints(constraints) => Some(constraints.clone()),
            FieldLookup::NoConstraints => None,
            FieldLookup::UnknownType => {
                let loading = store.is_loading();
                drop(store);
                self.warn_unknown_type(type_name, loading);
                None
            }
        }
    }

    /// Warns once per type, unless constraints are still being loaded.
    fn warn_unknown_type(&self, type_name: &str, loading: bool) {
        if loading {
            debug!(
                "No constraints for type '{}' yet, load in progress",
                type_name
            );
            return;
        }
        if self.warned_types().insert(type_name.to_string()) {
            warn!("No validation rules for type '{}' available", type_name);
        }
    }

    fn broadcast(&self, reason: ChangeReason) {
        self.inner.signal.broadcast(RevalidateEvent::new(reason));
    }

    fn read_store(&self) -> RwLockReadGuard<'_, ConstraintStore> {
        self.inner
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, ConstraintStore> {
        self.inner
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_classes(&self) -> RwLockWriteGuard<'_, Classes> {
        self.inner
            .classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn warned_types(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.inner
            .warned_types
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldValidator")
            .field("registry", &self.inner.registry)
            .field("store", &*self.read_store())
            .field("signal", &self.inner.signal)
            .finish()
    }
}

/// Marks a load as in flight for as long as it lives.
///
/// Dropping the guard, including when the load future is cancelled, ends the load.
struct LoadingGuard<'a> {
    validator: &'a FieldValidator,
}

impl<'a> LoadingGuard<'a> {
    fn begin(validator: &'a FieldValidator) -> Self {
        validator.write_store().begin_load();
        Self { validator }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.validator.write_store().end_load();
    }
}

/// Result of validating a whole record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReport {
    /// Type the record was validated as
    #[serde(rename = "type")]
    pub type_name: String,

    /// Whether every field passed
    pub valid: bool,

    /// Per-field results, keyed by field name
    pub fields: BTreeMap<String, ValidationResult>,
}

impl RecordReport {
    /// Iterates over all violations of all fields.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.fields.values().flat_map(|r| r.violations())
    }

    /// Returns the total number of violations.
    pub fn violation_count(&self) -> usize {
        self.violations().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::{ConstraintMapBuilder, FieldBuilder};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn person_validator() -> FieldValidator {
        let validator = FieldValidator::new();
        validator.add_constraints(
            ConstraintMapBuilder::new()
                .field(
                    "Person",
                    "name",
                    FieldBuilder::new()
                        .required()
                        .message("message.required")
                        .size(Some(2), Some(4))
                        .message("message.size")
                        .build(),
                )
                .field("Person", "age", FieldBuilder::new().min(18.0).max(99.0).build())
                .field("Person", "nickname", FieldConstraints::new())
                .build(),
        );
        validator
    }

    #[test]
    fn test_unknown_type_is_valid() {
        let validator = FieldValidator::new();
        let result = validator.validate("Ghost", "name", "anything").unwrap();
        assert_eq!(result, ValidationResult::valid());
    }

    #[test]
    fn test_unknown_field_is_valid() {
        let validator = person_validator();
        let result = validator.validate("Person", "email", "").unwrap();
        assert!(result.valid);
        assert!(result.violations.is_none());
    }

    #[test]
    fn test_field_without_constraints_is_valid() {
        let validator = person_validator();
        let result = validator.validate("Person", "nickname", "").unwrap();
        assert_eq!(result, ValidationResult::valid());
    }

    #[test]
    fn test_all_constraints_run() {
        let validator = person_validator();
        let result = validator.validate("Person", "name", "").unwrap();

        assert!(!result.valid);
        let names: Vec<&str> = result
            .violations()
            .iter()
            .map(|v| v.validator.as_str())
            .collect();
        assert_eq!(names, vec!["Required", "Size"]);
        assert_eq!(result.violations()[0].message(), Some("message.required"));
        assert_eq!(result.violations()[1].message(), Some("message.size"));
    }

    #[test]
    fn test_violation_carries_context() {
        let validator = person_validator();
        let result = validator.validate("Person", "name", "abcde").unwrap();

        let violation = result.first_violation().unwrap();
        assert_eq!(violation.value, FieldValue::from("abcde"));
        assert_eq!(violation.field, "name");
        assert_eq!(violation.type_name, "Person");
        assert_eq!(violation.validator, "Size");
        assert_eq!(violation.params.get_f64("min"), Some(2.0));
        assert_eq!(violation.params.get_f64("max"), Some(4.0));
    }

    #[test]
    fn test_unknown_validator_is_skipped() {
        let validator = FieldValidator::new();
        validator.add_constraints(
            serde_json::from_value(json!({
                "Person": { "name": { "Bogus": {}, "Required": {} } }
            }))
            .unwrap(),
        );

        let result = validator.validate("Person", "name", "").unwrap();
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].validator, "Required");

        let result = validator.validate("Person", "name", "x").unwrap();
        assert!(result.valid);
    }

    #[test]
    fn test_validator_error_propagates() {
        let validator = FieldValidator::new();
        validator.add_constraints(
            serde_json::from_value(json!({
                "Person": { "zip": { "Pattern": { "value": "/[0-9/" } } }
            }))
            .unwrap(),
        );

        let err = validator.validate("Person", "zip", "123").unwrap_err();
        assert!(matches!(err, ValidationError::Validator { .. }));
    }

    #[test]
    fn test_add_constraints_broadcasts_once() {
        let validator = FieldValidator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _subscription = validator.subscribe(move |event| {
            assert_eq!(event.reason, ChangeReason::ConstraintsChanged);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        validator.add_constraints(ConstraintMap::new());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_can_revalidate() {
        let validator = FieldValidator::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let inner = validator.clone();
        let _subscription = validator.subscribe(move |_| {
            let result = inner.validate("Person", "name", "").unwrap();
            sink.lock().unwrap().push(result.valid);
        });

        validator.add_constraints(
            ConstraintMapBuilder::new()
                .field("Person", "name", FieldBuilder::new().required().build())
                .build(),
        );

        assert_eq!(*seen.lock().unwrap(), vec![false]);
    }

    #[test]
    fn test_set_classes_broadcasts() {
        let validator = FieldValidator::new();
        let reasons = Arc::new(Mutex::new(Vec::new()));
        let sink = reasons.clone();
        let _subscription = validator.subscribe(move |event| {
            sink.lock().unwrap().push(event.reason);
        });

        let classes = Classes {
            invalid: "is-invalid".to_string(),
            ..Classes::default()
        };
        validator.set_classes(classes.clone());

        assert_eq!(validator.classes(), classes);
        assert_eq!(*reasons.lock().unwrap(), vec![ChangeReason::ClassesChanged]);
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig::builder()
            .alias("Required", "NotEmpty")
            .classes(Classes {
                valid: "ok".to_string(),
                ..Classes::default()
            })
            .build();
        let validator = FieldValidator::from_config(&config);
        validator.add_constraints(
            serde_json::from_value(json!({ "Form": { "f": { "NotEmpty": {} } } })).unwrap(),
        );

        assert!(!validator.validate("Form", "f", "").unwrap().valid);
        assert_eq!(validator.classes().valid, "ok");
    }

    #[test]
    fn test_validate_record() {
        let validator = person_validator();
        let record = json!({ "name": "Al", "age": 12, "extra": "ignored" });

        let report = validator
            .validate_record("Person", record.as_object().unwrap())
            .unwrap();

        assert!(!report.valid);
        assert_eq!(report.fields.len(), 3);
        assert!(report.fields["name"].valid);
        assert!(!report.fields["age"].valid);
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.violations().next().unwrap().validator, "Min");
    }

    #[test]
    fn test_validate_record_missing_field_is_undefined() {
        let validator = person_validator();
        let report = validator
            .validate_record("Person", &Map::new())
            .unwrap();

        assert!(!report.fields["name"].valid);
        assert!(report.fields["age"].valid);
    }

    #[test]
    fn test_clear_constraints() {
        let validator = person_validator();
        validator.clear_constraints();
        assert!(validator.constraints().is_empty());
        assert!(validator.validate("Person", "name", "").unwrap().valid);
    }

    #[test]
    fn test_violations_follow_declared_order() {
        let validator = FieldValidator::new();
        validator.add_constraints(
            serde_json::from_value(json!({
                "Person": {
                    "code": {
                        "Size": { "min": 5 },
                        "Pattern": { "value": "[0-9]+" },
                        "Email": {}
                    }
                }
            }))
            .unwrap(),
        );

        let result = validator.validate("Person", "code", "ab").unwrap();
        let names: Vec<&str> = result
            .violations()
            .iter()
            .map(|v| v.validator.as_str())
            .collect();
        assert_eq!(names, vec!["Size", "Pattern", "Email"]);
    }
}
