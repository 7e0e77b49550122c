//! Constraint store.
//!
//! Holds the live constraint map together with the number of loads in flight.
//! The store itself is plain data; [`crate::FieldValidator`] wraps it in a lock and
//! takes care of broadcasting changes.

use constraints_core::{ConstraintMap, FieldConstraints};

/// Outcome of looking up a field in the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldLookup<'a> {
    /// The type has never been configured
    UnknownType,
    /// The type is known but has no rules for the field
    NoConstraints,
    /// The field's constraints
    Constraints(&'a FieldConstraints),
}

/// Live constraints plus loading state.
#[derive(Debug, Default, Clone)]
pub struct ConstraintStore {
    constraints: ConstraintMap,
    pending_loads: usize,
}

impl ConstraintStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with constraints.
    pub fn with_constraints(constraints: ConstraintMap) -> Self {
        Self {
            constraints,
            pending_loads: 0,
        }
    }

    /// Merges `partial` into the stored constraints.
    ///
    /// See [`ConstraintMap::merge`]: each field present in `partial` has its
    /// validator set replaced.
    pub fn add_constraints(&mut self, partial: ConstraintMap) {
        self.constraints.merge(partial);
    }

    /// Returns the live constraint map.
    pub fn constraints(&self) -> &ConstraintMap {
        &self.constraints
    }

    /// Looks up the constraints of a field.
    pub fn lookup(&self, type_name: &str, field: &str) -> FieldLookup<'_> {
        match self.constraints.type_constraints(type_name) {
            None => FieldLookup::UnknownType,
            Some(fields) => match fields.get(field) {
                Some(constraints) => FieldLookup::Constraints(constraints),
                None => FieldLookup::NoConstraints,
            },
        }
    }

    /// Removes all constraints.
    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    /// Returns true while at least one load is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    pub(crate) fn begin_load(&mut self) {
        self.pending_loads += 1;
    }

    pub(crate) fn end_load(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::{ConstraintMapBuilder, FieldBuilder};

    fn store() -> ConstraintStore {
        ConstraintStore::with_constraints(
            ConstraintMapBuilder::new()
                .field("Person", "name", FieldBuilder::new().required().build())
                .build(),
        )
    }

    #[test]
    fn test_lookup() {
        let store = store();
        assert!(matches!(
            store.lookup("Person", "name"),
            FieldLookup::Constraints(_)
        ));
        assert_eq!(store.lookup("Person", "age"), FieldLookup::NoConstraints);
        assert_eq!(store.lookup("Unknown", "name"), FieldLookup::UnknownType);
    }

    #[test]
    fn test_add_constraints_replaces_field() {
        let mut store = store();
        store.add_constraints(
            ConstraintMapBuilder::new()
                .field("Person", "name", FieldBuilder::new().size(Some(1), None).build())
                .build(),
        );

        let FieldLookup::Constraints(name) = store.lookup("Person", "name") else {
            panic!("expected constraints for Person.name");
        };
        assert_eq!(name.names().collect::<Vec<_>>(), vec!["Size"]);
    }

    #[test]
    fn test_loading_counter() {
        let mut store = ConstraintStore::new();
        assert!(!store.is_loading());

        store.begin_load();
        store.begin_load();
        store.end_load();
        assert!(store.is_loading());

        store.end_load();
        store.end_load();
        assert!(!store.is_loading());
    }

    #[test]
    fn test_clear() {
        let mut store = store();
        store.clear();
        assert!(store.constraints().is_empty());
    }
}
