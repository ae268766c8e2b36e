//! Lazily loaded entity state with assignment tracking.
//!
//! [`EntityState`] caches one entity's server-side fields (keyed by wire
//! name) and remembers which fields were assigned locally since the last
//! load or flush. Only those fields go into a partial update.
//!
//! Unlike a diff against a snapshot, tracking is by assignment: writing a
//! field marks it dirty even if the value is unchanged, and writing it twice
//! marks it once.
//!
//! # Example
//!
//! ```rust
//! use keycloak_admin::rest::EntityState;
//! use serde_json::json;
//!
//! let mut state = EntityState::seeded(
//!     json!({"id": "user-id", "email": "old@example.com"}).as_object().cloned().unwrap(),
//! );
//! assert!(!state.is_dirty());
//!
//! state.assign("email", json!("new@example.com"));
//! state.assign("enabled", json!(true));
//!
//! let payload = state.dirty_fields();
//! assert_eq!(payload.len(), 2);
//! assert!(payload.get("id").is_none());
//!
//! state.mark_clean();
//! assert!(!state.is_dirty());
//! assert_eq!(state.get("email"), Some(&json!("new@example.com")));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

/// Cached fields of one entity plus its dirty set.
///
/// Invariant: every name in the dirty set is present in `fields`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityState {
    fields: Map<String, Value>,
    loaded: bool,
    dirty: BTreeSet<String>,
}

impl EntityState {
    /// Creates an empty, unloaded state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loaded state from fields the caller already has
    /// (e.g. right after a create). Nothing is dirty.
    #[must_use]
    pub fn seeded(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            loaded: true,
            dirty: BTreeSet::new(),
        }
    }

    /// Returns `true` once fields were fetched or seeded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns all known fields, keyed by wire name.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns one field by wire name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if any field was assigned since the last load or flush.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Returns `true` if `name` was assigned since the last load or flush.
    #[must_use]
    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Returns the names in the dirty set, in order.
    #[must_use]
    pub const fn dirty_names(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    /// Assigns a field and adds it to the dirty set.
    ///
    /// The field need not exist in the fetched representation.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.fields.insert(name.clone(), value);
        self.dirty.insert(name);
    }

    /// Replaces cached fields with a fetched representation and marks the
    /// state loaded.
    ///
    /// Fields assigned locally before the load keep their local values and
    /// stay dirty.
    pub fn populate(&mut self, mut fetched: Map<String, Value>) {
        for name in &self.dirty {
            if let Some(value) = self.fields.get(name) {
                fetched.insert(name.clone(), value.clone());
            }
        }
        self.fields = fetched;
        self.loaded = true;
    }

    /// Returns the dirty fields, ordered by name.
    #[must_use]
    pub fn dirty_fields(&self) -> BTreeMap<String, Value> {
        self.dirty
            .iter()
            .filter_map(|name| {
                self.fields
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    /// Clears the dirty set; cached values are kept.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    /// Forgets everything, returning to the empty unloaded state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
