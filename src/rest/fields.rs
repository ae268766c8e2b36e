//! Translation between caller-facing field names and wire field names.
//!
//! Callers may write fields in `snake_case` (`first_name`) while the admin
//! API expects `camelCase` (`firstName`). [`FieldMapping`] holds a fixed,
//! bidirectional table; names it does not know pass through unchanged.
//! Values are never touched, so booleans stay JSON booleans and nested
//! arrays or objects keep their structure.
//!
//! # Example
//!
//! ```rust
//! use keycloak_admin::rest::FieldMapping;
//! use serde_json::json;
//!
//! let mapping = FieldMapping::keycloak();
//! assert_eq!(mapping.to_wire("first_name"), "firstName");
//! assert_eq!(mapping.to_external("firstName"), "first_name");
//! assert_eq!(mapping.to_wire("username"), "username");
//!
//! let wire = mapping.map_fields(json!({"enabled": true, "last_name": "Doe"}).as_object().unwrap());
//! assert_eq!(wire["lastName"], json!("Doe"));
//! assert_eq!(wire["enabled"], json!(true));
//! ```

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

/// External-name / wire-name pairs understood by the Keycloak admin API.
const KEYCLOAK_FIELDS: &[(&str, &str)] = &[
    ("first_name", "firstName"),
    ("last_name", "lastName"),
    ("email_verified", "emailVerified"),
    ("required_actions", "requiredActions"),
    ("created_timestamp", "createdTimestamp"),
    ("federation_link", "federationLink"),
    ("service_account_client_id", "serviceAccountClientId"),
    ("not_before", "notBefore"),
    ("realm_roles", "realmRoles"),
    ("client_roles", "clientRoles"),
    ("sub_groups", "subGroups"),
    ("client_id", "clientId"),
    ("redirect_uris", "redirectUris"),
    ("web_origins", "webOrigins"),
    ("public_client", "publicClient"),
    ("root_url", "rootUrl"),
    ("base_url", "baseUrl"),
    ("display_name", "displayName"),
    ("container_id", "containerId"),
    ("client_role", "clientRole"),
];

/// A bidirectional field-name table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    to_wire: HashMap<String, String>,
    to_external: HashMap<String, String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::keycloak()
    }
}

impl FieldMapping {
    /// A mapping that renames nothing.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            to_wire: HashMap::new(),
            to_external: HashMap::new(),
        }
    }

    /// The table for Keycloak's `camelCase` representations.
    #[must_use]
    pub fn keycloak() -> Self {
        KEYCLOAK_FIELDS
            .iter()
            .fold(Self::identity(), |mapping, (external, wire)| {
                mapping.with(*external, *wire)
            })
    }

    /// Returns a copy of this mapping with one more pair.
    ///
    /// Any existing pair using either name is replaced, keeping the table
    /// one-to-one.
    #[must_use]
    pub fn with(mut self, external: impl Into<String>, wire: impl Into<String>) -> Self {
        let external = external.into();
        let wire = wire.into();

        if let Some(old_wire) = self.to_wire.remove(&external) {
            self.to_external.remove(&old_wire);
        }
        if let Some(old_external) = self.to_external.remove(&wire) {
            self.to_wire.remove(&old_external);
        }

        self.to_wire.insert(external.clone(), wire.clone());
        self.to_external.insert(wire, external);
        self
    }

    /// Returns the wire name for an external name.
    #[must_use]
    pub fn to_wire<'a>(&'a self, external: &'a str) -> &'a str {
        self.to_wire.get(external).map_or(external, String::as_str)
    }

    /// Returns the external name for a wire name.
    #[must_use]
    pub fn to_external<'a>(&'a self, wire: &'a str) -> &'a str {
        self.to_external.get(wire).map_or(wire, String::as_str)
    }

    /// Renames every key of `fields` to its wire name.
    ///
    /// The result is ordered by key so serialized bodies are reproducible.
    /// If two inputs map to the same wire name, the later one in `fields`'
    /// iteration order wins.
    #[must_use]
    pub fn map_fields(&self, fields: &Map<String, Value>) -> BTreeMap<String, Value> {
        fields
            .iter()
            .map(|(name, value)| (self.to_wire(name).to_string(), value.clone()))
            .collect()
    }

    /// Renames every key of `fields` to its external name.
    #[must_use]
    pub fn unmap_fields(&self, fields: &Map<String, Value>) -> BTreeMap<String, Value> {
        fields
            .iter()
            .map(|(name, value)| (self.to_external(name).to_string(), value.clone()))
            .collect()
    }
}
