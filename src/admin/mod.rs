//! Top-level admin client and realm navigation.
//!
//! [`KeycloakAdmin`] owns the configuration, the shared [`AuthContext`] and
//! the transport. Everything else is reached by navigation:
//!
//! ```rust,ignore
//! use keycloak_admin::{AdminConfig, KeycloakAdmin, ServerUrl};
//!
//! let admin = KeycloakAdmin::new(
//!     AdminConfig::builder()
//!         .server_url(ServerUrl::new("https://sso.example.com")?)
//!         .build()?,
//! )?;
//! admin.set_token("eyJ...")?;
//!
//! let realm = admin.realms().by_name("realm-name");
//! let users = realm.users().all(None).await?;
//! realm.users().by_id("user-id")?.delete_group("group-id").await?;
//! ```

mod users;

pub use users::{User, Users};

use std::sync::Arc;

use crate::auth::AuthContext;
use crate::clients::{HttpClient, HttpError};
use crate::config::{AdminConfig, BearerToken};
use crate::error::ConfigError;
use crate::rest::{FieldMapping, ResourceNode};

/// The admin API client.
///
/// Cloning is cheap; clones share the connection pool and the token.
#[derive(Clone, Debug)]
pub struct KeycloakAdmin {
    config: AdminConfig,
    auth: AuthContext,
    client: HttpClient,
    mapping: Arc<FieldMapping>,
}

// Verify KeycloakAdmin is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<KeycloakAdmin>();
};

impl KeycloakAdmin {
    /// Creates a client with no token set.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, HttpError> {
        let auth = AuthContext::new();
        let client = HttpClient::new(&config, auth.clone())?;
        let mapping = Arc::new(config.field_mapping().clone());
        Ok(Self {
            config,
            auth,
            client,
            mapping,
        })
    }

    /// Sets the bearer token used by every subsequent request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyToken`] if `token` is empty.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), ConfigError> {
        self.auth.set_token(BearerToken::new(token)?);
        Ok(())
    }

    /// Removes the bearer token.
    pub fn clear_token(&self) {
        self.auth.clear_token();
    }

    /// Returns the shared authentication context.
    #[must_use]
    pub const fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Returns the realm navigator.
    #[must_use]
    pub const fn realms(&self) -> Realms<'_> {
        Realms { admin: self }
    }
}

/// Entry point for realm navigation.
#[derive(Clone, Copy, Debug)]
pub struct Realms<'a> {
    admin: &'a KeycloakAdmin,
}

impl Realms<'_> {
    /// Returns a handle for the named realm.
    ///
    /// Accepts a plain string or a validated [`RealmName`](crate::config::RealmName). An empty plain
    /// string is reported as `MalformedPath` on first use.
    #[must_use]
    pub fn by_name(&self, name: impl AsRef<str>) -> Realm {
        Realm {
            node: ResourceNode::realm(
                self.admin.client.clone(),
                self.admin.config.api_root(),
                name.as_ref(),
                Arc::clone(&self.admin.mapping),
            ),
        }
    }
}

/// A handle for one realm.
#[derive(Debug)]
pub struct Realm {
    node: ResourceNode,
}

impl Realm {
    /// Returns the realm name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.node.realm_name()
    }

    /// Returns the realm-level node (no segments).
    #[must_use]
    pub const fn node(&self) -> &ResourceNode {
        &self.node
    }

    /// Returns the node for any collection under this realm.
    #[must_use]
    pub fn collection(&self, name: &str) -> ResourceNode {
        self.node.collection(name)
    }

    /// The `users` collection.
    #[must_use]
    pub fn users(&self) -> Users {
        Users::new(self.node.collection("users"))
    }

    /// The `groups` collection.
    #[must_use]
    pub fn groups(&self) -> ResourceNode {
        self.node.collection("groups")
    }

    /// The `clients` collection.
    #[must_use]
    pub fn clients(&self) -> ResourceNode {
        self.node.collection("clients")
    }

    /// The realm `roles` collection.
    #[must_use]
    pub fn roles(&self) -> ResourceNode {
        self.node.collection("roles")
    }
}
