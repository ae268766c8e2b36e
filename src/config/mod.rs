//! Configuration types for the Keycloak admin client.
//!
//! # Overview
//!
//! - [`AdminConfig`]: settings shared by every request the client sends
//! - [`AdminConfigBuilder`]: a builder for constructing [`AdminConfig`]
//! - [`ServerUrl`], [`RealmName`], [`BearerToken`]: validated newtypes
//!
//! # Example
//!
//! ```rust
//! use keycloak_admin::{AdminConfig, ServerUrl};
//!
//! let config = AdminConfig::builder()
//!     .server_url(ServerUrl::new("https://sso.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_root(), "/auth/admin");
//! ```

mod newtypes;

pub use newtypes::{BearerToken, RealmName, ServerUrl};

use crate::error::ConfigError;
use crate::rest::FieldMapping;

/// Default root of the admin REST API on a Keycloak server.
pub const DEFAULT_API_ROOT: &str = "/auth/admin";

/// Configuration for the Keycloak admin client.
///
/// `AdminConfig` is `Clone`, `Send`, and `Sync`. It carries no credentials:
/// the bearer token is set on the client at runtime.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    server_url: ServerUrl,
    api_root: String,
    user_agent_prefix: Option<String>,
    field_mapping: FieldMapping,
}

impl AdminConfig {
    /// Creates a new builder for constructing an `AdminConfig`.
    #[must_use]
    pub fn builder() -> AdminConfigBuilder {
        AdminConfigBuilder::new()
    }

    /// Returns the server URL.
    #[must_use]
    pub const fn server_url(&self) -> &ServerUrl {
        &self.server_url
    }

    /// Returns the admin API root path (e.g., "/auth/admin").
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the field mapping applied to request payloads.
    #[must_use]
    pub const fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }
}

// Verify AdminConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdminConfig>();
};

/// Builder for constructing [`AdminConfig`] instances.
///
/// `server_url` is required. Defaults:
///
/// - `api_root`: `/auth/admin`
/// - `user_agent_prefix`: `None`
/// - `field_mapping`: [`FieldMapping::keycloak`]
///
/// # Example
///
/// ```rust
/// use keycloak_admin::{AdminConfig, FieldMapping, ServerUrl};
///
/// let config = AdminConfig::builder()
///     .server_url(ServerUrl::new("http://localhost:8080").unwrap())
///     .api_root("/admin")
///     .user_agent_prefix("provisioner/2.1")
///     .field_mapping(FieldMapping::identity())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.api_root(), "/admin");
/// ```
#[derive(Debug, Default)]
pub struct AdminConfigBuilder {
    server_url: Option<ServerUrl>,
    api_root: Option<String>,
    user_agent_prefix: Option<String>,
    field_mapping: Option<FieldMapping>,
}

impl AdminConfigBuilder {
    /// Creates a new builder with all fields unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Keycloak server URL (required).
    #[must_use]
    pub fn server_url(mut self, url: ServerUrl) -> Self {
        self.server_url = Some(url);
        self
    }

    /// Sets the admin API root path.
    #[must_use]
    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = Some(root.into());
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the field mapping applied to request payloads.
    #[must_use]
    pub fn field_mapping(mut self, mapping: FieldMapping) -> Self {
        self.field_mapping = Some(mapping);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `server_url` is unset,
    /// or [`ConfigError::InvalidApiRoot`] if the root is not an absolute path.
    pub fn build(self) -> Result<AdminConfig, ConfigError> {
        let server_url = self
            .server_url
            .ok_or(ConfigError::MissingRequiredField {
                field: "server_url",
            })?;

        let api_root = match self.api_root {
            Some(root) => normalize_api_root(root)?,
            None => DEFAULT_API_ROOT.to_string(),
        };

        Ok(AdminConfig {
            server_url,
            api_root,
            user_agent_prefix: self.user_agent_prefix,
            field_mapping: self.field_mapping.unwrap_or_default(),
        })
    }
}

/// Trims trailing slashes and requires a leading one.
fn normalize_api_root(root: String) -> Result<String, ConfigError> {
    let trimmed = root.trim().trim_end_matches('/');
    if !trimmed.starts_with('/') || trimmed.contains("//") {
        return Err(ConfigError::InvalidApiRoot { root });
    }
    Ok(trimmed.to_string())
}
