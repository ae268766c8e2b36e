//! Configuration error types for the Keycloak admin client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid settings are rejected before any request is built.
//!
//! # Example
//!
//! ```rust
//! use keycloak_admin::{ConfigError, RealmName};
//!
//! let result = RealmName::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyRealmName)));
//! ```

use thiserror::Error;

/// Errors that can occur while building client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Realm name cannot be empty.
    #[error("Realm name cannot be empty. Please provide the name of an existing realm.")]
    EmptyRealmName,

    /// Bearer token cannot be empty.
    #[error("Bearer token cannot be empty. Acquire an access token before calling set_token.")]
    EmptyToken,

    /// Server URL is invalid.
    #[error("Invalid server URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://keycloak.example.com').")]
    InvalidServerUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API root is invalid.
    #[error("Invalid API root '{root}'. Expected an absolute path such as '/auth/admin'.")]
    InvalidApiRoot {
        /// The invalid root that was provided.
        root: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
