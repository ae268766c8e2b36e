//! # Keycloak Admin Rust Client
//!
//! A Rust client for the Keycloak admin REST API. Resources are reached by
//! navigating a realm hierarchy, and item handles track the fields you assign
//! so updates send only what changed.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AdminConfig`] and [`AdminConfigBuilder`]
//! - Validated newtypes for the server URL, realm names and bearer tokens
//! - A shared, replaceable bearer token via [`auth::AuthContext`]
//! - An async HTTP transport that sends and receives JSON
//! - Hierarchical path addressing (`realms/{realm}/users/{id}/groups/...`)
//! - Resource nodes with lazy loading and partial updates
//! - Translation between snake_case field names and Keycloak's wire names
//!
//! ## Quick Start
//!
//! ```rust
//! use keycloak_admin::{AdminConfig, KeycloakAdmin, ServerUrl};
//!
//! let config = AdminConfig::builder()
//!     .server_url(ServerUrl::new("https://sso.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let admin = KeycloakAdmin::new(config).unwrap();
//! admin.set_token("access-token").unwrap();
//!
//! let users = admin.realms().by_name("realm-name").users();
//! assert_eq!(users.url().unwrap(), "/auth/admin/realms/realm-name/users");
//! ```
//!
//! ## Working With Users
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let users = admin.realms().by_name("realm-name").users();
//!
//! // POST .../users, identifier taken from the Location header
//! let id = users
//!     .create(&json!({
//!         "username": "jdoe",
//!         "first_name": "John",
//!         "enabled": true,
//!     }))
//!     .await?;
//!
//! let mut user = users.by_id(&id)?;
//!
//! // First access fetches, later accesses use the cache
//! let fields = user.it().await?;
//! println!("{:?}", fields.get("firstName"));
//!
//! // PUT .../users/{id} with {"id": ..., "lastName": "Doe"}
//! user.update(&json!({"last_name": "Doe"})).await?;
//!
//! // DELETE .../users/{id}/groups/{group_id}
//! user.delete_group("group-id").await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and tokens are instance-based
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: the client and its token are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **No retries**: every operation sends at most one request

pub mod admin;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use admin::{KeycloakAdmin, Realm, Realms, User, Users};
pub use config::{AdminConfig, AdminConfigBuilder, BearerToken, RealmName, ServerUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export resource types
pub use rest::{EntityState, FieldMapping, ResourceError, ResourceNode, ResourcePath};
