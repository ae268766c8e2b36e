//! Authentication state for the Keycloak admin client.
//!
//! The admin API authenticates every request with a bearer access token.
//! This crate does not acquire tokens: callers obtain one from their identity
//! provider and hand it to [`AuthContext::set_token`] (usually through
//! `KeycloakAdmin::set_token`).
//!
//! # Example
//!
//! ```rust
//! use keycloak_admin::auth::AuthContext;
//! use keycloak_admin::BearerToken;
//!
//! let auth = AuthContext::new();
//! assert!(!auth.has_token());
//!
//! auth.set_token(BearerToken::new("some-token").unwrap());
//! assert_eq!(auth.authorization().as_deref(), Some("Bearer some-token"));
//! ```

mod context;

pub use context::AuthContext;
