//! HTTP-specific error types for the Keycloak admin client.
//!
//! - [`HttpResponseError`]: a non-2xx response from the server
//! - [`InvalidHttpRequestError`]: a request that failed validation before sending
//! - [`HttpError`]: unified error type for the transport
//!
//! # Example
//!
//! ```rust,ignore
//! use keycloak_admin::clients::HttpError;
//!
//! match client.fetch("/auth/admin/realms/master/users/42", None).await {
//!     Ok(response) => println!("User: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("Server said {}: {}", e.code, e.body),
//!     Err(HttpError::InvalidRequest(e)) => println!("Not sent: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the server answers with a non-successful status.
///
/// The raw response body is kept verbatim so callers can inspect the
/// server's validation messages (e.g. `{"errorMessage":"User exists with same username"}`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {body}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The raw response body.
    pub body: String,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// No bearer token has been set on the client.
    #[error("No bearer token set. Call set_token before sending admin requests.")]
    MissingToken,
}

/// Unified error type for all transport errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed; nothing was sent.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code if the server responded.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}
