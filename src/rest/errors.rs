//! Resource-level error types.

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for resource navigation and CRUD operations.
///
/// Local failures (`MalformedPath`, `InvalidNavigation`, `InvalidPayload`,
/// `IdentifierReassignment`) are detected before any request is sent.
///
/// # Example
///
/// ```rust
/// use keycloak_admin::rest::ResourceError;
///
/// let error = ResourceError::InvalidNavigation {
///     operation: "by_id",
///     path: "users/42".to_string(),
/// };
/// assert!(error.to_string().contains("by_id"));
/// assert_eq!(error.status(), None);
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The segment list cannot be rendered to a path.
    #[error("Malformed resource path '{path}': {reason}")]
    MalformedPath {
        /// The offending segments, joined for display.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// A navigation or CRUD call was made on a node of the wrong shape.
    #[error("Cannot call {operation} on resource node '{path}'")]
    InvalidNavigation {
        /// The operation that was attempted.
        operation: &'static str,
        /// The node's segments, joined for display.
        path: String,
    },

    /// The server accepted a create but no identifier could be recovered.
    ///
    /// The entity may or may not exist server-side.
    #[error("Create on '{path}' succeeded with status {status} but returned no identifier")]
    CreateAcknowledgement {
        /// The collection path the entity was posted to.
        path: String,
        /// The success status returned by the server.
        status: u16,
    },

    /// The supplied fields did not serialize to a JSON object.
    #[error("Invalid payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected.
        reason: String,
    },

    /// An update tried to assign a different value to the identifier field.
    #[error("Cannot reassign identifier of entity '{id}' to {attempted}")]
    IdentifierReassignment {
        /// The entity's identifier.
        id: String,
        /// The value that was assigned.
        attempted: serde_json::Value,
    },

    /// A successful response did not have the expected JSON shape.
    #[error("Expected {expected} from '{path}'")]
    Decode {
        /// The JSON shape that was expected.
        expected: &'static str,
        /// The request path.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Returns the HTTP status code if the server rejected the request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if the server rejected the request.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http(HttpError::Response(e)) => Some(&e.body),
            _ => None,
        }
    }
}
