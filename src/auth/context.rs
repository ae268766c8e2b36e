//! Shared bearer token holder.

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::BearerToken;

/// The bearer token shared by a client and every transport it creates.
///
/// Cloning an `AuthContext` yields another handle to the same token, so a
/// token set through one handle is seen by all of them. The token is read
/// at request time: a transport never caches it.
///
/// Reads may happen concurrently. Replacing the token while requests are in
/// flight is allowed, but each in-flight request keeps whichever value it
/// read when it was built.
#[derive(Clone, Debug, Default)]
pub struct AuthContext {
    token: Arc<RwLock<Option<BearerToken>>>,
}

// Verify AuthContext is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthContext>();
};

impl AuthContext {
    /// Creates a context with no token set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the bearer token.
    pub fn set_token(&self, token: BearerToken) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token);
        tracing::debug!("Admin bearer token set");
    }

    /// Removes the bearer token. Subsequent requests fail locally until a
    /// new token is set.
    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        tracing::debug!("Admin bearer token cleared");
    }

    /// Returns a copy of the current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<BearerToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if a token is currently set.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the `Authorization` header value for the current token.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.token().map(|token| token.header_value())
    }
}
