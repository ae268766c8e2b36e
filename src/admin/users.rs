//! User endpoints.
//!
//! [`Users`] and [`User`] deref to [`ResourceNode`], so the generic CRUD
//! operations (`all`, `create`, `get`, `it`, `update`, `delete`) are
//! available directly. The methods here cover a user's relationships:
//! group membership, realm role mappings and password reset. None of them
//! touch the user's cached entity state.

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::rest::{into_objects, ResourceError, ResourceNode};

/// The `users` collection of a realm.
#[derive(Debug)]
pub struct Users {
    node: ResourceNode,
}

impl Users {
    pub(crate) const fn new(node: ResourceNode) -> Self {
        Self { node }
    }

    /// Returns the user with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] if the underlying node
    /// is not a collection.
    pub fn by_id(&self, id: impl Into<String>) -> Result<User, ResourceError> {
        Ok(User {
            node: self.node.by_id(id)?,
        })
    }
}

impl Deref for Users {
    type Target = ResourceNode;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

/// One user.
#[derive(Debug)]
pub struct User {
    node: ResourceNode,
}

impl User {
    /// Consumes the wrapper and returns the underlying node.
    #[must_use]
    pub fn into_node(self) -> ResourceNode {
        self.node
    }

    /// Lists the groups the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails or
    /// [`ResourceError::Decode`] if the body is not an array of objects.
    pub async fn groups(&self) -> Result<Vec<Map<String, Value>>, ResourceError> {
        self.node.collection("groups").all(None).await
    }

    /// Adds the user to a group.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn add_group(&self, group_id: &str) -> Result<(), ResourceError> {
        self.node.put_child("groups", group_id).await
    }

    /// Removes the user from a group.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn delete_group(&self, group_id: &str) -> Result<(), ResourceError> {
        self.node.delete_child("groups", group_id).await
    }

    /// Lists the realm roles mapped to the user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails or
    /// [`ResourceError::Decode`] if the body is not an array of objects.
    pub async fn realm_role_mappings(&self) -> Result<Vec<Map<String, Value>>, ResourceError> {
        let url = self.realm_mappings_url()?;
        let response = self.node.client().fetch(&url, None).await?;
        into_objects(response.body, url)
    }

    /// Maps realm roles to the user. `roles` are role representations
    /// (at least `id` and `name`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPayload`] if `roles` does not
    /// serialize to a JSON array, or [`ResourceError::Http`] if the request
    /// fails.
    pub async fn add_realm_roles<T: Serialize>(&self, roles: &[T]) -> Result<(), ResourceError> {
        let url = self.realm_mappings_url()?;
        self.node.client().create(&url, to_array(roles)?).await?;
        Ok(())
    }

    /// Removes realm role mappings from the user.
    ///
    /// # Errors
    ///
    /// See [`add_realm_roles`](Self::add_realm_roles).
    pub async fn delete_realm_roles<T: Serialize>(
        &self,
        roles: &[T],
    ) -> Result<(), ResourceError> {
        let url = self.realm_mappings_url()?;
        self.node
            .client()
            .remove_with_body(&url, to_array(roles)?)
            .await?;
        Ok(())
    }

    /// Sets a new password credential.
    ///
    /// `credential` is a credential representation, e.g.
    /// `{"type": "password", "value": "...", "temporary": false}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPayload`] if the credential cannot be
    /// serialized, or [`ResourceError::Http`] if the request fails.
    pub async fn reset_password<T: Serialize + ?Sized>(
        &self,
        credential: &T,
    ) -> Result<(), ResourceError> {
        let url = self.node.collection("reset-password").url()?;
        let body = serde_json::to_value(credential).map_err(|e| ResourceError::InvalidPayload {
            reason: e.to_string(),
        })?;
        self.node.client().replace(&url, body).await?;
        Ok(())
    }

    fn realm_mappings_url(&self) -> Result<String, ResourceError> {
        self.node
            .collection("role-mappings")
            .collection("realm")
            .url()
    }
}

impl Deref for User {
    type Target = ResourceNode;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl DerefMut for User {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.node
    }
}

fn to_array<T: Serialize>(items: &[T]) -> Result<Value, ResourceError> {
    serde_json::to_value(items).map_err(|e| ResourceError::InvalidPayload {
        reason: e.to_string(),
    })
}
