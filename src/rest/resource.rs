//! Navigable resource nodes with CRUD operations.
//!
//! A [`ResourceNode`] addresses either a collection (`.../users`) or a
//! single item (`.../users/{id}`) within a realm. Navigation returns new
//! nodes and never changes the node it was called on; CRUD operations
//! resolve the node's path and delegate to the [`HttpClient`].
//!
//! Item nodes own an [`EntityState`]: [`it`](ResourceNode::it) loads it on
//! first access, and [`update`](ResourceNode::update) sends only the fields
//! assigned since the last load or flush, plus the entity's `id`.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let users = admin.realms().by_name("realm-name").users();
//!
//! let id = users
//!     .create(&json!({"username": "jdoe", "first_name": "John", "enabled": true}))
//!     .await?;
//!
//! let mut user = users.by_id(&id)?;
//! println!("{:?}", user.it().await?.get("username"));
//!
//! user.update(&json!({"last_name": "Doe"})).await?;
//! user.delete().await?;
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::{HttpClient, HttpResponse};
use crate::rest::{compose_path, EntityState, FieldMapping, ResourceError, ResourcePath};

/// Name of the identifier field in admin API representations.
pub const ID_FIELD: &str = "id";

/// State shared by every node derived from one realm.
#[derive(Clone, Debug)]
struct NodeContext {
    client: HttpClient,
    api_root: Arc<str>,
    realm: Arc<str>,
    mapping: Arc<FieldMapping>,
}

/// A handle for one collection or item within a realm.
///
/// Nodes are cheap to create. The realm name, API root and field mapping
/// are shared between a node and the nodes navigated from it; the entity
/// state is not.
///
/// Nodes are `Send` but not meant to be mutated from several tasks at once:
/// methods that touch the entity state take `&mut self`.
#[derive(Debug)]
pub struct ResourceNode {
    context: NodeContext,
    path: ResourcePath,
    state: EntityState,
}

impl ResourceNode {
    /// Creates the node for a realm itself (no segments).
    #[must_use]
    pub fn realm(
        client: HttpClient,
        api_root: &str,
        realm: &str,
        mapping: Arc<FieldMapping>,
    ) -> Self {
        Self {
            context: NodeContext {
                client,
                api_root: Arc::from(api_root),
                realm: Arc::from(realm),
                mapping,
            },
            path: ResourcePath::new(),
            state: EntityState::new(),
        }
    }

    fn child(&self, path: ResourcePath) -> Self {
        Self {
            context: self.context.clone(),
            path,
            state: EntityState::new(),
        }
    }

    /// Returns the realm name.
    #[must_use]
    pub fn realm_name(&self) -> &str {
        &self.context.realm
    }

    /// Returns the node's path below the realm.
    #[must_use]
    pub const fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// Returns the item identifier, if this is an item node.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.path.id()
    }

    /// Returns the field mapping applied to payloads.
    #[must_use]
    pub fn mapping(&self) -> &FieldMapping {
        &self.context.mapping
    }

    /// Returns the cached entity state.
    #[must_use]
    pub const fn state(&self) -> &EntityState {
        &self.state
    }

    /// Returns the transport shared by this node.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.context.client
    }

    /// Resolves the node's absolute API path.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedPath`] if the realm or a segment is
    /// empty.
    pub fn url(&self) -> Result<String, ResourceError> {
        compose_path(
            &self.context.api_root,
            &self.context.realm,
            self.path.segments(),
        )
    }

    /// Returns a new node with a collection segment appended.
    ///
    /// An empty name is reported as [`ResourceError::MalformedPath`] when
    /// the node is first used.
    #[must_use]
    pub fn collection(&self, name: impl Into<String>) -> Self {
        self.child(self.path.collection(name))
    }

    /// Returns a new item node for `id` within this collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] unless this node's last
    /// segment is a collection name.
    pub fn by_id(&self, id: impl Into<String>) -> Result<Self, ResourceError> {
        Ok(self.child(self.path.with_id(id)?))
    }

    fn require_item(&self, operation: &'static str) -> Result<&str, ResourceError> {
        self.path.id().ok_or_else(|| ResourceError::InvalidNavigation {
            operation,
            path: self.path.to_string(),
        })
    }

    fn require_collection(&self, operation: &'static str) -> Result<(), ResourceError> {
        if self.path.is_collection() {
            Ok(())
        } else {
            Err(ResourceError::InvalidNavigation {
                operation,
                path: self.path.to_string(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Item operations
    // ------------------------------------------------------------------

    /// Fetches the item's current fields. The entity state is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on a collection node,
    /// [`ResourceError::Http`] on a failed request, or
    /// [`ResourceError::Decode`] if the body is not a JSON object.
    pub async fn get(&self) -> Result<Map<String, Value>, ResourceError> {
        self.require_item("get")?;
        let url = self.url()?;
        let response = self.context.client.fetch(&url, None).await?;
        match response.body {
            Value::Object(fields) => Ok(fields),
            _ => Err(ResourceError::Decode {
                expected: "a JSON object",
                path: url,
            }),
        }
    }

    /// Returns the cached fields, fetching them on first access.
    ///
    /// Later calls return the cache without a request until
    /// [`reload`](Self::reload) is called.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get). On error the state is left unloaded.
    #[doc(alias = "read")]
    pub async fn it(&mut self) -> Result<&Map<String, Value>, ResourceError> {
        if !self.state.is_loaded() {
            let fetched = self.get().await?;
            self.state.populate(fetched);
        }
        Ok(self.state.fields())
    }

    /// Discards the cached fields and pending assignments, then fetches again.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get). On error the previous state is kept.
    pub async fn reload(&mut self) -> Result<&Map<String, Value>, ResourceError> {
        let fetched = self.get().await?;
        self.state = EntityState::seeded(fetched);
        Ok(self.state.fields())
    }

    /// Seeds the entity state with fields the caller already has.
    ///
    /// Field names are mapped to wire names. Any previous state is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on a collection node or
    /// [`ResourceError::InvalidPayload`] if `fields` is not a JSON object.
    pub fn seed<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<(), ResourceError> {
        self.require_item("seed")?;
        let wire = self.context.mapping.map_fields(&to_object(fields)?);
        self.state = EntityState::seeded(wire.into_iter().collect());
        Ok(())
    }

    /// Assigns one field locally without sending anything.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on a collection node,
    /// [`ResourceError::InvalidPayload`] if the value cannot be serialized,
    /// or [`ResourceError::IdentifierReassignment`] when assigning a
    /// different `id`.
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        field: &str,
        value: &T,
    ) -> Result<(), ResourceError> {
        let id = self.require_item("set")?;
        let value = serde_json::to_value(value).map_err(|e| ResourceError::InvalidPayload {
            reason: e.to_string(),
        })?;
        let wire_name = self.context.mapping.to_wire(field).to_string();
        check_identifier(id, &wire_name, &value)?;
        self.state.assign(wire_name, value);
        Ok(())
    }

    /// Assigns `fields` and sends a partial update.
    ///
    /// The PUT body holds every field in the dirty set (mapped to wire
    /// names, ordered by key) plus the item's `id`. On success the dirty set
    /// is cleared. On failure neither the cached fields nor the dirty set
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPayload`] if `fields` is not a JSON
    /// object, [`ResourceError::IdentifierReassignment`] when assigning a
    /// different `id`, or [`ResourceError::Http`] if the request fails.
    pub async fn update<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<(), ResourceError> {
        let id = self.require_item("update")?.to_string();
        let wire = self.context.mapping.map_fields(&to_object(fields)?);

        let mut staged = self.state.clone();
        for (name, value) in wire {
            check_identifier(&id, &name, &value)?;
            staged.assign(name, value);
        }

        self.flush(&id, staged).await
    }

    /// Sends the pending assignments made with [`set`](Self::set).
    ///
    /// With nothing assigned, the body is just `{"id": ...}`.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub async fn save(&mut self) -> Result<(), ResourceError> {
        let id = self.require_item("save")?.to_string();
        let staged = self.state.clone();
        self.flush(&id, staged).await
    }

    async fn flush(&mut self, id: &str, mut staged: EntityState) -> Result<(), ResourceError> {
        let mut payload = staged.dirty_fields();
        payload.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let url = self.url()?;
        self.context
            .client
            .replace(&url, to_body(payload))
            .await?;

        staged.mark_clean();
        self.state = staged;
        Ok(())
    }

    /// Deletes the item. The node should be discarded afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on a collection node or
    /// [`ResourceError::Http`] if the request fails.
    pub async fn delete(&self) -> Result<(), ResourceError> {
        self.require_item("delete")?;
        let url = self.url()?;
        self.context.client.remove(&url).await?;
        Ok(())
    }

    /// Links a related entity: `PUT {item}/{sub}/{sub_id}`.
    ///
    /// The entity state is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on a collection node,
    /// [`ResourceError::MalformedPath`] for empty names, or
    /// [`ResourceError::Http`] if the request fails.
    pub async fn put_child(&self, sub: &str, sub_id: &str) -> Result<(), ResourceError> {
        self.require_item("put_child")?;
        let url = self.collection(sub).by_id(sub_id)?.url()?;
        self.context
            .client
            .replace(&url, Value::Object(Map::new()))
            .await?;
        Ok(())
    }

    /// Unlinks a related entity: `DELETE {item}/{sub}/{sub_id}`.
    ///
    /// The entity state is not touched.
    ///
    /// # Errors
    ///
    /// See [`put_child`](Self::put_child).
    pub async fn delete_child(&self, sub: &str, sub_id: &str) -> Result<(), ResourceError> {
        self.require_item("delete_child")?;
        let url = self.collection(sub).by_id(sub_id)?.url()?;
        self.context.client.remove(&url).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Collection operations
    // ------------------------------------------------------------------

    /// Lists the collection, in the order the server returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on an item node,
    /// [`ResourceError::Http`] on a failed request, or
    /// [`ResourceError::Decode`] if the body is not an array of objects.
    pub async fn all(
        &self,
        query: Option<HashMap<String, String>>,
    ) -> Result<Vec<Map<String, Value>>, ResourceError> {
        self.require_collection("all")?;
        let url = self.url()?;
        let response = self.context.client.fetch(&url, query).await?;
        into_objects(response.body, url)
    }

    /// Returns the size of the collection (`GET {collection}/count`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Decode`] if the body is not a number; see
    /// [`all`](Self::all) for the others.
    pub async fn count(
        &self,
        query: Option<HashMap<String, String>>,
    ) -> Result<u64, ResourceError> {
        self.require_collection("count")?;
        let url = self.collection("count").url()?;
        let response = self.context.client.fetch(&url, query).await?;
        response
            .body
            .as_u64()
            .ok_or(ResourceError::Decode {
                expected: "a non-negative integer",
                path: url,
            })
    }

    /// Creates an item and returns its identifier.
    ///
    /// Every supplied field is sent, mapped to wire names and ordered by
    /// key. The identifier is read from the `Location` header, or from an
    /// `id` in the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] on an item node,
    /// [`ResourceError::InvalidPayload`] if `fields` is not a JSON object,
    /// [`ResourceError::Http`] on a failed request, or
    /// [`ResourceError::CreateAcknowledgement`] if no identifier came back.
    pub async fn create<T: Serialize + ?Sized>(&self, fields: &T) -> Result<String, ResourceError> {
        self.require_collection("create")?;
        let wire = self.context.mapping.map_fields(&to_object(fields)?);

        let url = self.url()?;
        let response = self.context.client.create(&url, to_body(wire)).await?;

        created_id(&response).ok_or(ResourceError::CreateAcknowledgement {
            path: url,
            status: response.code,
        })
    }
}

/// Serializes caller-supplied fields, requiring a JSON object.
fn to_object<T: Serialize + ?Sized>(fields: &T) -> Result<Map<String, Value>, ResourceError> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ResourceError::InvalidPayload {
            reason: format!("expected a JSON object of fields, got {other}"),
        }),
        Err(e) => Err(ResourceError::InvalidPayload {
            reason: e.to_string(),
        }),
    }
}

/// Builds a body whose keys serialize in sorted order.
fn to_body(fields: BTreeMap<String, Value>) -> Value {
    Value::Object(fields.into_iter().collect())
}

fn check_identifier(id: &str, wire_name: &str, value: &Value) -> Result<(), ResourceError> {
    if wire_name == ID_FIELD && value.as_str() != Some(id) {
        return Err(ResourceError::IdentifierReassignment {
            id: id.to_string(),
            attempted: value.clone(),
        });
    }
    Ok(())
}

pub(crate) fn into_objects(body: Value, path: String) -> Result<Vec<Map<String, Value>>, ResourceError> {
    let Value::Array(items) = body else {
        return Err(ResourceError::Decode {
            expected: "a JSON array",
            path,
        });
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(fields),
            _ => Err(ResourceError::Decode {
                expected: "an array of JSON objects",
                path: path.clone(),
            }),
        })
        .collect()
}

/// Recovers a created entity's identifier from a response.
fn created_id(response: &HttpResponse) -> Option<String> {
    let from_location = response.location().and_then(|location| {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let last = path.trim_end_matches('/').rsplit('/').next()?;
        if last.is_empty() {
            return None;
        }
        urlencoding::decode(last).ok().map(|id| id.into_owned())
    });

    from_location.or_else(|| {
        response
            .body
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map(ToString::to_string)
    })
}
