//! Path composition for hierarchical admin resources.
//!
//! A [`ResourcePath`] is an ordered list of [`Segment`]s below a realm.
//! [`compose_path`] renders it under the API root:
//!
//! ```text
//! {root}/realms/{realm}/{collection}[/{id}[/{collection}[/{id}...]]]
//! ```
//!
//! Segments are percent-encoded, so an identifier containing `/` cannot
//! collide with a deeper path.
//!
//! # Example
//!
//! ```rust
//! use keycloak_admin::rest::{compose_path, ResourcePath};
//!
//! let path = ResourcePath::new()
//!     .collection("users")
//!     .with_id("an-id")
//!     .unwrap();
//!
//! let url = compose_path("/auth/admin", "realm-name", path.segments()).unwrap();
//! assert_eq!(url, "/auth/admin/realms/realm-name/users/an-id");
//! ```

use std::fmt;

use crate::rest::ResourceError;

/// One step in a resource path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A collection name such as `users` or `groups`.
    Collection(String),
    /// A concrete identifier within the preceding collection.
    Id(String),
}

impl Segment {
    /// Returns the raw segment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Collection(name) => name,
            Self::Id(id) => id,
        }
    }
}

/// An ordered list of segments below a realm.
///
/// Appending never mutates: each call returns a new path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<Segment>,
}

impl ResourcePath {
    /// Creates an empty path (the realm itself).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates a path from raw segments, validating their composition.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedPath`] if an id segment does not
    /// directly follow a collection segment, or any segment is empty.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, ResourceError> {
        validate(&segments)?;
        Ok(Self { segments })
    }

    /// Returns a new path with a collection segment appended.
    #[must_use]
    pub fn collection(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Collection(name.into()));
        Self { segments }
    }

    /// Returns a new path with an id segment appended.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNavigation`] unless the last segment is
    /// a collection name.
    pub fn with_id(&self, id: impl Into<String>) -> Result<Self, ResourceError> {
        if !self.is_collection() {
            return Err(ResourceError::InvalidNavigation {
                operation: "by_id",
                path: self.to_string(),
            });
        }
        let mut segments = self.segments.clone();
        segments.push(Segment::Id(id.into()));
        Ok(Self { segments })
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the trailing identifier, if the path addresses a single item.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Id(id)) => Some(id),
            _ => None,
        }
    }

    /// Returns `true` if the last segment is a collection name.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Collection(_)))
    }

    /// Returns `true` if the last segment is an identifier.
    #[must_use]
    pub fn is_item(&self) -> bool {
        self.id().is_some()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.segments.iter().map(Segment::as_str).collect();
        f.write_str(&joined.join("/"))
    }
}

/// Renders `segments` under `{root}/realms/{realm}`.
///
/// Pure: the same inputs always render the same string.
///
/// # Errors
///
/// Returns [`ResourceError::MalformedPath`] if the realm or any segment is
/// empty, or an id segment does not directly follow a collection segment.
pub fn compose_path(root: &str, realm: &str, segments: &[Segment]) -> Result<String, ResourceError> {
    if realm.is_empty() {
        return Err(ResourceError::MalformedPath {
            path: display(segments),
            reason: "realm name is empty",
        });
    }
    validate(segments)?;

    let mut path = format!("{root}/realms/{}", urlencoding::encode(realm));
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(segment.as_str()));
    }
    Ok(path)
}

fn validate(segments: &[Segment]) -> Result<(), ResourceError> {
    let mut previous: Option<&Segment> = None;
    for segment in segments {
        if segment.as_str().is_empty() {
            return Err(ResourceError::MalformedPath {
                path: display(segments),
                reason: "empty segment",
            });
        }
        if matches!(segment, Segment::Id(_)) && !matches!(previous, Some(Segment::Collection(_))) {
            return Err(ResourceError::MalformedPath {
                path: display(segments),
                reason: "id segment without a preceding collection",
            });
        }
        previous = Some(segment);
    }
    Ok(())
}

fn display(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Collection(name) => name.clone(),
            Segment::Id(id) => format!("{{{id}}}"),
        })
        .collect::<Vec<_>>()
        .join("/")
}
