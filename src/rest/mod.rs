//! Resource layer: paths, field mapping, entity state and nodes.
//!
//! # Overview
//!
//! - [`ResourcePath`] / [`Segment`] / [`compose_path`]: hierarchical path addressing
//! - [`FieldMapping`]: external-name to wire-name translation
//! - [`EntityState`]: lazily loaded fields with a dirty set for partial updates
//! - [`ResourceNode`]: navigation plus CRUD scoped to one path
//! - [`ResourceError`]: error type for all of the above

mod errors;
mod fields;
mod path;
mod resource;
mod tracking;

pub use errors::ResourceError;
pub use fields::FieldMapping;
pub use path::{compose_path, ResourcePath, Segment};
pub use resource::{ResourceNode, ID_FIELD};
pub use tracking::EntityState;

pub(crate) use resource::into_objects;
