//! Data model shared by planners, actions and loaders.
//!
//! Records in this module validate their invariants at construction time, so
//! a value that exists is always well-formed.

mod resource;
mod table;

pub use resource::{
    Resource, ResourceColumn, ResourceConfig, ResourceId, ResourceSpec, ResourceType,
};
pub use table::{Table, TableColumn, TableSpec};
