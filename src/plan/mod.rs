//! Action and plan module.
//!
//! This module defines the closed set of descriptor edits and the plan that
//! applies them to a working set of documents loaded through storage.

mod action;
mod document;
mod executor;
mod hash;

pub use action::{
    Action, AddResourceColumn, BootstrapResource, ColumnTarget, DeleteEmptyDescriptor, DeleteResourceColumn,
    ReorderResourceColumns, RelocateResource, UpdateResourceColumn,
};
pub use document::{Document, DocumentMap};
pub use executor::{ExecutionMode, ExecutionReport, Plan};
pub use hash::DocumentHasher;
