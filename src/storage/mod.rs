//! Descriptor storage module.
//!
//! This module provides the boundary between plans and descriptor files:
//! a disk-backed store honouring the project's formatting preferences and
//! an in-memory store.

mod disk;
mod format;
mod memory;
mod store;

pub use disk::DiskStorage;
pub use format::reindent;
pub use memory::MemoryStorage;
pub use store::Storage;

#[cfg(test)]
pub use store::MockStorage;
