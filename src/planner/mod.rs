//! Planning module for descriptor reconciliation.
//!
//! Each planner compares declared resources against a desired layout or an
//! observed table shape and produces a [`Plan`]. Planners hold their inputs
//! only; running one twice yields the same plan.

mod bootstrap;
mod index;
mod relocation;
mod synchronization;

pub use bootstrap::BootstrapPlanner;
pub use index::ColumnIndex;
pub use relocation::RelocationPlanner;
pub use synchronization::SynchronizationPlanner;

use crate::error::Result;
use crate::plan::Plan;

/// Produces a plan from the inputs captured at construction.
pub trait ActionPlanner {
    /// Computes the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a path template cannot be resolved, an action
    /// cannot be constructed, or the inputs conflict.
    fn plan(&self) -> Result<Plan>;
}
