//! The update gate: when a change is real, and when a re-render is needed.
//!
//! Two independent comparisons feed the decision:
//! - store events are filtered by [`structurally_equal`] before they touch
//!   binder state
//! - the render decision compares snapshots by reference
//!   ([`SnapshotSet`]) and caller props shallowly ([`ShallowEq`])

mod equality;
mod policy;
mod props;

pub use equality::structurally_equal;
pub use policy::{should_update, SnapshotSet};
pub use props::{PropEq, ShallowEq};
