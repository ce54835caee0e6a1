use crate::gate::ShallowEq;
use std::sync::Arc;
use tracing::trace;

/// Captured store state compared by reference, one entry per store.
pub trait SnapshotSet {
    /// True when every entry still points at the same snapshot.
    fn same_snapshots(&self, other: &Self) -> bool;

    /// Aliases whose snapshot reference differs from `other`.
    fn changed_aliases(&self, other: &Self) -> Vec<&'static str>;
}

impl<T: ?Sized> SnapshotSet for Arc<T> {
    fn same_snapshots(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }

    fn changed_aliases(&self, other: &Self) -> Vec<&'static str> {
        if self.same_snapshots(other) {
            Vec::new()
        } else {
            vec!["store"]
        }
    }
}

/// Whether a wrapped view has to render again.
///
/// True iff some snapshot reference moved between `prev_state` and
/// `next_state`, or some caller prop differs between `prev_props` and
/// `next_props`. A `false` never loses data: `next_state` stays the
/// binder's latest state and is what the next render will use.
pub fn should_update<S, P>(prev_state: &S, next_state: &S, prev_props: &P, next_props: &P) -> bool
where
    S: SnapshotSet + ?Sized,
    P: ShallowEq + ?Sized,
{
    let state_changed = !next_state.same_snapshots(prev_state);
    let props_changed = !next_props.shallow_eq(prev_props);
    trace!(state_changed, props_changed, "update gate evaluated");
    state_changed || props_changed
}
