use crate::error::StoreError;
use crate::gate::structurally_equal;
use crate::store::Subscription;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Immutable point-in-time copy of a store's state.
///
/// Every observed change produces a new `Arc`, so two snapshots can be
/// compared by reference with [`Arc::ptr_eq`].
pub type Snapshot<T> = Arc<T>;

/// Callback attached to a store's change stream.
pub type Listener = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

/// A single field mutation reported by a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub key: String,
    pub previous_value: Value,
    pub value: Value,
}

impl ChangeEvent {
    pub fn new(key: impl Into<String>, previous_value: Value, value: Value) -> Self {
        Self {
            key: key.into(),
            previous_value,
            value,
        }
    }

    /// True when the mutation left the field structurally unchanged.
    pub fn is_noop(&self) -> bool {
        structurally_equal(&self.previous_value, &self.value)
    }
}

/// Contract a store must satisfy to be bound to a view.
///
/// Implementations must install a new snapshot before notifying listeners,
/// and must deliver events to a listener in the order they were emitted.
pub trait StoreDefinition {
    type State: Send + Sync + 'static;

    /// The latest snapshot. Readable at any time.
    fn snapshot(&self) -> Snapshot<Self::State>;

    /// Attach `listener` to the change stream until the returned
    /// [`Subscription`] is released.
    fn on_change(&self, listener: Listener) -> Result<Subscription, StoreError>;
}

impl<S: StoreDefinition + ?Sized> StoreDefinition for &S {
    type State = S::State;

    fn snapshot(&self) -> Snapshot<Self::State> {
        (**self).snapshot()
    }

    fn on_change(&self, listener: Listener) -> Result<Subscription, StoreError> {
        (**self).on_change(listener)
    }
}
