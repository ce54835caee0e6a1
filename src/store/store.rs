use crate::error::StoreError;
use crate::store::{ChangeEvent, Listener, Snapshot, StoreDefinition, Subscription};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock, Weak};
use tracing::trace;

type SharedListener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, SharedListener)>,
}

impl Listeners {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// A thread-safe store emitting one [`ChangeEvent`] per field mutation.
///
/// Every mutation installs a new [`Snapshot`], so binders can tell changes
/// apart by reference. The store never filters its own events: writing a
/// field back to the value it already had still emits.
pub struct Store<T> {
    state: Arc<RwLock<Snapshot<T>>>,
    listeners: Arc<RwLock<Listeners>>,
}

impl<T> Store<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(Arc::new(initial))),
            listeners: Arc::new(RwLock::new(Listeners::default())),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> Result<T, StoreError> {
        self.read(T::clone)
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&state))
    }

    /// Mutate the state through `f`, naming `key` as the field it targets.
    ///
    /// Always emits one event for `key`, carrying the serialized field value
    /// before and after. Any other top-level field the closure changed gets
    /// its own event after it, so no mutation goes unreported.
    pub fn update<F>(&self, key: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut T),
    {
        let events = {
            let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
            let before = serde_json::to_value(&**state)?;
            let mut next = T::clone(&state);
            f(&mut next);
            let after = serde_json::to_value(&next)?;
            *state = Arc::new(next);
            keyed_changes(key, before, after)
        };
        trace!(key, events = events.len(), "state updated");
        self.emit(&events)
    }

    /// Replace the whole state.
    ///
    /// Emits one event per top-level field present before or after. A state
    /// that does not serialize to an object emits a single event with an
    /// empty key.
    pub fn set(&self, new_state: T) -> Result<(), StoreError> {
        let events = {
            let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
            let before = serde_json::to_value(&**state)?;
            let after = serde_json::to_value(&new_state)?;
            *state = Arc::new(new_state);
            field_changes(before, after)
        };
        self.emit(&events)
    }

    /// Attach a listener to the change stream.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write().map_err(|_| StoreError::Poisoned)?;
        let id = listeners.next_id;
        listeners.next_id += 1;
        let listener: SharedListener = Arc::new(callback);
        listeners.entries.push((id, listener));
        trace!(listener = id, "listener attached");

        let registry = Arc::downgrade(&self.listeners);
        Ok(Subscription::new(id, move || release(&registry, id)))
    }

    /// Number of listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .map(|listeners| listeners.entries.len())
            .unwrap_or(0)
    }

    /// Notify listeners, in registration order, outside of any lock.
    ///
    /// A listener released while an emission is in flight is skipped for
    /// the rest of it.
    fn emit(&self, events: &[ChangeEvent]) -> Result<(), StoreError> {
        let listeners: Vec<(u64, SharedListener)> = {
            let listeners = self.listeners.read().map_err(|_| StoreError::Poisoned)?;
            listeners
                .entries
                .iter()
                .map(|(id, listener)| (*id, Arc::clone(listener)))
                .collect()
        };

        for event in events {
            trace!(key = %event.key, listeners = listeners.len(), "emitting change");
            for (id, listener) in &listeners {
                let live = self
                    .listeners
                    .read()
                    .map_err(|_| StoreError::Poisoned)?
                    .contains(*id);
                if live {
                    listener(event);
                }
            }
        }
        Ok(())
    }
}

impl<T> StoreDefinition for Store<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    type State = T;

    fn snapshot(&self) -> Snapshot<T> {
        // A poisoned state lock still holds the last installed snapshot.
        match self.state.read() {
            Ok(state) => Arc::clone(&state),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn on_change(&self, listener: Listener) -> Result<Subscription, StoreError> {
        self.subscribe(listener)
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Store");
        match self.state.read() {
            Ok(state) => out.field("state", &**state),
            Err(_) => out.field("state", &"<poisoned>"),
        };
        out.finish()
    }
}

fn release(registry: &Weak<RwLock<Listeners>>, id: u64) -> Result<(), StoreError> {
    // Store already gone, nothing left to detach from.
    let Some(listeners) = registry.upgrade() else {
        return Ok(());
    };
    let mut listeners = listeners.write().map_err(|_| StoreError::Poisoned)?;
    let position = listeners
        .entries
        .iter()
        .position(|(entry, _)| *entry == id)
        .ok_or(StoreError::UnknownListener(id))?;
    listeners.entries.remove(position);
    trace!(listener = id, "listener released");
    Ok(())
}

/// The event for `key` first, then one for every other field that moved.
fn keyed_changes(key: &str, before: Value, after: Value) -> Vec<ChangeEvent> {
    match (before, after) {
        (Value::Object(mut before), Value::Object(mut after)) => {
            let previous_value = before.remove(key).unwrap_or(Value::Null);
            let value = after.remove(key).unwrap_or(Value::Null);
            let mut events = vec![ChangeEvent::new(key, previous_value, value)];
            events.extend(
                field_changes(Value::Object(before), Value::Object(after))
                    .into_iter()
                    .filter(|event| !event.is_noop()),
            );
            events
        }
        (previous_value, value) => vec![ChangeEvent::new(key, previous_value, value)],
    }
}

fn field_changes(before: Value, after: Value) -> Vec<ChangeEvent> {
    match (before, after) {
        (Value::Object(before), Value::Object(mut after)) => {
            let mut events = Vec::with_capacity(before.len().max(after.len()));
            for (key, previous_value) in before {
                let value = after.remove(&key).unwrap_or(Value::Null);
                events.push(ChangeEvent::new(key, previous_value, value));
            }
            for (key, value) in after {
                events.push(ChangeEvent::new(key, Value::Null, value));
            }
            events
        }
        (previous_value, value) => vec![ChangeEvent::new("", previous_value, value)],
    }
}
