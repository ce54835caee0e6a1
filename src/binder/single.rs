use crate::binder::lifecycle::{Inbox, Subscriptions};
use crate::binder::BindOptions;
use crate::component::Component;
use crate::error::BindError;
use crate::gate::{self, ShallowEq};
use crate::store::{Snapshot, StoreDefinition};
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

const STORE_ALIAS: &str = "store";

/// Props handed to a view wrapped by [`Binder`]: the caller's props plus
/// the latest captured snapshot under `store`.
///
/// Derefs to the caller's props.
#[derive(Debug)]
pub struct WithStore<P, S> {
    pub props: P,
    pub store: Snapshot<S>,
}

impl<P, S> Deref for WithStore<P, S> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.props
    }
}

impl<P: Clone, S> Clone for WithStore<P, S> {
    fn clone(&self) -> Self {
        Self {
            props: self.props.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<P: ShallowEq, S> ShallowEq for WithStore<P, S> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store) && self.props.shallow_eq(&other.props)
    }
}

/// Binds one store to a view.
///
/// The binder accepts the view's props minus `store` and supplies `store`
/// itself. It re-renders only when it captured a new snapshot or when a
/// caller prop changed.
///
/// # Example
///
/// ```
/// use serde::Serialize;
/// use tincan_connect::{connect, view, Cycle, Mount, Store, WithStore};
///
/// #[derive(Clone, Serialize)]
/// struct Counter {
///     count: i32,
/// }
///
/// let store = Store::new(Counter { count: 0 });
/// let label = view(|p: &WithStore<(), Counter>| format!("count = {}", p.store.count));
/// let mut mount = Mount::new(connect(store.clone(), label).unwrap(), ());
/// assert_eq!(mount.output(), "count = 0");
///
/// store.update("count", |c| c.count = 0).unwrap();
/// assert_eq!(mount.flush(), Cycle::Idle);
///
/// store.update("count", |c| c.count = 1).unwrap();
/// assert_eq!(mount.flush(), Cycle::Rendered);
/// assert_eq!(mount.output(), "count = 1");
/// ```
pub struct Binder<St: StoreDefinition, V> {
    store: St,
    view: V,
    state: Snapshot<St::State>,
    rendered: Snapshot<St::State>,
    subscriptions: Subscriptions,
    inbox: Inbox,
    child_dirty: bool,
    name: Cow<'static, str>,
}

/// Bind `store` to `view` with default options.
pub fn connect<St, V>(store: St, view: V) -> Result<Binder<St, V>, BindError>
where
    St: StoreDefinition,
    V: Component,
{
    Binder::new(store, view)
}

impl<St, V> Binder<St, V>
where
    St: StoreDefinition,
    V: Component,
{
    pub fn new(store: St, view: V) -> Result<Self, BindError> {
        Self::with_options(store, view, BindOptions::default())
    }

    /// Capture the current snapshot, then subscribe to the store.
    pub fn with_options(store: St, view: V, options: BindOptions) -> Result<Self, BindError> {
        let name = options.resolve_name(&view.display_name());
        let state = store.snapshot();
        let inbox = Inbox::new();
        let subscriptions = Subscriptions::open(&[STORE_ALIAS], |alias| {
            store.on_change(inbox.listener(alias))
        })?;
        debug!(binder = %name, "binder mounted");

        Ok(Self {
            store,
            view,
            rendered: Arc::clone(&state),
            state,
            subscriptions,
            inbox,
            child_dirty: false,
            name,
        })
    }

    /// The snapshot the binder currently holds.
    pub fn snapshot(&self) -> &Snapshot<St::State> {
        &self.state
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Live subscriptions held by this instance: one while mounted, zero
    /// after teardown.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.is_live()
    }
}

impl<St, V, P> Component for Binder<St, V>
where
    St: StoreDefinition,
    V: Component<Props = WithStore<P, St::State>>,
    P: ShallowEq + Clone,
{
    type Props = P;
    type Output = V::Output;

    fn display_name(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    fn poll(&mut self) -> bool {
        if !self.subscriptions.is_live() {
            return false;
        }

        let mut applied = false;
        for refresh in self.inbox.drain() {
            self.state = self.store.snapshot();
            applied = true;
            debug!(binder = %self.name, key = %refresh.key, "captured new snapshot");
        }

        let child = self.view.poll();
        self.child_dirty |= child;
        applied || child
    }

    fn should_update(&self, prev: &P, next: &P) -> bool {
        self.child_dirty || gate::should_update(&self.rendered, &self.state, prev, next)
    }

    fn render(&mut self, props: &P) -> V::Output {
        self.rendered = Arc::clone(&self.state);
        self.child_dirty = false;
        let merged = WithStore {
            props: props.clone(),
            store: Arc::clone(&self.state),
        };
        self.view.render(&merged)
    }

    fn unmount(&mut self) -> Result<(), BindError> {
        let released = self.subscriptions.release_all();
        let dropped = self.inbox.discard();
        debug!(binder = %self.name, dropped, "binder unmounted");
        let child = self.view.unmount();
        released.and(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::view;
    use crate::error::StoreError;
    use crate::store::{Listener, Store, Subscription};
    use serde::Serialize;

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Counter {
        count: i32,
        label: String,
    }

    fn counter_store() -> Store<Counter> {
        Store::new(Counter {
            count: 0,
            label: "clicks".to_string(),
        })
    }

    fn count_view() -> impl Component<Props = WithStore<(u8,), Counter>, Output = i32> {
        view(|p: &WithStore<(u8,), Counter>| p.store.count + i32::from(p.0))
    }

    /// Forwards to a real store, but every release reports the listener
    /// as already gone after detaching it.
    struct StuckStore(Store<Counter>);

    impl StoreDefinition for StuckStore {
        type State = Counter;

        fn snapshot(&self) -> Snapshot<Counter> {
            self.0.snapshot()
        }

        fn on_change(&self, listener: Listener) -> Result<Subscription, StoreError> {
            let inner = self.0.on_change(listener)?;
            let id = inner.id();
            Ok(Subscription::new(id, move || {
                inner.unsubscribe()?;
                Err(StoreError::UnknownListener(id))
            }))
        }
    }

    #[test]
    fn captures_snapshot_and_subscribes_on_construction() {
        let store = counter_store();
        let binder = connect(store.clone(), count_view()).unwrap();

        assert!(Arc::ptr_eq(binder.snapshot(), &store.snapshot()));
        assert_eq!(binder.subscription_count(), 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn unchanged_value_is_ignored() {
        let store = counter_store();
        let mut binder = connect(store.clone(), count_view()).unwrap();
        let before = Arc::clone(binder.snapshot());

        store.update("count", |c| c.count = 0).unwrap();

        assert!(!binder.poll());
        assert!(Arc::ptr_eq(binder.snapshot(), &before));
        assert!(!binder.should_update(&(0,), &(0,)));
    }

    #[test]
    fn real_change_captures_fresh_snapshot() {
        let store = counter_store();
        let mut binder = connect(store.clone(), count_view()).unwrap();
        let before = Arc::clone(binder.snapshot());

        store.update("count", |c| c.count = 1).unwrap();

        assert!(binder.poll());
        assert!(!Arc::ptr_eq(binder.snapshot(), &before));
        assert_eq!(binder.snapshot().count, 1);
        assert!(binder.should_update(&(0,), &(0,)));
        assert_eq!(binder.render(&(0,)), 1);
        assert!(!binder.should_update(&(0,), &(0,)));
    }

    #[test]
    fn prop_change_alone_opens_gate() {
        let store = counter_store();
        let binder = connect(store, count_view()).unwrap();

        assert!(binder.should_update(&(1,), &(2,)));
        assert!(!binder.should_update(&(1,), &(1,)));
    }

    #[test]
    fn render_merges_props_and_store() {
        let store = counter_store();
        let mut binder = connect(store, count_view()).unwrap();
        assert_eq!(binder.render(&(5,)), 5);
    }

    #[test]
    fn unmount_releases_and_stops_updates() {
        let store = counter_store();
        let mut binder = connect(store.clone(), count_view()).unwrap();
        store.update("count", |c| c.count = 9).unwrap();

        binder.unmount().unwrap();
        assert_eq!(store.listener_count(), 0);
        assert_eq!(binder.subscription_count(), 0);
        assert!(!binder.is_mounted());

        store.update("count", |c| c.count = 10).unwrap();
        assert!(!binder.poll());
        assert_eq!(binder.snapshot().count, 0);

        binder.unmount().unwrap();
    }

    #[test]
    fn drop_releases_subscription() {
        let store = counter_store();
        drop(connect(store.clone(), count_view()).unwrap());
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn change_to_untargeted_field_still_refreshes() {
        let store = counter_store();
        let label = view(|p: &WithStore<(), Counter>| p.store.label.clone());
        let mut binder = connect(store.clone(), label).unwrap();

        store
            .update("count", |c| c.label = "taps".to_string())
            .unwrap();

        assert!(binder.poll());
        assert!(binder.should_update(&(), &()));
        assert_eq!(binder.render(&()), "taps");
    }

    #[test]
    fn failed_release_surfaces_from_unmount() {
        let store = counter_store();
        let mut binder = connect(StuckStore(store.clone()), count_view()).unwrap();
        assert_eq!(store.listener_count(), 1);

        let err = binder.unmount().unwrap_err();
        assert!(matches!(
            err,
            BindError::Release {
                alias: "store",
                source: StoreError::UnknownListener(_)
            }
        ));
        assert!(!binder.is_mounted());
        assert_eq!(store.listener_count(), 0);

        // Teardown already ran; nothing left to fail.
        binder.unmount().unwrap();
    }

    #[test]
    fn display_name_wraps_view_name() {
        let store = counter_store();
        let named = view(|_: &WithStore<(), Counter>| ()).named("Counter");
        let binder = connect(store.clone(), named).unwrap();
        assert_eq!(binder.display_name(), "withStore(Counter)");

        let options = BindOptions::new().display_name("Panel");
        let binder = Binder::with_options(store, view(|_: &WithStore<(), Counter>| ()), options)
            .unwrap();
        assert_eq!(binder.display_name(), "Panel");
    }
}
