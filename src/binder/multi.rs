use crate::binder::lifecycle::{Inbox, Subscriptions};
use crate::binder::BindOptions;
use crate::component::Component;
use crate::error::{BindError, StoreError};
use crate::gate::{self, ShallowEq, SnapshotSet};
use crate::store::{Listener, Subscription};
use std::borrow::Cow;
use std::ops::Deref;
use tracing::{debug, trace};

/// A fixed set of stores, each bound under an alias.
///
/// Usually declared with [`store_set!`](crate::store_set), which generates
/// the stores struct together with its aliased snapshot struct.
pub trait StoreSet {
    /// One snapshot per alias.
    type Snapshots: SnapshotSet + Clone;

    /// Aliases in declaration order.
    fn aliases(&self) -> &'static [&'static str];

    /// Snapshot every store as it is now.
    fn capture(&self) -> Self::Snapshots;

    /// Subscribe to the store bound under `alias`.
    fn on_change(&self, alias: &str, listener: Listener) -> Result<Subscription, StoreError>;

    /// A copy of `current` where only `alias` holds that store's latest
    /// snapshot. Every other entry keeps its reference. Unknown aliases
    /// return an unchanged copy.
    fn refresh(&self, current: &Self::Snapshots, alias: &str) -> Self::Snapshots;
}

/// Props handed to a view wrapped by [`MultiBinder`]: the caller's props
/// plus one snapshot per alias under `stores`.
///
/// Derefs to the caller's props.
#[derive(Clone, Debug)]
pub struct WithStores<P, S> {
    pub props: P,
    pub stores: S,
}

impl<P, S> Deref for WithStores<P, S> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.props
    }
}

impl<P: ShallowEq, S: SnapshotSet> ShallowEq for WithStores<P, S> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.stores.same_snapshots(&other.stores) && self.props.shallow_eq(&other.props)
    }
}

/// Binds several aliased stores to one view.
///
/// Holds one subscription per store. A change in one store replaces only
/// that alias's snapshot, so unrelated stores never open the gate.
pub struct MultiBinder<Set: StoreSet, V> {
    stores: Set,
    view: V,
    state: Set::Snapshots,
    rendered: Set::Snapshots,
    subscriptions: Subscriptions,
    inbox: Inbox,
    child_dirty: bool,
    name: Cow<'static, str>,
}

/// Bind every store in `stores` to `view` with default options.
pub fn connect_as<Set, V>(stores: Set, view: V) -> Result<MultiBinder<Set, V>, BindError>
where
    Set: StoreSet,
    V: Component,
{
    MultiBinder::new(stores, view)
}

impl<Set, V> MultiBinder<Set, V>
where
    Set: StoreSet,
    V: Component,
{
    pub fn new(stores: Set, view: V) -> Result<Self, BindError> {
        Self::with_options(stores, view, BindOptions::default())
    }

    /// Capture every snapshot, then subscribe to every store in alias order.
    pub fn with_options(stores: Set, view: V, options: BindOptions) -> Result<Self, BindError> {
        let name = options.resolve_name(&view.display_name());
        let state = stores.capture();
        let inbox = Inbox::new();
        let subscriptions = Subscriptions::open(stores.aliases(), |alias| {
            stores.on_change(alias, inbox.listener(alias))
        })?;
        debug!(binder = %name, stores = subscriptions.len(), "binder mounted");

        Ok(Self {
            stores,
            view,
            rendered: state.clone(),
            state,
            subscriptions,
            inbox,
            child_dirty: false,
            name,
        })
    }

    /// The aliased snapshots the binder currently holds.
    pub fn snapshots(&self) -> &Set::Snapshots {
        &self.state
    }

    pub fn stores(&self) -> &Set {
        &self.stores
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.is_live()
    }
}

impl<Set, V, P> Component for MultiBinder<Set, V>
where
    Set: StoreSet,
    V: Component<Props = WithStores<P, Set::Snapshots>>,
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
            self.state = self.stores.refresh(&self.state, refresh.alias);
            applied = true;
            debug!(
                binder = %self.name,
                store = refresh.alias,
                key = %refresh.key,
                "captured new snapshot"
            );
        }

        let child = self.view.poll();
        self.child_dirty |= child;
        applied || child
    }

    fn should_update(&self, prev: &P, next: &P) -> bool {
        trace!(
            binder = %self.name,
            changed = ?self.state.changed_aliases(&self.rendered),
            "comparing snapshots"
        );
        self.child_dirty || gate::should_update(&self.rendered, &self.state, prev, next)
    }

    fn render(&mut self, props: &P) -> V::Output {
        self.rendered = self.state.clone();
        self.child_dirty = false;
        let merged = WithStores {
            props: props.clone(),
            stores: self.state.clone(),
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

/// Declare a set of aliased stores and the snapshot struct a bound view
/// receives for it.
///
/// Each alias becomes a field of both structs: the store on the first, its
/// [`Snapshot`](crate::Snapshot) on the second.
///
/// ```
/// use serde::Serialize;
/// use tincan_connect::{store_set, Store, StoreSet};
///
/// #[derive(Clone, Serialize)]
/// struct Counter { count: i32 }
///
/// #[derive(Clone, Serialize)]
/// struct User { name: String }
///
/// store_set! {
///     pub struct AppStores => AppSnapshots {
///         counter: Store<Counter>,
///         user: Store<User>,
///     }
/// }
///
/// let stores = AppStores {
///     counter: Store::new(Counter { count: 1 }),
///     user: Store::new(User { name: "ada".into() }),
/// };
/// assert_eq!(stores.aliases(), &["counter", "user"]);
///
/// let snapshots: AppSnapshots = stores.capture();
/// assert_eq!(snapshots.counter.count, 1);
/// assert_eq!(snapshots.user.name, "ada");
/// ```
#[macro_export]
macro_rules! store_set {
    (
        $(#[$meta:meta])*
        $vis:vis struct $stores:ident => $snapshots:ident {
            $($alias:ident : $store:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        $vis struct $stores {
            $(pub $alias: $store,)+
        }

        #[derive(Clone)]
        $vis struct $snapshots {
            $(pub $alias: $crate::Snapshot<<$store as $crate::StoreDefinition>::State>,)+
        }

        impl $crate::SnapshotSet for $snapshots {
            fn same_snapshots(&self, other: &Self) -> bool {
                true $(&& ::std::sync::Arc::ptr_eq(&self.$alias, &other.$alias))+
            }

            fn changed_aliases(&self, other: &Self) -> ::std::vec::Vec<&'static str> {
                let mut changed = ::std::vec::Vec::new();
                $(
                    if !::std::sync::Arc::ptr_eq(&self.$alias, &other.$alias) {
                        changed.push(::std::stringify!($alias));
                    }
                )+
                changed
            }
        }

        impl $crate::StoreSet for $stores {
            type Snapshots = $snapshots;

            fn aliases(&self) -> &'static [&'static str] {
                &[$(::std::stringify!($alias)),+]
            }

            fn capture(&self) -> $snapshots {
                $snapshots {
                    $($alias: $crate::StoreDefinition::snapshot(&self.$alias),)+
                }
            }

            fn on_change(
                &self,
                alias: &str,
                listener: $crate::Listener,
            ) -> ::std::result::Result<$crate::Subscription, $crate::StoreError> {
                match alias {
                    $(::std::stringify!($alias) => $crate::StoreDefinition::on_change(&self.$alias, listener),)+
                    other => ::std::result::Result::Err($crate::StoreError::UnknownAlias(other.to_string())),
                }
            }

            fn refresh(&self, current: &$snapshots, alias: &str) -> $snapshots {
                let mut next = ::std::clone::Clone::clone(current);
                match alias {
                    $(::std::stringify!($alias) => next.$alias = $crate::StoreDefinition::snapshot(&self.$alias),)+
                    _ => {}
                }
                next
            }
        }
    };
}
