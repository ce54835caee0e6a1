//! # Tincan Connect
//!
//! Bind reactive stores to view components so a view re-renders when the
//! store data it depends on changes, and is skipped otherwise.
//!
//! ## Stores
//!
//! Anything implementing [`StoreDefinition`] can be bound:
//! - `snapshot()` - the current immutable [`Snapshot`] (an `Arc`)
//! - `on_change()` - a cancelable stream of per-field [`ChangeEvent`]s
//!
//! [`Store<T>`] is a thread-safe implementation with per-field updates.
//!
//! ## Binders
//!
//! - [`connect`] wraps a view so it receives one store's snapshot as `store`
//! - [`connect_as`] wraps a view so it receives several aliased snapshots,
//!   declared with [`store_set!`]
//!
//! Binders drop change events whose old and new values are structurally
//! equal, capture a fresh snapshot for every other event, and only
//! re-render when a snapshot reference or a caller prop actually changed.
//!
//! ## Hosting
//!
//! Binders and views implement [`Component`]. [`Mount`] drives the update
//! cycle the way a UI framework would, and reports each gate decision.

pub mod binder;
pub mod component;
pub mod error;
pub mod gate;
pub mod runtime;
pub mod store;

// Re-export main types for convenience
pub use binder::{
    connect, connect_as, BindOptions, Binder, MultiBinder, StoreSet, WithStore, WithStores,
};
pub use component::{view, Component, FnView};
pub use error::{BindError, StoreError};
pub use gate::{should_update, structurally_equal, PropEq, ShallowEq, SnapshotSet};
pub use runtime::{Cycle, Mount, RenderStats};
pub use store::{ChangeEvent, Listener, Snapshot, Store, StoreDefinition, Subscription};
