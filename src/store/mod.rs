//! Store side of the binding contract.
//!
//! A store is anything implementing [`StoreDefinition`]: it hands out an
//! immutable [`Snapshot`] of its state and lets observers attach a
//! [`Listener`] to its stream of [`ChangeEvent`]s. Binders only observe
//! stores; a store's lifecycle belongs to whoever created it.
//!
//! [`Store`] is a ready-made implementation with per-field change events.

mod definition;
mod store;
mod subscription;

pub use definition::{ChangeEvent, Listener, Snapshot, StoreDefinition};
pub use store::Store;
pub use subscription::Subscription;
