//! Binders: components that feed store snapshots to a wrapped view.
//!
//! - [`Binder`] binds one store and hands the view a [`WithStore`].
//! - [`MultiBinder`] binds a [`StoreSet`] of aliased stores and hands the
//!   view a [`WithStores`].
//!
//! Both follow the same lifecycle. Construction captures the current
//! snapshot(s) and opens one subscription per store. Store listeners never
//! touch binder state: they post a refresh message to the binder's inbox,
//! and the binder applies those messages when the host polls it. Teardown
//! releases every subscription exactly once, whether through
//! [`Component::unmount`](crate::Component::unmount) or by dropping.

mod lifecycle;
mod multi;
mod options;
mod single;

pub use multi::{connect_as, MultiBinder, StoreSet, WithStores};
pub use options::BindOptions;
pub use single::{connect, Binder, WithStore};
