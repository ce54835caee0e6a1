//! Minimal host runtime for mounted components.
//!
//! [`Mount`] plays the part of the UI framework: it owns one mounted
//! component tree, runs its update cycle, and records what the update gate
//! decided on each pass.

mod mount;

pub use mount::{Cycle, Mount, RenderStats};
