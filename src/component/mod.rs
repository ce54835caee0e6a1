//! Host-side component protocol.
//!
//! Binders and plain views both implement [`Component`], so they nest
//! freely: a binder can wrap a view, another binder, or anything else that
//! speaks the protocol. The lifecycle, as driven by
//! [`Mount`](crate::runtime::Mount), is:
//!
//! 1. construction with initial props, followed by a first `render`
//! 2. `poll` to apply queued state updates
//! 3. `should_update` to decide whether the next `render` is needed
//! 4. `unmount`, exactly once
//!
//! All of it runs on one thread; nothing here blocks.

use crate::error::BindError;
use std::borrow::Cow;
use std::marker::PhantomData;

/// A mountable view component.
pub trait Component {
    type Props;
    type Output;

    /// Name used in logs and in wrapper names such as `withStore(Counter)`.
    fn display_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }

    /// Apply queued state updates. Returns true if local state changed.
    fn poll(&mut self) -> bool {
        false
    }

    /// Whether moving from `prev` to `next` props, with the state applied by
    /// the last `poll`, requires a render.
    fn should_update(&self, _prev: &Self::Props, _next: &Self::Props) -> bool {
        true
    }

    fn render(&mut self, props: &Self::Props) -> Self::Output;

    /// Release everything the component holds.
    fn unmount(&mut self) -> Result<(), BindError> {
        Ok(())
    }
}

/// A stateless component backed by a render closure.
pub struct FnView<F, P> {
    render: F,
    name: Option<Cow<'static, str>>,
    _props: PhantomData<fn(&P)>,
}

/// Lift a render closure into a [`Component`].
///
/// # Example
///
/// ```
/// use tincan_connect::{view, Component};
///
/// let mut greeting = view(|name: &String| format!("hello {name}"));
/// assert_eq!(greeting.render(&"ada".to_string()), "hello ada");
/// ```
pub fn view<P, O, F>(render: F) -> FnView<F, P>
where
    F: FnMut(&P) -> O,
{
    FnView {
        render,
        name: None,
        _props: PhantomData,
    }
}

impl<F, P> FnView<F, P> {
    /// Give the view a display name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<P, O, F> Component for FnView<F, P>
where
    F: FnMut(&P) -> O,
{
    type Props = P;
    type Output = O;

    fn display_name(&self) -> Cow<'static, str> {
        self.name.clone().unwrap_or(Cow::Borrowed("View"))
    }

    fn render(&mut self, props: &P) -> O {
        (self.render)(props)
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
