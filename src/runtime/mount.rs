use crate::component::Component;
use crate::error::BindError;
use tracing::{debug, error, trace};

/// Outcome of one update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// Nothing was pending; the gate was not consulted.
    Idle,
    /// The gate was consulted and declined to render.
    Skipped,
    /// The gate was consulted and the component rendered.
    Rendered,
}

/// Counters describing the gate's decisions over a mount's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Times the gate was consulted.
    pub evaluations: usize,
    /// Renders, including the initial one.
    pub renders: usize,
    pub skips: usize,
}

/// A mounted component and the props it was last given.
///
/// Mounting renders once. Afterwards the host calls [`Mount::flush`] when
/// stores may have changed and [`Mount::set_props`] when the parent passes
/// new props. Dropping a `Mount` unmounts it.
pub struct Mount<C: Component> {
    component: C,
    props: C::Props,
    output: C::Output,
    stats: RenderStats,
    unmounted: bool,
}

impl<C: Component> Mount<C> {
    /// Mount `component` with its initial props and render it.
    pub fn new(mut component: C, props: C::Props) -> Self {
        let output = component.render(&props);
        debug!(component = %component.display_name(), "mounted");
        Self {
            component,
            props,
            output,
            stats: RenderStats {
                renders: 1,
                ..RenderStats::default()
            },
            unmounted: false,
        }
    }

    /// Apply pending state updates and, if any landed, ask the gate once
    /// whether to render with the current props.
    pub fn flush(&mut self) -> Cycle {
        if !self.component.poll() {
            return Cycle::Idle;
        }
        let go = self.component.should_update(&self.props, &self.props);
        self.finish(go)
    }

    /// Hand the component new props. The gate is always consulted, and the
    /// new props are kept whether or not it renders.
    pub fn set_props(&mut self, next: C::Props) -> Cycle {
        self.component.poll();
        let go = self.component.should_update(&self.props, &next);
        self.props = next;
        self.finish(go)
    }

    fn finish(&mut self, go: bool) -> Cycle {
        self.stats.evaluations += 1;
        if go {
            self.output = self.component.render(&self.props);
            self.stats.renders += 1;
            trace!(component = %self.component.display_name(), "rendered");
            Cycle::Rendered
        } else {
            self.stats.skips += 1;
            trace!(component = %self.component.display_name(), "render skipped");
            Cycle::Skipped
        }
    }

    /// Output of the most recent render.
    pub fn output(&self) -> &C::Output {
        &self.output
    }

    pub fn props(&self) -> &C::Props {
        &self.props
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Tear the component down, returning any release failure.
    pub fn unmount(mut self) -> Result<(), BindError> {
        self.unmounted = true;
        debug!(component = %self.component.display_name(), "unmounting");
        self.component.unmount()
    }
}

impl<C: Component> Drop for Mount<C> {
    fn drop(&mut self) {
        if self.unmounted {
            return;
        }
        if let Err(err) = self.component.unmount() {
            error!(
                component = %self.component.display_name(),
                error = %err,
                "unmount on drop failed"
            );
        }
    }
}
