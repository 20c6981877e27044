//! The build context, the render scheduler and the runtime.
//!
//! A [`Runtime`] owns everything mutable: the backend, the retained render
//! tree and the [`BuildCtx`] holding the active-state map. A build pass is
//! strictly synchronous and single-threaded; the scheduler only records that
//! a pass is wanted, and the embedder drives it by pumping the runtime at an
//! idle point.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::app::App;
use crate::backend::{Backend, FiredEvent};
use crate::error::Error;
use crate::key::Key;
use crate::node::{RenderNode, update_node};
use crate::state::AnyState;
use crate::widget::{RenderWidget, Widget};

/// Default bound on build-loop iterations.
pub const DEFAULT_MAX_BUILD_ITERATIONS: usize = 500;

/// Tunable knobs of a [`Runtime`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How many expansion steps [`BuildCtx::build`] may take before the pass
    /// fails with [`Error::TooManyBuildIterations`].
    pub max_build_iterations: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_build_iterations: DEFAULT_MAX_BUILD_ITERATIONS,
        }
    }
}

#[derive(Debug, Default)]
struct SchedulerInner {
    building: bool,
    render_pending: bool,
}

/// Shared handle to the render scheduler.
///
/// The scheduler has two jobs: coalescing re-render requests (states
/// `Idle` / `RenderPending`, with at most one pending pass no matter how
/// many requests arrive) and guarding against re-entrant build passes.
#[derive(Debug, Clone)]
pub struct SchedulerHandle(Rc<RefCell<SchedulerInner>>);

impl SchedulerHandle {
    pub(crate) fn new() -> Self {
        Self(Rc::new(RefCell::new(SchedulerInner::default())))
    }

    /// Requests a re-render at the next idle point.
    pub fn request_render(&self) {
        let mut inner = self.0.borrow_mut();
        if inner.render_pending {
            trace!("render already pending, request coalesced");
        } else {
            inner.render_pending = true;
            trace!("render scheduled");
        }
    }

    /// Returns `true` while a coalesced re-render is waiting to run.
    #[must_use]
    pub fn is_render_pending(&self) -> bool {
        self.0.borrow().render_pending
    }

    /// Returns `true` while a build pass is in flight.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.0.borrow().building
    }

    pub(crate) fn take_render_request(&self) -> bool {
        let mut inner = self.0.borrow_mut();
        std::mem::take(&mut inner.render_pending)
    }

    pub(crate) fn begin_build(&self) {
        let mut inner = self.0.borrow_mut();
        assert!(!inner.building, "a build pass is already in flight");
        inner.building = true;
    }

    pub(crate) fn end_build(&self) {
        self.0.borrow_mut().building = false;
    }
}

/// Clears the building flag when a pass ends, on success and on error alike.
struct BuildGuard {
    scheduler: SchedulerHandle,
}

impl BuildGuard {
    fn begin(scheduler: &SchedulerHandle) -> Self {
        scheduler.begin_build();
        Self {
            scheduler: scheduler.clone(),
        }
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        self.scheduler.end_build();
    }
}

/// The context threaded through every build call.
///
/// Owns the active-state map: states created or reused during the current
/// pass accumulate in a second map, which atomically replaces the active
/// one when the pass commits. States whose key did not reappear are dropped
/// with the old map.
pub struct BuildCtx {
    active: HashMap<Key, AnyState>,
    next: HashMap<Key, AnyState>,
    scheduler: SchedulerHandle,
    max_iterations: usize,
}

impl BuildCtx {
    pub(crate) fn new(config: &RuntimeConfig) -> Self {
        Self {
            active: HashMap::new(),
            next: HashMap::new(),
            scheduler: SchedulerHandle::new(),
            max_iterations: config.max_build_iterations,
        }
    }

    /// A handle to the runtime scheduler, for wiring into fresh states.
    #[must_use]
    pub fn scheduler(&self) -> SchedulerHandle {
        self.scheduler.clone()
    }

    /// Expands a widget down to its renderable leaf.
    ///
    /// Stateless widgets expand through their `build`; stateful widgets
    /// thread their per-key state, reusing the instance from the previous
    /// pass when the key matches and creating it otherwise. The loop is
    /// bounded: a chain that never reaches a leaf is a configuration error,
    /// not a hang.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyBuildIterations`] when the widget has not
    /// resolved to a leaf within the configured bound.
    pub fn build(&mut self, widget: Widget) -> Result<RenderWidget, Error> {
        let mut current = widget;
        for _ in 0..self.max_iterations {
            current = match current {
                Widget::Render(leaf) => return Ok(leaf),
                Widget::Stateless(widget) => widget.build(self),
                Widget::Stateful(widget) => {
                    let key = widget.key();
                    let existing = self
                        .next
                        .get(&key)
                        .or_else(|| self.active.get(&key))
                        .cloned();
                    let state = match existing {
                        Some(state) => state,
                        None => {
                            trace!(?key, "creating state for freshly mounted widget");
                            widget.create_state(self)
                        }
                    };
                    self.next.insert(key, state.clone());
                    state.build(self)
                }
            };
        }
        Err(Error::TooManyBuildIterations {
            limit: self.max_iterations,
        })
    }

    /// Commits the states accumulated this pass, dropping the rest.
    pub(crate) fn commit_states(&mut self) {
        trace!(states = self.next.len(), "active state map committed");
        self.active = std::mem::take(&mut self.next);
    }

    #[cfg(test)]
    pub(crate) fn active_state_count(&self) -> usize {
        self.active.len()
    }
}

/// The reconciliation runtime: one application, one backend, one retained
/// render tree.
pub struct Runtime<B: Backend> {
    app: App,
    backend: B,
    ctx: BuildCtx,
    root: Option<RenderNode<B>>,
    passes: u64,
}

impl<B: Backend> Runtime<B> {
    /// Creates a runtime with the default configuration.
    pub fn new(app: App, backend: B) -> Self {
        Self::with_config(app, backend, RuntimeConfig::default())
    }

    /// Creates a runtime, handing the application id to the backend.
    pub fn with_config(app: App, mut backend: B, config: RuntimeConfig) -> Self {
        backend.init_application(&app.id);
        Self {
            backend,
            ctx: BuildCtx::new(&config),
            root: None,
            passes: 0,
            app,
        }
    }

    /// Runs the initial build pass and presents the root window.
    ///
    /// # Errors
    ///
    /// Propagates any configuration error from the first pass.
    pub fn start(&mut self) -> Result<(), Error> {
        debug!(app = %self.app.id, "starting runtime");
        self.render_pass()
    }

    /// Runs one full build-and-reconcile pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotWindow`] when the root does not resolve to a
    /// window, or any error raised while building and reconciling the tree.
    pub fn render_pass(&mut self) -> Result<(), Error> {
        let _guard = BuildGuard::begin(&self.ctx.scheduler());

        let leaf = self.ctx.build(self.app.root.clone())?;
        if !matches!(leaf, RenderWidget::Window(_)) {
            return Err(Error::RootNotWindow {
                found: leaf.kind_name(),
            });
        }

        let previous = self.root.take();
        let previous_handle = previous.as_ref().map(RenderNode::handle);
        let (node, changed) = update_node(
            &mut self.ctx,
            &mut self.backend,
            previous,
            Widget::Render(leaf),
        )?;
        if changed {
            if let Some(old) = previous_handle {
                debug!("root window replaced");
                self.backend.destroy(old);
            }
            self.backend.present_window(node.handle());
        }
        self.root = Some(node);

        self.ctx.commit_states();
        self.passes += 1;
        trace!(pass = self.passes, "build pass complete");
        Ok(())
    }

    /// Drains fired native events, dispatches them to their owning nodes,
    /// then services a coalesced re-render if one was requested.
    ///
    /// # Errors
    ///
    /// Propagates any configuration error raised by the serviced pass.
    pub fn pump(&mut self) -> Result<(), Error> {
        while let Some(fired) = self.backend.poll_event() {
            self.dispatch(&fired);
        }
        while self.ctx.scheduler.take_render_request() {
            self.render_pass()?;
        }
        Ok(())
    }

    fn dispatch(&self, fired: &FiredEvent<B::Handle>) {
        let Some(root) = self.root.as_ref() else {
            debug!("event fired before the first build pass");
            return;
        };
        match root.find(fired.handle) {
            Some(node) => node.deliver(fired.event, &fired.payload),
            None => debug!(handle = ?fired.handle, "event for an unknown handle"),
        }
    }

    /// The application this runtime renders.
    #[must_use]
    pub const fn app(&self) -> &App {
        &self.app
    }

    /// Shared access to the backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive access to the backend, e.g. for feeding events in tests.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The native handle of the mounted root window, if any.
    #[must_use]
    pub fn root_handle(&self) -> Option<B::Handle> {
        self.root.as_ref().map(RenderNode::handle)
    }

    /// Returns `true` while a coalesced re-render is waiting for [`Self::pump`].
    #[must_use]
    pub fn has_pending_render(&self) -> bool {
        self.ctx.scheduler.is_render_pending()
    }

    /// Number of completed build passes.
    #[must_use]
    pub const fn passes(&self) -> u64 {
        self.passes
    }

    /// Destroys the root window and tears the backend down, returning it for
    /// inspection.
    pub fn shutdown(mut self) -> B {
        if let Some(root) = self.root.take() {
            self.backend.destroy(root.handle());
        }
        self.backend.teardown();
        self.backend
    }
}
