//! Mutable state owned by stateful widgets.
//!
//! One [`State`] instance exists per distinct key among the currently-mounted
//! stateful widgets. It survives across rebuilds while a widget with an equal
//! key reappears, and is dropped at the end of the first pass in which the
//! key is gone — any cleanup is the state's own responsibility, typically a
//! `Drop` impl.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::context::{BuildCtx, SchedulerHandle};
use crate::signal::{Handler, HandlerIdentity, MethodHandler};
use crate::widget::Widget;

/// Application state attached to a stateful widget.
pub trait State: Sized + 'static {
    /// Describes the subtree below the owning widget.
    ///
    /// `this` is a shared reference to the state cell itself; it is what
    /// bound method handlers close over, and what [`StateRef::update`] is
    /// called on to schedule a re-render.
    fn build(&mut self, this: &StateRef<Self>, ctx: &mut BuildCtx) -> Widget;
}

/// A shared handle to a live state cell.
///
/// The handle carries a back-reference to the runtime scheduler so state
/// mutations can request a coalesced re-render.
pub struct StateRef<S> {
    cell: Rc<RefCell<S>>,
    scheduler: SchedulerHandle,
}

impl<S> StateRef<S> {
    pub(crate) fn new(state: S, scheduler: SchedulerHandle) -> Self {
        Self {
            cell: Rc::new(RefCell::new(state)),
            scheduler,
        }
    }

    /// Mutates the state and requests a re-render.
    ///
    /// Requests are coalesced: no matter how many updates happen before the
    /// runtime is pumped again, at most one build pass is scheduled.
    ///
    /// # Panics
    ///
    /// Panics when called while a build pass is active. Mutating state from
    /// inside `build` would leave the state map and the render tree
    /// describing different worlds, so it is a precondition violation rather
    /// than a silent no-op.
    pub fn update(&self, mutate: impl FnOnce(&mut S)) {
        assert!(
            !self.scheduler.is_building(),
            "state must not be mutated during an active build pass"
        );
        mutate(&mut self.cell.borrow_mut());
        self.scheduler.request_render();
    }

    /// Reads the state without scheduling anything.
    pub fn with<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.cell.borrow())
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.cell) as usize
    }
}

impl<S: 'static> StateRef<S> {
    /// Binds a method descriptor to this state cell.
    ///
    /// The resulting handler compares equal to any other binding of the same
    /// method to the same cell, so rebuilding a widget with the same logical
    /// callback does not register as a changed binding.
    #[must_use]
    pub fn bind<A: 'static>(&self, method: MethodHandler<S, A>) -> Handler<A> {
        let identity = HandlerIdentity::Bound {
            owner: self.addr(),
            method: method.addr(),
        };
        let owner = self.clone();
        let raw = method.raw();
        Handler::bound(identity, move |arg| raw(&owner, arg))
    }
}

impl<S> Clone for StateRef<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<S> fmt::Debug for StateRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateRef({:#x})", self.addr())
    }
}

/// Object-safe view of a state cell used by the build loop.
pub(crate) trait DynState {
    fn build(&self, ctx: &mut BuildCtx) -> Widget;
}

impl<S: State> DynState for StateRef<S> {
    fn build(&self, ctx: &mut BuildCtx) -> Widget {
        let this = self.clone();
        self.cell.borrow_mut().build(&this, ctx)
    }
}

/// A type-erased, cheaply clonable state handle stored in the active-state
/// map.
pub struct AnyState(Rc<dyn DynState>);

impl AnyState {
    /// Erases a freshly created state, wiring it to the runtime scheduler.
    #[must_use]
    pub fn new<S: State>(ctx: &BuildCtx, state: S) -> Self {
        Self(Rc::new(StateRef::new(state, ctx.scheduler())))
    }

    pub(crate) fn build(&self, ctx: &mut BuildCtx) -> Widget {
        self.0.build(ctx)
    }
}

impl Clone for AnyState {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl fmt::Debug for AnyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyState(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Propagation;

    struct Counter {
        count: u32,
    }

    fn on_click(this: &StateRef<Counter>, (): ()) -> Propagation {
        this.update(|s| s.count += 1);
        Propagation::Continue
    }

    fn on_reset(this: &StateRef<Counter>, (): ()) -> Propagation {
        this.update(|s| s.count = 0);
        Propagation::Continue
    }

    const ON_CLICK: MethodHandler<Counter, ()> = MethodHandler::new(on_click);
    const ON_RESET: MethodHandler<Counter, ()> = MethodHandler::new(on_reset);

    fn state() -> StateRef<Counter> {
        StateRef::new(Counter { count: 0 }, SchedulerHandle::new())
    }

    #[test]
    fn rebinding_the_same_method_compares_equal() {
        let cell = state();
        assert_eq!(cell.bind(ON_CLICK), cell.bind(ON_CLICK));
    }

    #[test]
    fn bindings_to_different_cells_differ() {
        let a = state();
        let b = state();
        assert_ne!(a.bind(ON_CLICK), b.bind(ON_CLICK));
    }

    #[test]
    fn bindings_of_different_methods_differ() {
        let cell = state();
        assert_ne!(cell.bind(ON_CLICK), cell.bind(ON_RESET));
    }

    #[test]
    fn bound_handler_reaches_the_owning_state() {
        let cell = state();
        let handler = cell.bind(ON_CLICK);
        handler.invoke(());
        handler.invoke(());
        assert_eq!(cell.with(|s| s.count), 2);
    }

    #[test]
    fn update_requests_a_render() {
        let cell = state();
        cell.update(|s| s.count = 7);
        assert!(cell.scheduler.take_render_request());
        assert!(!cell.scheduler.take_render_request());
    }

    #[test]
    fn updates_coalesce_into_one_request() {
        let cell = state();
        cell.update(|s| s.count += 1);
        cell.update(|s| s.count += 1);
        assert!(cell.scheduler.take_render_request());
        assert!(!cell.scheduler.take_render_request());
    }

    #[test]
    #[should_panic(expected = "state must not be mutated during an active build pass")]
    fn update_during_build_is_a_precondition_violation() {
        let cell = state();
        cell.scheduler.begin_build();
        cell.update(|s| s.count += 1);
    }
}
