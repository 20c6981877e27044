//! Signal ids, handlers and the connection groups attached to leaf widgets.
//!
//! A leaf widget may carry a [`SignalConnectionGroup`]: an ordered list of
//! (signal, handler) pairs. Groups are compared structurally when a widget is
//! reapplied to a live render node, so rebuilding a tree with "the same"
//! bindings does not show up as a changed binding. Handler equality never
//! inspects the callback itself — it compares explicit identities: the
//! allocation of a free closure, or the (owning state, method) pair of a
//! bound method.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::state::StateRef;

/// The closed set of native events a backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEvent {
    /// A button was activated.
    Clicked,
    /// The text of an editable widget changed.
    Changed,
}

/// Data accompanying a fired native event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// The event carries no data.
    None,
    /// The event carries a text value, e.g. the new contents of an entry.
    Text(String),
}

/// Whether dispatch continues with the remaining handlers of a firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Keep invoking the remaining matching handlers.
    #[default]
    Continue,
    /// Short-circuit: skip the remaining handlers for this firing.
    Stop,
}

/// Argument types a signal can deliver to its handlers.
pub trait SignalArg: Sized + 'static {
    /// Extracts the argument from an event payload, or `None` when the
    /// payload does not fit this signal.
    fn from_payload(payload: &EventPayload) -> Option<Self>;
}

impl SignalArg for () {
    fn from_payload(payload: &EventPayload) -> Option<Self> {
        matches!(payload, EventPayload::None).then_some(())
    }
}

impl SignalArg for String {
    fn from_payload(payload: &EventPayload) -> Option<Self> {
        match payload {
            EventPayload::Text(text) => Some(text.clone()),
            EventPayload::None => None,
        }
    }
}

/// A typed token identifying a signal a leaf widget can emit.
///
/// The argument type `A` ties a signal to the handlers it accepts:
/// connecting a `SignalId<String>` requires a `Handler<String>`.
pub struct SignalId<A> {
    event: NativeEvent,
    _arg: PhantomData<fn(A)>,
}

impl<A> SignalId<A> {
    /// Creates a signal token for the given native event.
    #[must_use]
    pub const fn new(event: NativeEvent) -> Self {
        Self {
            event,
            _arg: PhantomData,
        }
    }

    /// The native event this signal maps to.
    #[must_use]
    pub const fn event(&self) -> NativeEvent {
        self.event
    }
}

impl<A> Clone for SignalId<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for SignalId<A> {}

impl<A> PartialEq for SignalId<A> {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event
    }
}

impl<A> Eq for SignalId<A> {}

impl<A> fmt::Debug for SignalId<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignalId").field(&self.event).finish()
    }
}

/// Identity of a handler, used for structural diffing of bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum HandlerIdentity {
    /// A free closure, identified by its allocation.
    Free(usize),
    /// A method bound to an owning state cell.
    Bound { owner: usize, method: usize },
}

/// A callback that can be attached to a signal.
///
/// Two handlers compare equal when their identities compare equal: a free
/// handler only equals itself (and its clones), and a bound handler equals
/// another binding of the same method to the same state cell. The callback
/// body is never inspected.
pub struct Handler<A> {
    identity: HandlerIdentity,
    func: Rc<dyn Fn(A) -> Propagation>,
}

impl<A> Handler<A> {
    /// Wraps a free closure. Each call allocates a fresh identity, so two
    /// handlers built from syntactically identical closures are not equal.
    #[must_use]
    pub fn new(func: impl Fn(A) -> Propagation + 'static) -> Self {
        let func: Rc<dyn Fn(A) -> Propagation> = Rc::new(func);
        let identity = HandlerIdentity::Free(Rc::as_ptr(&func).cast::<()>() as usize);
        Self { identity, func }
    }

    pub(crate) fn bound(identity: HandlerIdentity, func: impl Fn(A) -> Propagation + 'static) -> Self {
        Self {
            identity,
            func: Rc::new(func),
        }
    }

    /// Invokes the callback with the given argument.
    pub fn invoke(&self, arg: A) -> Propagation {
        (self.func)(arg)
    }

    pub(crate) const fn identity(&self) -> HandlerIdentity {
        self.identity
    }
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity,
            func: Rc::clone(&self.func),
        }
    }
}

impl<A> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl<A> Eq for Handler<A> {}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.identity).finish()
    }
}

/// A reusable method descriptor, bound to a concrete state cell with
/// [`StateRef::bind`](crate::state::StateRef::bind).
///
/// The descriptor is a plain function pointer, so it can live in a `const`
/// next to the state type it belongs to; its address doubles as the method
/// identity when a binding is diffed.
pub struct MethodHandler<S, A> {
    method: fn(&StateRef<S>, A) -> Propagation,
}

impl<S, A> MethodHandler<S, A> {
    /// Wraps a method of a state type.
    #[must_use]
    pub const fn new(method: fn(&StateRef<S>, A) -> Propagation) -> Self {
        Self { method }
    }

    pub(crate) fn raw(&self) -> fn(&StateRef<S>, A) -> Propagation {
        self.method
    }

    pub(crate) fn addr(&self) -> usize {
        self.method as usize
    }
}

impl<S, A> Clone for MethodHandler<S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A> Copy for MethodHandler<S, A> {}

impl<S, A> fmt::Debug for MethodHandler<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodHandler({:#x})", self.addr())
    }
}

/// One (signal, handler) pair attached to a leaf widget.
pub struct SignalConnection {
    event: NativeEvent,
    identity: HandlerIdentity,
    invoke: Rc<dyn Fn(&EventPayload) -> Propagation>,
}

impl SignalConnection {
    /// Pairs a signal with a handler of the matching argument type.
    #[must_use]
    pub fn new<A: SignalArg>(signal: SignalId<A>, handler: Handler<A>) -> Self {
        let event = signal.event();
        let identity = handler.identity();
        let invoke = Rc::new(move |payload: &EventPayload| match A::from_payload(payload) {
            Some(arg) => handler.invoke(arg),
            None => {
                tracing::debug!(?event, "event payload does not fit the connected signal");
                Propagation::Continue
            }
        });
        Self {
            event,
            identity,
            invoke,
        }
    }

    /// The native event this connection listens for.
    #[must_use]
    pub const fn event(&self) -> NativeEvent {
        self.event
    }
}

impl Clone for SignalConnection {
    fn clone(&self) -> Self {
        Self {
            event: self.event,
            identity: self.identity,
            invoke: Rc::clone(&self.invoke),
        }
    }
}

impl PartialEq for SignalConnection {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event && self.identity == other.identity
    }
}

impl Eq for SignalConnection {}

impl Hash for SignalConnection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event.hash(state);
        self.identity.hash(state);
    }
}

impl fmt::Debug for SignalConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalConnection")
            .field("event", &self.event)
            .field("identity", &self.identity)
            .finish()
    }
}

/// The ordered list of connections carried by one leaf widget.
///
/// Groups compare structurally, signal by signal and identity by identity,
/// in order. Dispatch walks the group in registration order and stops early
/// when a handler returns [`Propagation::Stop`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SignalConnectionGroup {
    connections: Vec<SignalConnection>,
}

impl SignalConnectionGroup {
    /// Creates a group from a list of connections.
    #[must_use]
    pub fn new(connections: Vec<SignalConnection>) -> Self {
        Self { connections }
    }

    /// Appends a connection, keeping registration order.
    pub fn push(&mut self, connection: SignalConnection) {
        self.connections.push(connection);
    }

    /// Number of connections in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` when no connections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Invokes every handler registered for `event`, in registration order.
    ///
    /// A handler returning [`Propagation::Stop`] short-circuits the rest of
    /// the group for this firing.
    pub fn dispatch(&self, event: NativeEvent, payload: &EventPayload) {
        for connection in self.connections.iter().filter(|c| c.event == event) {
            if (connection.invoke)(payload) == Propagation::Stop {
                break;
            }
        }
    }
}
