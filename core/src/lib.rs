//! Core reconciliation engine for the Kawa framework.
//!
//! Kawa applications describe their UI as an immutable tree of
//! [`Widget`] values. The engine expands that description down to
//! renderable leaves, diffs the result against the retained tree of live
//! native handles from the previous pass, and pushes the minimal set of
//! mutations through a [`Backend`]. Per-subtree application state survives
//! rebuilds as long as a widget with an equal [`Key`] keeps appearing.
//!
//! The crate is toolkit-agnostic: everything a native toolkit must provide
//! is captured by the [`Backend`] trait, and the engine itself never blocks,
//! spawns or suspends — one [`Runtime`] runs one application on one logical
//! thread.

pub mod app;
pub mod backend;
pub mod context;
pub mod error;
pub mod key;
pub mod node;
pub mod signal;
pub mod state;
pub mod widget;
pub mod widgets;

#[doc(inline)]
pub use app::App;
#[doc(inline)]
pub use backend::{Backend, FiredEvent};
#[doc(inline)]
pub use context::{BuildCtx, Runtime, RuntimeConfig, SchedulerHandle};
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use key::Key;
#[doc(inline)]
pub use node::RenderNode;
#[doc(inline)]
pub use signal::{
    EventPayload, Handler, MethodHandler, NativeEvent, Propagation, SignalArg, SignalConnection,
    SignalConnectionGroup, SignalId,
};
#[doc(inline)]
pub use state::{AnyState, State, StateRef};
#[doc(inline)]
pub use widget::{RenderWidget, StatefulWidget, StatelessWidget, Widget};
#[doc(inline)]
pub use widgets::{
    Anchor, Button, Cell, Entry, EntryPurpose, Grid, Homogeneity, Item, Justify, Label, Position,
    Span, Window,
};
