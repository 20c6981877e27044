//! The contract between the reconciler and a native widget toolkit.
//!
//! The engine never talks to a toolkit directly. Everything it needs is
//! expressed on the [`Backend`] trait: creating one native object per leaf
//! kind, mutating properties in place, re-parenting, destroying, and a
//! poll-based channel for native events. A backend hands out opaque,
//! copyable handles; the reconciler guarantees that a live handle is owned
//! by exactly one render node at a time.

use std::fmt::Debug;
use std::hash::Hash;

use crate::signal::{EventPayload, NativeEvent};
use crate::widgets::Justify;

/// A native event a backend has fired, waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredEvent<H> {
    /// The native object the event originated from.
    pub handle: H,
    /// Which event fired.
    pub event: NativeEvent,
    /// Data accompanying the event.
    pub payload: EventPayload,
}

/// One native widget toolkit, as seen by the reconciler.
///
/// Property setters are expected to be cheap and idempotent; the engine may
/// re-apply an unchanged value rather than diff individual fields.
/// Structural calls (`set_window_child`, `grid_attach`, `destroy`) are the
/// expensive path and are only issued when a node's identity actually
/// changes. Destroying a handle releases its whole native subtree.
pub trait Backend {
    /// An opaque reference to one native object.
    type Handle: Copy + Eq + Hash + Debug;

    /// Called once before the first build pass, with the application id.
    fn init_application(&mut self, id: &str) {
        let _ = id;
    }

    /// Called once at explicit shutdown, after the root handle is destroyed.
    fn teardown(&mut self) {}

    /// Creates a native top-level window.
    fn create_window(&mut self) -> Self::Handle;
    /// Creates a native text label.
    fn create_label(&mut self) -> Self::Handle;
    /// Creates a native button.
    fn create_button(&mut self) -> Self::Handle;
    /// Creates a native text entry.
    fn create_entry(&mut self) -> Self::Handle;
    /// Creates a native grid container.
    fn create_grid(&mut self) -> Self::Handle;

    /// Sets a window's title.
    fn set_window_title(&mut self, window: Self::Handle, title: &str);
    /// Sets a window's default size in pixels.
    fn set_window_default_size(&mut self, window: Self::Handle, width: i32, height: i32);
    /// Shows or hides a window's native title bar.
    fn set_window_decorated(&mut self, window: Self::Handle, decorated: bool);
    /// Attaches, replaces or removes a window's single child.
    fn set_window_child(&mut self, window: Self::Handle, child: Option<Self::Handle>);
    /// Makes a window visible.
    fn present_window(&mut self, window: Self::Handle);

    /// Sets a label's text.
    fn set_label_text(&mut self, label: Self::Handle, text: &str);
    /// Sets a label's justification.
    fn set_label_justify(&mut self, label: Self::Handle, justify: Justify);

    /// Sets a button's label text.
    fn set_button_label(&mut self, button: Self::Handle, label: &str);

    /// Sets an entry's placeholder hint.
    fn set_entry_placeholder(&mut self, entry: Self::Handle, placeholder: &str);
    /// Shows or masks an entry's contents.
    fn set_entry_visibility(&mut self, entry: Self::Handle, visible: bool);

    /// Sets whether a grid's rows/columns are homogeneous.
    fn set_grid_homogeneity(&mut self, grid: Self::Handle, rows: bool, columns: bool);
    /// Attaches a child to a grid at an absolute cell rectangle.
    fn grid_attach(
        &mut self,
        grid: Self::Handle,
        child: Self::Handle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    );
    /// Detaches a child from a grid without destroying it.
    fn grid_detach(&mut self, grid: Self::Handle, child: Self::Handle);

    /// Releases a native object and its subtree.
    fn destroy(&mut self, handle: Self::Handle);

    /// Subscribes the reconciler to a native event on a handle.
    fn subscribe(&mut self, handle: Self::Handle, event: NativeEvent);

    /// Pops the next fired event, if any.
    ///
    /// The runtime drains this queue when pumped and routes each event to
    /// the render node owning the handle.
    fn poll_event(&mut self) -> Option<FiredEvent<Self::Handle>>;
}
