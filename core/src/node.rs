//! The retained render-node tree.
//!
//! One [`RenderNode`] exists per mounted leaf widget, exclusively owning one
//! native handle. Reconciliation applies a new leaf widget to an existing
//! node: when the concrete kinds match the node mutates its handle's
//! properties in place and survives; when they differ a fresh node is built
//! and the caller performs the native tree surgery. In-place mutation is the
//! central optimization — replacement destroys and recreates native objects
//! and is only ever triggered by a kind change, never by a field change.

use tracing::{debug, trace};

use crate::backend::Backend;
use crate::context::BuildCtx;
use crate::error::Error;
use crate::key::Key;
use crate::signal::{EventPayload, NativeEvent, SignalConnectionGroup};
use crate::widget::{RenderWidget, Widget};
use crate::widgets::{Button, Entry, EntryPurpose, Grid, Homogeneity, Label, Window, resolve_cells};

/// Reconciles a widget against an optional existing node.
///
/// Runs the build loop on `widget` to obtain its renderable form, then
/// either mutates `existing` in place (kinds match) or builds a brand-new
/// node. The returned flag reports whether the node's identity changed; the
/// caller attaches the new handle and releases the old one only in that
/// case.
pub(crate) fn update_node<B: Backend>(
    ctx: &mut BuildCtx,
    backend: &mut B,
    existing: Option<RenderNode<B>>,
    widget: Widget,
) -> Result<(RenderNode<B>, bool), Error> {
    let leaf = ctx.build(widget)?;
    match existing {
        None => Ok((RenderNode::create(ctx, backend, leaf)?, true)),
        Some(node) => node.apply_changes(ctx, backend, leaf),
    }
}

/// A live node owning one native handle.
pub enum RenderNode<B: Backend> {
    /// A top-level window node.
    Window(WindowNode<B>),
    /// A text label node.
    Label(LabelNode<B>),
    /// A button node.
    Button(ButtonNode<B>),
    /// A text entry node.
    Entry(EntryNode<B>),
    /// A grid container node.
    Grid(GridNode<B>),
}

impl<B: Backend> RenderNode<B> {
    /// The native handle owned by this node.
    #[must_use]
    pub fn handle(&self) -> B::Handle {
        match self {
            Self::Window(node) => node.handle,
            Self::Label(node) => node.handle,
            Self::Button(node) => node.handle,
            Self::Entry(node) => node.handle,
            Self::Grid(node) => node.handle,
        }
    }

    /// A short name for the node's concrete kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Window(_) => "window",
            Self::Label(_) => "label",
            Self::Button(_) => "button",
            Self::Entry(_) => "entry",
            Self::Grid(_) => "grid",
        }
    }

    /// Builds a brand-new node for a leaf widget, creating the native object
    /// and applying the widget's data to it.
    fn create(ctx: &mut BuildCtx, backend: &mut B, leaf: RenderWidget) -> Result<Self, Error> {
        trace!(kind = leaf.kind_name(), "creating native object");
        match leaf {
            RenderWidget::Window(widget) => {
                let mut node = WindowNode {
                    handle: backend.create_window(),
                    child: None,
                };
                node.apply(ctx, backend, widget)?;
                Ok(Self::Window(node))
            }
            RenderWidget::Label(widget) => {
                let mut node = LabelNode {
                    handle: backend.create_label(),
                };
                node.apply(backend, widget);
                Ok(Self::Label(node))
            }
            RenderWidget::Button(widget) => {
                let handle = backend.create_button();
                backend.subscribe(handle, NativeEvent::Clicked);
                let mut node = ButtonNode {
                    handle,
                    connections: SignalConnectionGroup::default(),
                };
                node.apply(backend, widget);
                Ok(Self::Button(node))
            }
            RenderWidget::Entry(widget) => {
                let handle = backend.create_entry();
                backend.subscribe(handle, NativeEvent::Changed);
                let mut node = EntryNode {
                    handle,
                    connections: SignalConnectionGroup::default(),
                };
                node.apply(backend, widget);
                Ok(Self::Entry(node))
            }
            RenderWidget::Grid(widget) => {
                let mut node = GridNode {
                    handle: backend.create_grid(),
                    children: Vec::new(),
                };
                node.apply(ctx, backend, widget)?;
                Ok(Self::Grid(node))
            }
        }
    }

    /// Applies a leaf widget to this node.
    ///
    /// Matching kinds mutate in place and keep the node; a kind mismatch
    /// builds a replacement. Field-level differences never force
    /// replacement.
    fn apply_changes(
        self,
        ctx: &mut BuildCtx,
        backend: &mut B,
        leaf: RenderWidget,
    ) -> Result<(Self, bool), Error> {
        match (self, leaf) {
            (Self::Window(mut node), RenderWidget::Window(widget)) => {
                node.apply(ctx, backend, widget)?;
                Ok((Self::Window(node), false))
            }
            (Self::Label(mut node), RenderWidget::Label(widget)) => {
                node.apply(backend, widget);
                Ok((Self::Label(node), false))
            }
            (Self::Button(mut node), RenderWidget::Button(widget)) => {
                node.apply(backend, widget);
                Ok((Self::Button(node), false))
            }
            (Self::Entry(mut node), RenderWidget::Entry(widget)) => {
                node.apply(backend, widget);
                Ok((Self::Entry(node), false))
            }
            (Self::Grid(mut node), RenderWidget::Grid(widget)) => {
                node.apply(ctx, backend, widget)?;
                Ok((Self::Grid(node), false))
            }
            (stale, leaf) => {
                debug!(
                    from = stale.kind_name(),
                    to = leaf.kind_name(),
                    "leaf kind changed, rebuilding node"
                );
                Ok((Self::create(ctx, backend, leaf)?, true))
            }
        }
    }

    /// Finds the node owning `handle` in this subtree.
    pub(crate) fn find(&self, handle: B::Handle) -> Option<&Self> {
        if self.handle() == handle {
            return Some(self);
        }
        match self {
            Self::Window(node) => node.child.as_deref().and_then(|child| child.find(handle)),
            Self::Grid(node) => node
                .children
                .iter()
                .find_map(|child| child.node.find(handle)),
            _ => None,
        }
    }

    /// Routes a fired native event into this node's connection group.
    pub(crate) fn deliver(&self, event: NativeEvent, payload: &EventPayload) {
        match self {
            Self::Button(node) => node.connections.dispatch(event, payload),
            Self::Entry(node) => node.connections.dispatch(event, payload),
            other => trace!(
                node = other.kind_name(),
                ?event,
                "event on a node without handlers"
            ),
        }
    }
}

/// Node backing a [`Window`](crate::widgets::Window) widget.
pub struct WindowNode<B: Backend> {
    handle: B::Handle,
    child: Option<Box<RenderNode<B>>>,
}

impl<B: Backend> WindowNode<B> {
    fn apply(&mut self, ctx: &mut BuildCtx, backend: &mut B, widget: Window) -> Result<(), Error> {
        backend.set_window_title(self.handle, &widget.title);
        backend.set_window_default_size(self.handle, widget.width, widget.height);
        backend.set_window_decorated(self.handle, widget.has_title_bar);

        let previous = self.child.take();
        let previous_handle = previous.as_ref().map(|node| node.handle());
        let (child, changed) = update_node(ctx, backend, previous.map(|node| *node), *widget.child)?;
        if changed {
            if let Some(old) = previous_handle {
                backend.set_window_child(self.handle, None);
                backend.destroy(old);
            }
            backend.set_window_child(self.handle, Some(child.handle()));
        }
        self.child = Some(Box::new(child));
        Ok(())
    }
}

/// Node backing a [`Label`](crate::widgets::Label) widget.
pub struct LabelNode<B: Backend> {
    handle: B::Handle,
}

impl<B: Backend> LabelNode<B> {
    fn apply(&mut self, backend: &mut B, widget: Label) {
        backend.set_label_text(self.handle, &widget.text);
        backend.set_label_justify(self.handle, widget.justify);
    }
}

/// Node backing a [`Button`](crate::widgets::Button) widget.
pub struct ButtonNode<B: Backend> {
    handle: B::Handle,
    connections: SignalConnectionGroup,
}

impl<B: Backend> ButtonNode<B> {
    fn apply(&mut self, backend: &mut B, widget: Button) {
        backend.set_button_label(self.handle, &widget.text);
        if self.connections != widget.connections {
            trace!("button signal bindings changed");
            self.connections = widget.connections;
        }
    }
}

/// Node backing an [`Entry`](crate::widgets::Entry) widget.
pub struct EntryNode<B: Backend> {
    handle: B::Handle,
    connections: SignalConnectionGroup,
}

impl<B: Backend> EntryNode<B> {
    fn apply(&mut self, backend: &mut B, widget: Entry) {
        backend.set_entry_placeholder(self.handle, &widget.placeholder);
        backend.set_entry_visibility(self.handle, widget.purpose != EntryPurpose::Password);
        if self.connections != widget.connections {
            trace!("entry signal bindings changed");
            self.connections = widget.connections;
        }
    }
}

/// Node backing a [`Grid`](crate::widgets::Grid) widget.
pub struct GridNode<B: Backend> {
    handle: B::Handle,
    children: Vec<GridChild<B>>,
}

struct GridChild<B: Backend> {
    key: Key,
    node: RenderNode<B>,
}

impl<B: Backend> GridNode<B> {
    fn apply(&mut self, ctx: &mut BuildCtx, backend: &mut B, widget: Grid) -> Result<(), Error> {
        let (rows, columns) = match widget.homogeneity {
            Homogeneity::All => (true, true),
            Homogeneity::Row => (true, false),
            Homogeneity::Column => (false, true),
            Homogeneity::None => (false, false),
        };
        backend.set_grid_homogeneity(self.handle, rows, columns);

        let cells = resolve_cells(widget.default_position, &widget.items)?;

        // Children are matched by key first; siblings without a usable key
        // fall back to their position in the item list.
        let mut previous: Vec<Option<GridChild<B>>> = self.children.drain(..).map(Some).collect();
        let mut next = Vec::with_capacity(widget.items.len());

        for (index, (item, cell)) in widget.items.into_iter().zip(cells).enumerate() {
            let child_widget = item.child;
            let key = child_widget.key();

            let slot = if key.is_null() {
                None
            } else {
                previous
                    .iter()
                    .position(|slot| slot.as_ref().is_some_and(|child| child.key == key))
            };
            let slot =
                slot.or_else(|| matches!(previous.get(index), Some(Some(_))).then_some(index));

            let claimed = slot.and_then(|i| previous[i].take());
            let previous_handle = claimed.as_ref().map(|child| child.node.handle());

            let (node, changed) =
                update_node(ctx, backend, claimed.map(|child| child.node), child_widget)?;
            if changed {
                if let Some(old) = previous_handle {
                    backend.grid_detach(self.handle, old);
                    backend.destroy(old);
                }
                backend.grid_attach(
                    self.handle,
                    node.handle(),
                    cell.x,
                    cell.y,
                    cell.width,
                    cell.height,
                );
            }
            next.push(GridChild { key, node });
        }

        for stale in previous.into_iter().flatten() {
            trace!(
                node = stale.node.kind_name(),
                "removing grid child with no matching item"
            );
            backend.grid_detach(self.handle, stale.node.handle());
            backend.destroy(stale.node.handle());
        }

        self.children = next;
        Ok(())
    }
}
