//! The immutable widget tree.
//!
//! A [`Widget`] is a value description of UI, polymorphic over three
//! variants: stateless (a pure function from build context to a child
//! widget), stateful (creates and owns a [`State`](crate::state::State)
//! keyed by its own key) and renderable (a terminal description of one
//! native object). The build loop pattern-matches over the closed set; there
//! is no open class hierarchy and no downcasting.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::context::BuildCtx;
use crate::key::Key;
use crate::state::AnyState;
use crate::widgets::{Button, Entry, Grid, Label, Window};

/// A widget that composes other widgets without owning state.
pub trait StatelessWidget: Debug + 'static {
    /// The widget's identity.
    fn key(&self) -> Key;

    /// Describes the subtree this widget expands to.
    fn build(&self, ctx: &mut BuildCtx) -> Widget;
}

/// A widget whose subtree depends on mutable state.
///
/// The engine keys the state by [`StatefulWidget::key`]: as long as a widget
/// with an equal key appears in consecutive build passes, the same state
/// instance is reused.
pub trait StatefulWidget: Debug + 'static {
    /// The widget's identity.
    fn key(&self) -> Key;

    /// Creates the state for a freshly mounted widget.
    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState;
}

/// An immutable widget description.
#[derive(Debug, Clone)]
pub enum Widget {
    /// Expands to a child widget through [`StatelessWidget::build`].
    Stateless(Rc<dyn StatelessWidget>),
    /// Expands through a [`State`](crate::state::State) looked up by key.
    Stateful(Rc<dyn StatefulWidget>),
    /// A terminal leaf describing one native object.
    Render(RenderWidget),
}

impl Widget {
    /// Wraps a stateless widget.
    pub fn stateless(widget: impl StatelessWidget) -> Self {
        Self::Stateless(Rc::new(widget))
    }

    /// Wraps a stateful widget.
    pub fn stateful(widget: impl StatefulWidget) -> Self {
        Self::Stateful(Rc::new(widget))
    }

    /// The identity of this widget.
    #[must_use]
    pub fn key(&self) -> Key {
        match self {
            Self::Stateless(widget) => widget.key(),
            Self::Stateful(widget) => widget.key(),
            Self::Render(leaf) => leaf.key(),
        }
    }
}

// A widget contributes its key, not its full content, to a parent's content
// digest.
impl Hash for Widget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// The closed set of renderable leaf kinds.
#[derive(Debug, Clone)]
pub enum RenderWidget {
    /// A top-level window.
    Window(Window),
    /// A read-only text label.
    Label(Label),
    /// A clickable button.
    Button(Button),
    /// An editable single-line text entry.
    Entry(Entry),
    /// A container placing children in column/row cells.
    Grid(Grid),
}

impl RenderWidget {
    /// The identity of this leaf.
    #[must_use]
    pub fn key(&self) -> Key {
        match self {
            Self::Window(w) => w.key(),
            Self::Label(w) => w.key(),
            Self::Button(w) => w.key(),
            Self::Entry(w) => w.key(),
            Self::Grid(w) => w.key(),
        }
    }

    /// A short name for the concrete kind, used in logs and errors.
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
}

macro_rules! leaf_conversions {
    ($($leaf:ident),*) => {
        $(
            impl From<$leaf> for RenderWidget {
                fn from(widget: $leaf) -> Self {
                    Self::$leaf(widget)
                }
            }

            impl From<$leaf> for Widget {
                fn from(widget: $leaf) -> Self {
                    Self::Render(RenderWidget::$leaf(widget))
                }
            }
        )*
    };
}

leaf_conversions!(Window, Label, Button, Entry, Grid);

impl From<RenderWidget> for Widget {
    fn from(leaf: RenderWidget) -> Self {
        Self::Render(leaf)
    }
}
