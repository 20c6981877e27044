//! A container placing children in column/row cells.
//!
//! Grid children are described by [`Item`]s: each may pin an explicit origin
//! (absolute, or relative to the previous item's origin), or flow from the
//! previous item in one of four directions. [`resolve_cells`] turns the item
//! sequence into absolute cell rectangles; the render layer only ever sees
//! resolved cells.

use std::hash::{Hash, Hasher};

use crate::error::Error;
use crate::key::Key;
use crate::widget::Widget;

/// Where an item flows relative to the previous item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// No position of its own; the grid's default applies.
    #[default]
    Unspecified,
    /// One row above the previous item.
    Above,
    /// One row below the previous item.
    Below,
    /// One column left of the previous item.
    Left,
    /// One column right of the previous item.
    Right,
}

/// Which axes of the grid distribute space evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Homogeneity {
    /// Rows and columns are both homogeneous.
    All,
    /// Only rows are homogeneous.
    Row,
    /// Only columns are homogeneous.
    Column,
    /// Neither axis is homogeneous.
    #[default]
    None,
}

/// An explicit item origin, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// A fixed cell coordinate.
    Absolute {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// An offset from the previous item's origin.
    Relative {
        /// Column offset.
        x: i32,
        /// Row offset.
        y: i32,
    },
}

impl Anchor {
    /// A fixed cell coordinate.
    #[must_use]
    pub const fn absolute(x: i32, y: i32) -> Self {
        Self::Absolute { x, y }
    }

    /// An offset from the previous item's origin.
    #[must_use]
    pub const fn relative(x: i32, y: i32) -> Self {
        Self::Relative { x, y }
    }

    const fn x(self) -> i32 {
        match self {
            Self::Absolute { x, .. } | Self::Relative { x, .. } => x,
        }
    }

    const fn y(self) -> i32 {
        match self {
            Self::Absolute { y, .. } | Self::Relative { y, .. } => y,
        }
    }
}

/// How many columns and rows an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Columns occupied.
    pub x: i32,
    /// Rows occupied.
    pub y: i32,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// One grid child and its placement description.
#[derive(Debug, Clone)]
pub struct Item {
    pub(crate) origin: Option<Anchor>,
    pub(crate) span: Span,
    pub(crate) position: Position,
    pub(crate) child: Widget,
}

impl Item {
    /// Creates a 1x1 item that flows from the grid's default position.
    pub fn new(child: impl Into<Widget>) -> Self {
        Self {
            origin: None,
            span: Span::default(),
            position: Position::Unspecified,
            child: child.into(),
        }
    }

    /// Creates an item spanning the cells between `from` and `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpan`] when `to` is not strictly below and to
    /// the right of `from` on both axes.
    pub fn spanning(from: Anchor, to: Anchor, child: impl Into<Widget>) -> Result<Self, Error> {
        let span = Span::new(to.x() - from.x(), to.y() - from.y());
        if span.x <= 0 || span.y <= 0 {
            return Err(Error::InvalidSpan {
                from_x: from.x(),
                from_y: from.y(),
                to_x: to.x(),
                to_y: to.y(),
            });
        }
        Ok(Self {
            origin: Some(from),
            span,
            position: Position::Unspecified,
            child: child.into(),
        })
    }

    /// Pins the item at an explicit origin.
    #[must_use]
    pub const fn at(mut self, origin: Anchor) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Sets the number of cells the item occupies.
    #[must_use]
    pub const fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets the item's own flow position, overriding the grid default.
    #[must_use]
    pub const fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// The widget placed in this item's cells.
    #[must_use]
    pub const fn child(&self) -> &Widget {
        &self.child
    }
}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.origin.hash(state);
        self.span.hash(state);
        self.position.hash(state);
        self.child.key().hash(state);
    }
}

impl From<Widget> for Item {
    fn from(child: Widget) -> Self {
        Self::new(child)
    }
}

/// A leaf widget arranging children in cells.
#[derive(Debug, Clone)]
pub struct Grid {
    key: Option<Key>,
    /// Flow direction for items without a position of their own.
    pub default_position: Position,
    /// Which axes distribute space evenly.
    pub homogeneity: Homogeneity,
    /// The children, in placement order.
    pub items: Vec<Item>,
}

impl Grid {
    /// Creates a grid with no default flow direction.
    ///
    /// Every item must carry its own origin or position, or reconciliation
    /// fails with [`Error::UnresolvedGridPosition`].
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            key: None,
            default_position: Position::Unspecified,
            homogeneity: Homogeneity::None,
            items: items.into_iter().collect(),
        }
    }

    /// Creates a grid whose items flow to the right: a row.
    #[must_use]
    pub fn row(items: impl IntoIterator<Item = Item>) -> Self {
        Self::new(items).default_position(Position::Right)
    }

    /// Creates a grid whose items flow downward: a column.
    #[must_use]
    pub fn column(items: impl IntoIterator<Item = Item>) -> Self {
        Self::new(items).default_position(Position::Below)
    }

    /// Sets the default flow direction.
    #[must_use]
    pub const fn default_position(mut self, position: Position) -> Self {
        self.default_position = position;
        self
    }

    /// Sets the homogeneity of the grid's axes.
    #[must_use]
    pub const fn homogeneity(mut self, homogeneity: Homogeneity) -> Self {
        self.homogeneity = homogeneity;
        self
    }

    /// Overrides the auto-derived key.
    #[must_use]
    pub const fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// The grid's identity.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key.unwrap_or_else(|| {
            Key::auto::<Self, _>(&(self.default_position, self.homogeneity, &self.items))
        })
    }
}

/// A resolved absolute cell rectangle, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Column of the top-left cell.
    pub x: i32,
    /// Row of the top-left cell.
    pub y: i32,
    /// Columns occupied.
    pub width: i32,
    /// Rows occupied.
    pub height: i32,
}

/// Resolves each item of a grid to an absolute cell rectangle.
///
/// The resolver walks the items in order, carrying the previous item's
/// origin (initially `(0, 0)`) and span (initially zero): an absolute anchor
/// is used verbatim; a relative anchor is added to the previous origin; an
/// unanchored item flows from the previous item in its own direction, or the
/// grid default when it has none.
///
/// # Errors
///
/// Returns [`Error::UnresolvedGridPosition`] when an item has neither an
/// anchor nor a position and the grid declares no default.
pub fn resolve_cells(default_position: Position, items: &[Item]) -> Result<Vec<Cell>, Error> {
    let mut previous_origin = (0i32, 0i32);
    let mut previous_span = Span::new(0, 0);
    let mut cells = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let (x, y) = match item.origin {
            Some(Anchor::Absolute { x, y }) => (x, y),
            Some(Anchor::Relative { x, y }) => (previous_origin.0 + x, previous_origin.1 + y),
            None => {
                let position = match item.position {
                    Position::Unspecified => default_position,
                    own => own,
                };
                match position {
                    Position::Unspecified => {
                        return Err(Error::UnresolvedGridPosition { index });
                    }
                    Position::Above => (previous_origin.0, previous_origin.1 - previous_span.y),
                    Position::Below => (previous_origin.0, previous_origin.1 + previous_span.y),
                    Position::Left => (previous_origin.0 - previous_span.x, previous_origin.1),
                    Position::Right => (previous_origin.0 + previous_span.x, previous_origin.1),
                }
            }
        };

        cells.push(Cell {
            x,
            y,
            width: item.span.x,
            height: item.span.y,
        });
        previous_origin = (x, y);
        previous_span = item.span;
    }

    Ok(cells)
}
