//! The built-in renderable leaf widgets.

mod button;
mod entry;
mod grid;
mod label;
mod window;

pub use button::Button;
pub use entry::{Entry, EntryPurpose};
pub use grid::{Anchor, Cell, Grid, Homogeneity, Item, Position, Span, resolve_cells};
pub use label::{Justify, Label};
pub use window::Window;
