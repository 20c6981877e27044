//! A Kawa application description.

use crate::widget::Widget;

/// The application collaborator's half of the contract: an identifier and a
/// root widget.
///
/// The root must resolve to a [`Window`](crate::widgets::Window) leaf; any
/// other kind is a fatal configuration error reported by the first build
/// pass.
#[derive(Debug, Clone)]
pub struct App {
    /// Reverse-DNS application identifier handed to the backend.
    pub id: String,
    /// The root of the widget tree.
    pub root: Widget,
}

impl App {
    /// Creates an application description.
    pub fn new(id: impl Into<String>, root: impl Into<Widget>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
        }
    }
}
