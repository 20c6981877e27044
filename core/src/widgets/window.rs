//! The top-level window leaf.

use crate::key::Key;
use crate::widget::Widget;

/// A top-level window holding a single child widget.
///
/// The root widget of every application must resolve to a `Window`.
#[derive(Debug, Clone)]
pub struct Window {
    key: Option<Key>,
    /// Title shown in the window's title bar.
    pub title: String,
    /// Default width in pixels.
    pub width: i32,
    /// Default height in pixels.
    pub height: i32,
    /// Whether the native title bar is shown.
    pub has_title_bar: bool,
    /// The window's only child.
    pub child: Box<Widget>,
}

impl Window {
    /// Creates a window with an 800x600 default size and a title bar.
    pub fn new(title: impl Into<String>, child: impl Into<Widget>) -> Self {
        Self {
            key: None,
            title: title.into(),
            width: 800,
            height: 600,
            has_title_bar: true,
            child: Box::new(child.into()),
        }
    }

    /// Sets the default size.
    #[must_use]
    pub const fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Shows or hides the native title bar.
    #[must_use]
    pub const fn has_title_bar(mut self, has_title_bar: bool) -> Self {
        self.has_title_bar = has_title_bar;
        self
    }

    /// Overrides the auto-derived key.
    #[must_use]
    pub const fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// The window's identity: the explicit key if one was set, otherwise a
    /// digest of the window's content.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key.unwrap_or_else(|| {
            Key::auto::<Self, _>(&(
                &self.title,
                self.width,
                self.height,
                self.has_title_bar,
                self.child.key(),
            ))
        })
    }
}
