//! A clickable button.

use crate::key::Key;
use crate::signal::{Handler, NativeEvent, SignalArg, SignalConnection, SignalConnectionGroup, SignalId};

/// A leaf widget that emits [`Button::CLICKED`] when activated.
#[derive(Debug, Clone)]
pub struct Button {
    key: Option<Key>,
    /// The button's label text.
    pub text: String,
    /// Signal bindings attached to this button.
    pub connections: SignalConnectionGroup,
}

impl Button {
    /// Fired when the button is activated.
    pub const CLICKED: SignalId<()> = SignalId::new(NativeEvent::Clicked);

    /// Creates a button with no connections.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            key: None,
            text: text.into(),
            connections: SignalConnectionGroup::default(),
        }
    }

    /// Attaches a handler to one of the button's signals.
    #[must_use]
    pub fn connect<A: SignalArg>(mut self, signal: SignalId<A>, handler: Handler<A>) -> Self {
        self.connections.push(SignalConnection::new(signal, handler));
        self
    }

    /// Overrides the auto-derived key.
    #[must_use]
    pub const fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// The button's identity.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key
            .unwrap_or_else(|| Key::auto::<Self, _>(&(&self.text, &self.connections)))
    }
}
