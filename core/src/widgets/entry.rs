//! An editable single-line text entry.

use crate::key::Key;
use crate::signal::{Handler, NativeEvent, SignalArg, SignalConnection, SignalConnectionGroup, SignalId};

/// What an entry's text is used for.
///
/// A password entry asks the native toolkit to mask its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryPurpose {
    /// Ordinary visible text.
    #[default]
    Text,
    /// Masked secret text.
    Password,
}

/// A leaf widget accepting one line of text input.
///
/// The entry emits [`Entry::CHANGED`] with the new contents whenever the
/// native widget's text changes.
#[derive(Debug, Clone)]
pub struct Entry {
    key: Option<Key>,
    /// Hint text shown while the entry is empty.
    pub placeholder: String,
    /// Whether the contents are visible or masked.
    pub purpose: EntryPurpose,
    /// Signal bindings attached to this entry.
    pub connections: SignalConnectionGroup,
}

impl Entry {
    /// Fired with the new text whenever the contents change.
    pub const CHANGED: SignalId<String> = SignalId::new(NativeEvent::Changed);

    /// Creates an empty text entry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: None,
            placeholder: String::new(),
            purpose: EntryPurpose::Text,
            connections: SignalConnectionGroup::default(),
        }
    }

    /// Sets the placeholder hint.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the input purpose.
    #[must_use]
    pub const fn purpose(mut self, purpose: EntryPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Attaches a handler to one of the entry's signals.
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

    /// The entry's identity.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key.unwrap_or_else(|| {
            Key::auto::<Self, _>(&(&self.placeholder, self.purpose, &self.connections))
        })
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}
