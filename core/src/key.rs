//! Widget identity used to match old and new trees across rebuilds.
//!
//! Every widget exposes exactly one [`Key`]. During a build pass the engine
//! compares keys to decide which [`State`](crate::state::State) instances
//! survive and which render-node children can be reused. Keys are small value
//! types: compared, hashed, never mutated.

use std::any::TypeId;
use std::hash::{DefaultHasher, Hash, Hasher};

/// An identity token attached to a widget.
///
/// Two variants exist:
///
/// - [`Key::Null`] — the identity of singleton roots. A null key equals
///   another null key and nothing else.
/// - An *auto* key derived from a widget's own content: the widget type plus
///   a digest of its fields. Two auto keys are equal iff both the widget type
///   and the digest are equal, so a rebuilt widget with identical content
///   keeps its identity.
///
/// Equality is reflexive, symmetric and transitive, and stable for the
/// lifetime of a build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// The null identity, equal only to itself.
    Null,
    /// A content-derived identity.
    Auto {
        /// The concrete widget type this key was derived from.
        widget: TypeId,
        /// Digest of the widget's content.
        digest: u64,
    },
}

impl Key {
    /// Derives an auto key for a widget of type `W` from its content.
    ///
    /// The content is usually a tuple of the widget's fields; child widgets
    /// contribute their own keys rather than their full content, so a deep
    /// subtree does not have to be rehashed at every level. Call with the
    /// widget type spelled out and the content inferred:
    /// `Key::auto::<MyWidget, _>(&content)`.
    #[must_use]
    pub fn auto<W: 'static, C: Hash + ?Sized>(content: &C) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self::Auto {
            widget: TypeId::of::<W>(),
            digest: hasher.finish(),
        }
    }

    /// Returns `true` for the null identity.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::Null
    }
}
