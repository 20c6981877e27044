//! Errors surfaced by the reconciliation engine.
//!
//! Everything here is a configuration error: a malformed widget tree or a
//! build that never converges. These are programming defects in the
//! application, not transient conditions, so there is no retry policy — the
//! error is reported at the point of detection and the pass is abandoned.

use thiserror::Error;

/// A fatal configuration error detected during a build or reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A widget never resolved to a renderable leaf. Signals a cyclic or
    /// runaway stateless/stateful chain.
    #[error("widget did not resolve to a renderable leaf after {limit} build iterations")]
    TooManyBuildIterations {
        /// The configured iteration bound that was exceeded.
        limit: usize,
    },

    /// The root widget resolved to a leaf other than a window.
    #[error("root widget must resolve to a window, got {found}")]
    RootNotWindow {
        /// The leaf kind the root actually resolved to.
        found: &'static str,
    },

    /// A grid item carries no position and the grid declares no default.
    #[error("grid item {index} has no position and the grid has no default position")]
    UnresolvedGridPosition {
        /// Index of the offending item within the grid.
        index: usize,
    },

    /// A grid span built from an origin/target pair is not strictly positive
    /// on both axes.
    #[error("grid span from ({from_x}, {from_y}) to ({to_x}, {to_y}) must grow on both axes")]
    InvalidSpan {
        /// Origin column.
        from_x: i32,
        /// Origin row.
        from_y: i32,
        /// Target column.
        to_x: i32,
        /// Target row.
        to_y: i32,
    },
}
